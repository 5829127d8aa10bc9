use crate::pipeline::Report;

pub const SUMMARY_BANNER: &str = "===== SUMMARY =====";
pub const QUIZ_BANNER: &str = "===== QUIZ (JSON) =====";

/// Render the quiz as 2-space indented JSON; non-ASCII text is left as is
pub fn render_quiz_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&report.quiz)
}

/// Render the final report: summary banner and prose, then quiz banner and JSON
pub fn render_report(report: &Report) -> serde_json::Result<String> {
    Ok(format!(
        "\n{SUMMARY_BANNER}\n\n{}\n\n{QUIZ_BANNER}\n\n{}",
        report.summary,
        render_quiz_json(report)?
    ))
}
