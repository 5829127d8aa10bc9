use std::io::Write;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::gemini::TextGenerator;

const SUMMARY_PROMPT: &str = "Summarize the following transcript in a clear, concise, and student-friendly way. \
Highlight the main points and key takeaways.";

const COMBINE_PROMPT: &str = "Combine the following summaries into a single, clear, concise summary.";

pub fn summary_prompt(chunk: &str) -> String {
    format!("{SUMMARY_PROMPT}\n\nTranscript:\n{chunk}")
}

/// Summarize a single chunk. `index` is 1-based and only used for error reporting.
pub async fn summarize_chunk<G: TextGenerator>(model: &G, chunk: &str, index: usize) -> Result<String> {
    debug!("Summarizing chunk {index} ({} chars)", chunk.chars().count());
    let text = model
        .generate(&summary_prompt(chunk))
        .await
        .map_err(|e| Error::SummaryGeneration {
            chunk: index,
            reason: e.to_string(),
        })?;
    Ok(text.trim().to_string())
}

/// Summarize every chunk in order and join the results with blank lines.
///
/// A progress line is written before each chunk. The first failure aborts the
/// run; nothing summarized so far is returned. With `combine` set, multiple
/// chunk summaries are merged by one more model call.
pub async fn summarize_chunks<G: TextGenerator, W: Write>(
    model: &G,
    chunks: &[String],
    combine: bool,
    progress: &mut W,
) -> Result<String> {
    let mut summaries = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        writeln!(progress, "Generating summary for chunk {}/{}...", i + 1, chunks.len())?;
        summaries.push(summarize_chunk(model, chunk, i + 1).await?);
    }
    let joined = summaries.join("\n\n");

    if combine && summaries.len() > 1 {
        info!("Combining {} chunk summaries", summaries.len());
        return combine_summaries(model, &joined).await;
    }
    Ok(joined)
}

async fn combine_summaries<G: TextGenerator>(model: &G, joined: &str) -> Result<String> {
    let prompt = format!("{COMBINE_PROMPT}\n\n{joined}");
    let text = model
        .generate(&prompt)
        .await
        .map_err(|e| Error::SummaryGeneration {
            chunk: 0,
            reason: e.to_string(),
        })?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io;

    /// Echoes a numbered reply per call, failing on the call listed in `fail_on`
    struct Scripted {
        calls: RefCell<Vec<String>>,
        fail_on: Option<usize>,
    }

    impl Scripted {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl TextGenerator for Scripted {
        async fn generate(&self, prompt: &str) -> eyre::Result<String> {
            let n = {
                let mut calls = self.calls.borrow_mut();
                calls.push(prompt.to_string());
                calls.len()
            };
            if self.fail_on == Some(n) {
                eyre::bail!("quota exceeded");
            }
            Ok(format!("  summary {n}\n"))
        }
    }

    fn chunks(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("chunk text {i}")).collect()
    }

    #[test]
    fn test_summary_prompt_embeds_chunk() {
        let prompt = summary_prompt("hello world");
        assert!(prompt.starts_with("Summarize the following transcript"));
        assert!(prompt.ends_with("Transcript:\nhello world"));
    }

    #[tokio::test]
    async fn test_summaries_joined_in_order() {
        let model = Scripted::new(None);
        let summary = summarize_chunks(&model, &chunks(3), false, &mut io::sink()).await.unwrap();
        assert_eq!(summary, "summary 1\n\nsummary 2\n\nsummary 3");

        let calls = model.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls[1].ends_with("chunk text 2"));
    }

    #[tokio::test]
    async fn test_progress_lines() {
        let model = Scripted::new(None);
        let mut out = Vec::new();
        summarize_chunks(&model, &chunks(2), false, &mut out).await.unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Generating summary for chunk 1/2...\nGenerating summary for chunk 2/2...\n"
        );
    }

    #[tokio::test]
    async fn test_failure_aborts_remaining_chunks() {
        let model = Scripted::new(Some(2));
        let err = summarize_chunks(&model, &chunks(3), false, &mut io::sink()).await.unwrap_err();
        assert!(matches!(err, Error::SummaryGeneration { chunk: 2, .. }));
        assert_eq!(model.calls.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_no_chunks_no_calls() {
        let model = Scripted::new(None);
        assert_eq!(summarize_chunks(&model, &[], true, &mut io::sink()).await.unwrap(), "");
        assert!(model.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_combine_merges_multiple() {
        let model = Scripted::new(None);
        let summary = summarize_chunks(&model, &chunks(2), true, &mut io::sink()).await.unwrap();
        assert_eq!(summary, "summary 3");

        let calls = model.calls.borrow();
        assert!(calls[2].starts_with(COMBINE_PROMPT));
        assert!(calls[2].ends_with("summary 1\n\nsummary 2"));
    }

    #[tokio::test]
    async fn test_combine_skipped_for_single_chunk() {
        let model = Scripted::new(None);
        let summary = summarize_chunks(&model, &chunks(1), true, &mut io::sink()).await.unwrap();
        assert_eq!(summary, "summary 1");
        assert_eq!(model.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_combine_failure() {
        let model = Scripted::new(Some(3));
        let err = summarize_chunks(&model, &chunks(2), true, &mut io::sink()).await.unwrap_err();
        assert!(matches!(err, Error::SummaryGeneration { chunk: 0, .. }));
    }
}
