use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ytquiz",
    about = "Summarize a YouTube video and quiz yourself on it",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL (prompted for on stdin if omitted)
    pub url: Option<String>,

    /// Preferred caption language [default: en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Gemini model used for the summary and the quiz [default: gemini-2.5-flash]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum words per summary request [default: 2000]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub chunk_words: Option<u32>,

    /// Minimum number of quiz questions to ask for [default: 10]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub questions: Option<u32>,

    /// Merge per-chunk summaries into one with an extra model call
    #[arg(long)]
    pub combine: bool,

    /// Show config and transcript details
    #[arg(short, long)]
    pub verbose: bool,
}
