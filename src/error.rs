use thiserror::Error;

/// Terminal failures of a run. The `Display` text is what the user sees.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{var} not found in environment variables.")]
    MissingCredential { var: String },

    #[error("Could not extract video ID from the URL.")]
    UrlParse { input: String },

    #[error("Transcript not available for this video.")]
    TranscriptUnavailable { video_id: String },

    #[error("Video unavailable.{}", reason_suffix(.reason))]
    VideoUnavailable { video_id: String, reason: Option<String> },

    #[error("Error fetching transcript: {0}")]
    Fetch(String),

    #[error("Error generating summary for {}: {reason}", chunk_label(.chunk))]
    SummaryGeneration { chunk: usize, reason: String },

    #[error("Error generating quiz: {0}")]
    QuizGeneration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default()
}

/// Chunk numbers are 1-based; 0 marks the combining pass.
fn chunk_label(chunk: &usize) -> String {
    if *chunk == 0 {
        "combined summary".to_string()
    } else {
        format!("chunk {chunk}")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
