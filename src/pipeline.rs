use std::io::Write;

use log::info;
use serde::Serialize;

use crate::chunk::{DEFAULT_CHUNK_WORDS, chunk_words};
use crate::error::{Error, Result};
use crate::gemini::TextGenerator;
use crate::quiz::{DEFAULT_QUESTIONS, QuizRecord, generate_quiz, quiz_input};
use crate::summarize::summarize_chunks;
use crate::extract_video_id;
use crate::youtube::TranscriptProvider;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub chunk_words: usize,
    pub quiz_questions: usize,
    pub combine_summaries: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            chunk_words: DEFAULT_CHUNK_WORDS,
            quiz_questions: DEFAULT_QUESTIONS,
            combine_summaries: false,
        }
    }
}

/// Output of one successful run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: String,
    pub quiz: Vec<QuizRecord>,
}

/// URL in, summary and quiz out. Every step runs to completion before the next starts.
pub struct Pipeline<P, G> {
    provider: P,
    model: G,
    options: PipelineOptions,
}

impl<P: TranscriptProvider, G: TextGenerator> Pipeline<P, G> {
    pub fn new(provider: P, model: G, options: PipelineOptions) -> Self {
        Self {
            provider,
            model,
            options,
        }
    }

    /// Run the whole pipeline, writing progress lines to `progress`.
    pub async fn run<W: Write>(&self, url: &str, progress: &mut W) -> Result<Report> {
        let video_id = extract_video_id(url).ok_or_else(|| Error::UrlParse {
            input: url.trim().to_string(),
        })?;
        writeln!(progress, "Video ID: {video_id}")?;

        let fetched = self.provider.fetch(&video_id).await?;
        info!(
            "Fetched transcript for {video_id}: title={:?} lang={} segments={}",
            fetched.title,
            fetched.language,
            fetched.segments.len()
        );
        let transcript = fetched.text();
        writeln!(progress, "Transcript fetched. Length: {} characters.", transcript.chars().count())?;

        let chunks = chunk_words(&transcript, self.options.chunk_words);
        info!("Transcript for {video_id} split into {} chunks", chunks.len());
        let summary = summarize_chunks(&self.model, &chunks, self.options.combine_summaries, progress).await?;

        let quiz_text = quiz_input(&transcript, chunks.len(), self.options.chunk_words);
        writeln!(progress, "Generating quiz...")?;
        let quiz = generate_quiz(&self.model, quiz_text, self.options.quiz_questions).await?;
        info!("Generated {} quiz questions", quiz.len());

        Ok(Report { summary, quiz })
    }
}
