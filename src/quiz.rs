use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::gemini::TextGenerator;

pub const DEFAULT_QUESTIONS: usize = 10;
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Characters of transcript allowed per configured chunk word when the quiz
/// is built from a multi-chunk transcript. A rough chars-per-token ratio, not
/// a real token count.
pub const QUIZ_CHARS_PER_WORD: usize = 10;

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(thiserror::Error, Debug)]
pub enum QuizParseError {
    #[error("invalid quiz JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("question {index} has {count} options, expected 4")]
    OptionCount { index: usize, count: usize },
}

// First '[' through last ']', across newlines
static JSON_ARRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"));

pub fn quiz_prompt(text: &str, min_questions: usize) -> String {
    format!(
        "Generate a quiz of at least {min_questions} multiple-choice questions based on the following transcript. \
Each question should have {OPTIONS_PER_QUESTION} options, with one correct answer clearly marked. \
Format the output as a JSON array of objects with fields: 'question', 'options' (list of {OPTIONS_PER_QUESTION}), \
and 'answer' (the correct option as text). Do not include any explanations.\n\nTranscript:\n{text}"
    )
}

/// Parse quiz records out of a free-form model reply.
///
/// The first bracketed span (first `[` to last `]`) is tried when present,
/// otherwise the whole reply. The result must deserialize into records with
/// exactly four options each.
pub fn parse_quiz(response: &str) -> std::result::Result<Vec<QuizRecord>, QuizParseError> {
    let candidate = match JSON_ARRAY.find(response) {
        Some(m) => m.as_str(),
        None => {
            debug!("No JSON array found in quiz response, parsing it whole");
            response
        }
    };

    let records: Vec<QuizRecord> = serde_json::from_str(candidate)?;
    if let Some((index, record)) = records
        .iter()
        .enumerate()
        .find(|(_, r)| r.options.len() != OPTIONS_PER_QUESTION)
    {
        return Err(QuizParseError::OptionCount {
            index: index + 1,
            count: record.options.len(),
        });
    }
    Ok(records)
}

/// Pick the text the quiz is generated from: the whole transcript when it fit
/// in one chunk, otherwise a prefix of `chunk_words * QUIZ_CHARS_PER_WORD` characters.
/// A `chunk_words` of 0 is treated as 1, as in the chunker.
pub fn quiz_input(transcript: &str, chunk_count: usize, chunk_words: usize) -> &str {
    if chunk_count == 1 {
        return transcript;
    }
    let limit = chunk_words.max(1).saturating_mul(QUIZ_CHARS_PER_WORD);
    match transcript.char_indices().nth(limit) {
        Some((end, _)) => &transcript[..end],
        None => transcript,
    }
}

pub async fn generate_quiz<G: TextGenerator>(model: &G, text: &str, min_questions: usize) -> Result<Vec<QuizRecord>> {
    let response = model
        .generate(&quiz_prompt(text, min_questions))
        .await
        .map_err(|e| Error::QuizGeneration(e.to_string()))?;

    let records = parse_quiz(&response).map_err(|e| Error::QuizGeneration(e.to_string()))?;

    if records.len() < min_questions {
        warn!("Model returned {} quiz questions, asked for at least {min_questions}", records.len());
    }
    for (i, r) in records.iter().enumerate() {
        if !r.options.contains(&r.answer) {
            warn!("Quiz question {} answer {:?} is not one of its options", i + 1, r.answer);
        }
    }
    Ok(records)
}
