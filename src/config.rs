use std::path::{Path, PathBuf};

use eyre::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub default_model: Option<String>,
    pub chunk_words: Option<usize>,
    pub quiz_questions: Option<usize>,
    pub temperature: Option<f32>,
}

impl Config {
    /// Load config from ~/.config/ytquiz/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// `chunk_words` from the file, ignoring zero
    pub fn chunk_words(&self) -> Option<usize> {
        positive("chunk_words", self.chunk_words)
    }

    /// `quiz_questions` from the file, ignoring zero
    pub fn quiz_questions(&self) -> Option<usize> {
        positive("quiz_questions", self.quiz_questions)
    }
}

fn positive(key: &str, value: Option<usize>) -> Option<usize> {
    match value {
        Some(0) => {
            warn!("Ignoring {key} = 0 in config file");
            None
        }
        other => other,
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytquiz")
        .join("config.toml")
}

/// Load a `.env` file from the working directory, if there is one
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded: {e}"),
    }
}

/// Read the model credential; empty values count as missing
pub fn api_key_from_env() -> std::result::Result<String, Error> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> std::result::Result<String, Error> {
    value
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::MissingCredential {
            var: API_KEY_VAR.to_string(),
        })
}
