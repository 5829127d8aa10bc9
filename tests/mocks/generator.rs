use std::sync::{Arc, Mutex};

use ytquiz::TextGenerator;

pub const QUIZ_REPLY: &str =
    "Here is the quiz:\n[{\"question\":\"Q1\",\"options\":[\"A\",\"B\",\"C\",\"D\"],\"answer\":\"A\"}]\nEnjoy!";

/// Answers summary prompts with a numbered summary and quiz prompts with `quiz_reply`
#[derive(Clone)]
pub struct MockGenerator {
    pub quiz_reply: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_on_call: Option<usize>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            quiz_reply: QUIZ_REPLY.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on_call: None,
        }
    }

    pub fn with_quiz_reply(reply: &str) -> Self {
        Self {
            quiz_reply: reply.to_string(),
            ..Self::new()
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> eyre::Result<String> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len()
        };
        if self.fail_on_call == Some(n) {
            eyre::bail!("model unavailable");
        }
        if prompt.starts_with("Generate a quiz") {
            Ok(self.quiz_reply.clone())
        } else {
            Ok(format!("Summary {n}.\n"))
        }
    }
}
