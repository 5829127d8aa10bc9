use std::sync::{Arc, Mutex};

use ytquiz::{Error, Segment, Transcript, TranscriptProvider, VideoId};

#[derive(Clone, Copy, Debug)]
pub enum Failure {
    Disabled,
    NotFound,
    VideoUnavailable,
    Network,
}

#[derive(Clone)]
pub struct MockProvider {
    pub fragments: Vec<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<Failure>,
}

impl MockProvider {
    pub fn new(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn words(n: usize) -> Self {
        let text = (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        Self::new(&[text.as_str()])
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            fragments: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(failure),
        }
    }
}

impl TranscriptProvider for MockProvider {
    async fn fetch(&self, video_id: &VideoId) -> Result<Transcript, Error> {
        self.calls.lock().unwrap().push(video_id.to_string());
        let video_id = video_id.to_string();
        match self.fail_with {
            Some(Failure::Disabled) | Some(Failure::NotFound) => Err(Error::TranscriptUnavailable { video_id }),
            Some(Failure::VideoUnavailable) => Err(Error::VideoUnavailable { video_id, reason: None }),
            Some(Failure::Network) => Err(Error::Fetch("connection reset".to_string())),
            None => Ok(Transcript {
                video_id,
                title: "Mock Video".to_string(),
                language: "en".to_string(),
                segments: self
                    .fragments
                    .iter()
                    .enumerate()
                    .map(|(i, text)| Segment {
                        text: text.clone(),
                        start: i as f64,
                        duration: 1.0,
                    })
                    .collect(),
            }),
        }
    }
}
