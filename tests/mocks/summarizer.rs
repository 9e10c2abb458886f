use std::sync::{Arc, Mutex};

use ytsum::summarize::{Summarize, build_input};
use ytsum::{SummarizeError, Transcript};

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub prompt: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            prompt: "Summarize: ".to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }
}

impl Summarize for MockSummarizer {
    async fn summarize(&self, transcript: &Transcript) -> Result<String, SummarizeError> {
        self.calls.lock().unwrap().push(build_input(&self.prompt, transcript));
        if let Some(ref msg) = self.fail_with {
            return Err(SummarizeError::Other(msg.clone()));
        }
        Ok(self.summary.clone())
    }
}
