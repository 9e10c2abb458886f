use std::sync::{Arc, Mutex};

use ytsum::youtube::{TrackInfo, TranscriptProvider};
use ytsum::{Segment, TranscriptError};

#[derive(Debug, Clone)]
pub enum Failure {
    Disabled,
    Unplayable(&'static str),
}

#[derive(Clone, Default)]
pub struct MockProvider {
    pub tracks: Vec<TrackInfo>,
    pub segments: Vec<String>,
    pub list_failure: Option<Failure>,
    pub get_failure: Option<Failure>,
    pub list_calls: Arc<Mutex<Vec<String>>>,
    pub get_calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockProvider {
    pub fn with_segments(segments: &[&str]) -> Self {
        Self {
            tracks: vec![TrackInfo {
                language_code: "en".to_string(),
                name: "English".to_string(),
                is_generated: false,
                base_url: "https://example.test/captions".to_string(),
            }],
            segments: segments.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn without_tracks() -> Self {
        Self::default()
    }

    pub fn failing_list(failure: Failure) -> Self {
        Self {
            list_failure: Some(failure),
            ..Self::with_segments(&[])
        }
    }

    pub fn failing_get(failure: Failure) -> Self {
        Self {
            get_failure: Some(failure),
            ..Self::with_segments(&[])
        }
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.lock().unwrap().len() + self.get_calls.lock().unwrap().len()
    }
}

fn to_error(failure: &Failure, video_id: &str) -> TranscriptError {
    match failure {
        Failure::Disabled => TranscriptError::Disabled(video_id.to_string()),
        Failure::Unplayable(reason) => TranscriptError::Unplayable {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        },
    }
}

impl TranscriptProvider for MockProvider {
    async fn list_transcripts(&self, video_id: &str) -> Result<Vec<TrackInfo>, TranscriptError> {
        self.list_calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref failure) = self.list_failure {
            return Err(to_error(failure, video_id));
        }
        Ok(self.tracks.clone())
    }

    async fn get_transcript(&self, video_id: &str, languages: &[String]) -> Result<Vec<Segment>, TranscriptError> {
        self.get_calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));
        if let Some(ref failure) = self.get_failure {
            return Err(to_error(failure, video_id));
        }
        Ok(self
            .segments
            .iter()
            .enumerate()
            .map(|(i, text)| Segment {
                text: text.clone(),
                start: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect())
    }
}
