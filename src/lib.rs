pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod transcript;
pub mod web;
pub mod youtube;

use log::debug;
use serde::Serialize;

pub use error::{ResolveError, SummarizeError, TranscriptError};

const THUMBNAIL_URL: &str = "http://img.youtube.com/vi/{video_id}/0.jpg";

/// A single captioned segment
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Transcript text assembled from provider segments, in provider order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub video_id: VideoId,
    pub text: String,
}

impl Transcript {
    pub fn from_segments(video_id: VideoId, segments: &[Segment]) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self { video_id, text }
    }
}

/// Video identifier as extracted from a URL. Content is not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn thumbnail_url(&self) -> String {
        THUMBNAIL_URL.replace("{video_id}", &self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the video ID from a watch URL (`v=`) or a short link (`youtu.be`).
///
/// `v=` wins when both are present: the ID is whatever follows the last `v=`,
/// cut at the first `&`. For short links it is everything after the last `/`.
/// A shape match with nothing after it yields an empty ID, not an error.
pub fn extract_video_id(url: &str) -> Result<VideoId, ResolveError> {
    if let Some((_, rest)) = url.rsplit_once("v=") {
        let id = rest.split('&').next().unwrap_or_default();
        debug!("Video ID with 'v=': {id}");
        return Ok(VideoId(id.to_string()));
    }

    if url.contains("youtu.be") {
        let id = url.rsplit('/').next().unwrap_or_default();
        debug!("Video ID with 'youtu.be': {id}");
        return Ok(VideoId(id.to_string()));
    }

    Err(ResolveError(url.to_string()))
}

#[cfg(test)]
pub(crate) fn video_id(id: &str) -> VideoId {
    VideoId(id.to_string())
}
