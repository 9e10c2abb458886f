use log::{info, warn};
use serde::Serialize;

use crate::summarize::Summarize;
use crate::transcript::fetch_transcript;
use crate::youtube::TranscriptProvider;
use crate::{TranscriptError, VideoId, extract_video_id};

pub const INVALID_URL_MESSAGE: &str = "The YouTube URL has an invalid format.";
pub const NO_TRANSCRIPT_MESSAGE: &str = "Sorry, no transcript available for the provided YouTube video.";
pub const DISABLED_MESSAGE: &str = "Subtitles are disabled for this video.";

/// Where a single submission ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    InvalidUrl {
        message: String,
    },
    NoTranscript {
        video_id: VideoId,
        thumbnail_url: String,
        message: String,
    },
    FetchError {
        video_id: VideoId,
        thumbnail_url: String,
        message: String,
    },
    SummaryFailed {
        video_id: VideoId,
        thumbnail_url: String,
        message: String,
    },
    Summarized {
        video_id: VideoId,
        thumbnail_url: String,
        summary: String,
    },
}

impl Outcome {
    /// Thumbnail to show, present once an ID was resolved.
    pub fn thumbnail_url(&self) -> Option<&str> {
        match self {
            Outcome::InvalidUrl { .. } => None,
            Outcome::NoTranscript { thumbnail_url, .. }
            | Outcome::FetchError { thumbnail_url, .. }
            | Outcome::SummaryFailed { thumbnail_url, .. }
            | Outcome::Summarized { thumbnail_url, .. } => Some(thumbnail_url),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Summarized { .. })
    }
}

/// Request-scoped dependencies; nothing here is mutated by a run.
pub struct Pipeline<'a, P, S> {
    pub provider: &'a P,
    pub summarizer: &'a S,
    pub languages: &'a [String],
}

impl<P: TranscriptProvider, S: Summarize> Pipeline<'_, P, S> {
    /// Resolve, fetch and summarize one URL. Never fails; every error becomes an [`Outcome`].
    pub async fn run(&self, url: &str) -> Outcome {
        let video_id = match extract_video_id(url) {
            Ok(id) => id,
            Err(e) => {
                warn!("{e}");
                return Outcome::InvalidUrl {
                    message: INVALID_URL_MESSAGE.to_string(),
                };
            }
        };
        let thumbnail_url = video_id.thumbnail_url();
        info!("Resolved {url} to video {video_id}");

        let transcript = match fetch_transcript(self.provider, &video_id, self.languages).await {
            Ok(t) => t,
            Err(e) => {
                warn!("Transcript unavailable for {video_id}: {e}");
                let message = transcript_message(&e);
                return if e.is_no_transcript() {
                    Outcome::NoTranscript {
                        video_id,
                        thumbnail_url,
                        message,
                    }
                } else {
                    Outcome::FetchError {
                        video_id,
                        thumbnail_url,
                        message,
                    }
                };
            }
        };

        match self.summarizer.summarize(&transcript).await {
            Ok(summary) => {
                info!("Summarized {video_id} ({} chars)", summary.len());
                Outcome::Summarized {
                    video_id,
                    thumbnail_url,
                    summary,
                }
            }
            Err(e) => {
                warn!("Summarization failed for {video_id}: {e}");
                Outcome::SummaryFailed {
                    video_id,
                    thumbnail_url,
                    message: format!("Summarization failed: {e}"),
                }
            }
        }
    }
}

fn transcript_message(err: &TranscriptError) -> String {
    match err {
        TranscriptError::Disabled(_) => DISABLED_MESSAGE.to_string(),
        TranscriptError::NoTranscript(_) => NO_TRANSCRIPT_MESSAGE.to_string(),
        other => format!("An error occurred: {other}"),
    }
}
