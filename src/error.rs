use thiserror::Error;

/// The input matched neither `v=` nor `youtu.be`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The YouTube URL has an invalid format: {0}")]
pub struct ResolveError(pub String);

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("subtitles are disabled for video {0}")]
    Disabled(String),

    #[error("no transcripts available for video {0}")]
    NoTranscript(String),

    #[error("no transcript found for video {video_id} in languages {languages:?}")]
    LanguageUnavailable { video_id: String, languages: Vec<String> },

    #[error("video {video_id} is unplayable: {reason}")]
    Unplayable { video_id: String, reason: String },

    #[error("could not parse YouTube response: {0}")]
    Unparsable(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl TranscriptError {
    /// Outcomes that mean "this video has nothing to summarize" rather than a failure.
    pub fn is_no_transcript(&self) -> bool {
        matches!(self, TranscriptError::Disabled(_) | TranscriptError::NoTranscript(_))
    }
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("{provider} API returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected {0} API response format")]
    UnexpectedResponse(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}
