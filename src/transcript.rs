use log::{debug, info};

use crate::youtube::TranscriptProvider;
use crate::{Transcript, TranscriptError, VideoId};

/// Fetch and assemble the transcript for `video_id`.
///
/// Available transcripts are listed first; an empty listing ends here with
/// [`TranscriptError::NoTranscript`] and content is never requested. Otherwise
/// one request carries the whole ordered `languages` list.
pub async fn fetch_transcript<P: TranscriptProvider>(
    provider: &P,
    video_id: &VideoId,
    languages: &[String],
) -> Result<Transcript, TranscriptError> {
    let available = provider.list_transcripts(video_id.as_str()).await?;
    if available.is_empty() {
        return Err(TranscriptError::NoTranscript(video_id.to_string()));
    }
    debug!("{} transcript(s) listed for {video_id}", available.len());

    let segments = provider.get_transcript(video_id.as_str(), languages).await?;
    let transcript = Transcript::from_segments(video_id.clone(), &segments);
    info!(
        "Assembled transcript for {video_id}: {} segments, {} chars",
        segments.len(),
        transcript.text.len()
    );
    Ok(transcript)
}
