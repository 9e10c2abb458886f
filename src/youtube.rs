use std::future::Future;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Segment, TranscriptError};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const WATCH_URL: &str = "https://www.youtube.com/watch?v={video_id}";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false";

/// One transcript a video offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub language_code: String,
    pub name: String,
    pub is_generated: bool,
    pub base_url: String,
}

/// Source of transcripts for a video
pub trait TranscriptProvider {
    /// Every transcript the video offers, in any language.
    fn list_transcripts(&self, video_id: &str) -> impl Future<Output = Result<Vec<TrackInfo>, TranscriptError>> + Send;

    /// Segments of the first transcript matching `languages`, tried in order.
    fn get_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> impl Future<Output = Result<Vec<Segment>, TranscriptError>> + Send;
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn into_text(self) -> String {
        if let Some(text) = self.simple_text {
            return text;
        }
        self.runs
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

/// YouTube's built-in captions, read through the InnerTube API
#[derive(Debug, Clone, Default)]
pub struct YouTube {
    client: reqwest::Client,
}

impl YouTube {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn player(&self, video_id: &str) -> Result<PlayerResponse, TranscriptError> {
        let watch_url = WATCH_URL.replace("{video_id}", video_id);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let resp = self
            .client
            .post(PLAYER_URL.replace("{api_key}", &api_key))
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp)
    }
}

impl TranscriptProvider for YouTube {
    async fn list_transcripts(&self, video_id: &str) -> Result<Vec<TrackInfo>, TranscriptError> {
        let resp = self.player(video_id).await?;
        let tracks = tracks_from_player(video_id, resp)?;
        debug!("Video {video_id} offers {} caption track(s)", tracks.len());
        Ok(tracks)
    }

    async fn get_transcript(&self, video_id: &str, languages: &[String]) -> Result<Vec<Segment>, TranscriptError> {
        let tracks = self.list_transcripts(video_id).await?;
        let track = select_track(video_id, &tracks, languages)?;
        debug!(
            "Using caption track: {} (lang={} generated={})",
            track.name, track.language_code, track.is_generated
        );

        let caption_xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

fn extract_api_key(html: &str) -> Result<String, TranscriptError> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).map_err(|e| TranscriptError::Unparsable(e.to_string()))?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).map_err(|e| TranscriptError::Unparsable(e.to_string()))?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(TranscriptError::Unparsable(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn tracks_from_player(video_id: &str, resp: PlayerResponse) -> Result<Vec<TrackInfo>, TranscriptError> {
    if let Some(status) = resp.playability_status.filter(|s| s.status != "OK") {
        return Err(TranscriptError::Unplayable {
            video_id: video_id.to_string(),
            reason: status.reason.unwrap_or(status.status),
        });
    }

    // A playable video without a captions block has had them turned off.
    let renderer = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .ok_or_else(|| TranscriptError::Disabled(video_id.to_string()))?;

    let tracks = renderer
        .caption_tracks
        .unwrap_or_default()
        .into_iter()
        .map(|t| TrackInfo {
            is_generated: t.kind.as_deref() == Some("asr"),
            name: t.name.map(TrackName::into_text).unwrap_or_default(),
            base_url: t.base_url.replace("&fmt=srv3", ""),
            language_code: t.language_code,
        })
        .collect();

    Ok(tracks)
}

/// First track in `languages` order, manually created tracks before generated ones.
fn select_track<'a>(
    video_id: &str,
    tracks: &'a [TrackInfo],
    languages: &[String],
) -> Result<&'a TrackInfo, TranscriptError> {
    for lang in languages {
        let mut candidates = tracks.iter().filter(|t| &t.language_code == lang);
        let manual = candidates.clone().find(|t| !t.is_generated);
        if let Some(track) = manual.or_else(|| candidates.next()) {
            return Ok(track);
        }
    }

    Err(TranscriptError::LanguageUnavailable {
        video_id: video_id.to_string(),
        languages: languages.to_vec(),
    })
}

/// Segment being read; emitted when its `</text>` closes.
struct PendingSegment {
    start: f64,
    duration: f64,
    text: String,
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>, TranscriptError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut pending: Option<PendingSegment> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                // Missing timing defaults to zero; the text is kept either way.
                pending = Some(PendingSegment {
                    start: start.unwrap_or_default(),
                    duration: dur.unwrap_or_default(),
                    text: String::new(),
                });
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut segment) = pending {
                    let raw_text = e.unescape().unwrap_or_default();
                    segment.text.push_str(&html_escape::decode_html_entities(&raw_text));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                if let Some(segment) = pending.take().filter(|s| !s.text.trim().is_empty()) {
                    segments.push(Segment {
                        text: segment.text,
                        start: segment.start,
                        duration: segment.duration,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TranscriptError::Unparsable(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
