use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::Segment;
use crate::transcript::{BackendError, CaptionTrack, TrackKind, TrackList, TranscriptBackend};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const ANDROID_CLIENT_VERSION: &str = "20.10.38";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
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
    caption_tracks: Option<Vec<InnerTubeCaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct InnerTubeCaptionTrack {
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
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.as_ref()?.first().map(|r| r.text.clone()))
    }
}

/// Transcript backend talking to YouTube's InnerTube player API
pub struct InnerTubeBackend {
    client: reqwest::Client,
}

impl InnerTubeBackend {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Backend with its own HTTP client bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::new(client))
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, BackendError> {
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en-US")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<InnerTubePlayerResponse, BackendError> {
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": ANDROID_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let resp = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}

#[async_trait]
impl TranscriptBackend for InnerTubeBackend {
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList, BackendError> {
        let page_html = self.fetch_watch_page(video_id).await?;
        let api_key = extract_api_key(&page_html, video_id)?;
        debug!("Extracted InnerTube API key: {api_key}");

        let resp = self.fetch_player(video_id, &api_key).await?;
        track_list_from_player(video_id, resp)
    }

    async fn fetch_segments(&self, track: &CaptionTrack) -> Result<Vec<Segment>, BackendError> {
        debug!("Fetching {} caption track: lang={}", track.kind, track.language_code);

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

fn extract_api_key(html: &str, video_id: &str) -> Result<String, BackendError> {
    if html.contains("class=\"g-recaptcha\"") {
        return Err(BackendError::RequestBlocked(video_id.to_string()));
    }

    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).map_err(|e| BackendError::Unparsable(e.to_string()))?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).map_err(|e| BackendError::Unparsable(e.to_string()))?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    Err(BackendError::Unparsable(format!(
        "could not extract InnerTube API key from watch page of {video_id}"
    )))
}

fn check_playability(video_id: &str, status: Option<&PlayabilityStatus>) -> Result<(), BackendError> {
    let Some(status) = status else {
        return Ok(());
    };
    let code = status.status.as_deref().unwrap_or("OK");
    if code == "OK" {
        return Ok(());
    }
    let reason = status.reason.clone().unwrap_or_default();

    match code {
        "LOGIN_REQUIRED" if reason.contains("not a bot") => Err(BackendError::RequestBlocked(video_id.to_string())),
        "LOGIN_REQUIRED" if reason.contains("inappropriate") => Err(BackendError::AgeRestricted(video_id.to_string())),
        "ERROR" if reason.contains("unavailable") => Err(BackendError::VideoUnavailable(video_id.to_string())),
        _ => Err(BackendError::VideoUnplayable {
            video_id: video_id.to_string(),
            reason,
        }),
    }
}

fn track_list_from_player(video_id: &str, resp: InnerTubePlayerResponse) -> Result<TrackList, BackendError> {
    check_playability(video_id, resp.playability_status.as_ref())?;

    let renderer = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .ok_or_else(|| BackendError::TranscriptsDisabled(video_id.to_string()))?;

    let tracks = renderer
        .caption_tracks
        .unwrap_or_default()
        .into_iter()
        .map(|t| {
            let kind = match t.kind.as_deref() {
                Some("asr") => TrackKind::Generated,
                _ => TrackKind::Manual,
            };
            let language = t.name.as_ref().and_then(TrackName::text).unwrap_or_else(|| t.language_code.clone());
            CaptionTrack {
                language,
                kind,
                base_url: t.base_url.replace("&fmt=srv3", ""),
                language_code: t.language_code,
            }
        })
        .collect();

    Ok(TrackList {
        video_id: video_id.to_string(),
        tracks,
    })
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>, BackendError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

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
                current_start = start;
                // Some tracks omit `dur` on the final cue
                current_dur = dur.or(Some(0.0));
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).trim().to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: dur,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(BackendError::Unparsable(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
