use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::Segment;

/// Whether a caption track was written by a person or produced by speech recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Manual,
    Generated,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Manual => write!(f, "manual"),
            TrackKind::Generated => write!(f, "generated"),
        }
    }
}

/// One caption stream for a video in one language
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub language: String,
    pub kind: TrackKind,
    pub base_url: String,
}

/// Caption tracks a video advertises, in the order the backend returned them
#[derive(Debug, Clone, Default)]
pub struct TrackList {
    pub video_id: String,
    pub tracks: Vec<CaptionTrack>,
}

impl TrackList {
    /// First track of `kind` matching the earliest listed language code
    pub fn find(&self, language_codes: &[&str], kind: TrackKind) -> Result<&CaptionTrack, BackendError> {
        language_codes
            .iter()
            .find_map(|code| {
                self.tracks
                    .iter()
                    .find(|t| t.kind == kind && t.language_code == *code)
            })
            .ok_or_else(|| BackendError::NoTranscriptFound {
                video_id: self.video_id.clone(),
                languages: language_codes.iter().map(|s| s.to_string()).collect(),
            })
    }

    /// Language codes in advertised order, without duplicates
    pub fn available_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = Vec::new();
        for track in &self.tracks {
            if !languages.contains(&track.language_code) {
                languages.push(track.language_code.clone());
            }
        }
        languages
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("no transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound { video_id: String, languages: Vec<String> },

    #[error("video {0} is unavailable")]
    VideoUnavailable(String),

    #[error("video {0} is age restricted")]
    AgeRestricted(String),

    #[error("YouTube is blocking requests for video {0}")]
    RequestBlocked(String),

    #[error("video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("could not parse YouTube response: {0}")]
    Unparsable(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Source of caption tracks and their timed text
#[async_trait]
pub trait TranscriptBackend: Send + Sync {
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList, BackendError>;

    async fn fetch_segments(&self, track: &CaptionTrack) -> Result<Vec<Segment>, BackendError>;

    fn select_track<'a>(
        &self,
        tracks: &'a TrackList,
        language_codes: &[&str],
        kind: TrackKind,
    ) -> Result<&'a CaptionTrack, BackendError> {
        tracks.find(language_codes, kind)
    }

    fn available_languages(&self, tracks: &TrackList) -> Vec<String> {
        tracks.available_languages()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled,

    #[error("No transcripts found for this video in any language.")]
    NoTranscriptAvailable,

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl From<BackendError> for FetchError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::TranscriptsDisabled(_) => FetchError::TranscriptsDisabled,
            BackendError::NoTranscriptFound { .. } => FetchError::NoTranscriptAvailable,
            other => FetchError::Unexpected(other.to_string()),
        }
    }
}

/// One step of the track fallback chain
#[derive(Debug, Clone, Copy)]
enum Selection {
    ManualPreferred,
    GeneratedPreferred,
    GeneratedAnyLanguage,
}

const FALLBACK_CHAIN: [Selection; 3] = [
    Selection::ManualPreferred,
    Selection::GeneratedPreferred,
    Selection::GeneratedAnyLanguage,
];

pub const DEFAULT_LANGUAGES: &[&str] = &["en"];

/// Finds the best caption track for a video and flattens it to plain text
pub struct TranscriptFetcher {
    backend: Arc<dyn TranscriptBackend>,
    languages: Vec<String>,
}

impl TranscriptFetcher {
    pub fn new(backend: Arc<dyn TranscriptBackend>, languages: Vec<String>) -> Self {
        let languages = if languages.is_empty() {
            DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect()
        } else {
            languages
        };
        Self { backend, languages }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Fetch the transcript for `video_id` as space-joined segment text
    pub async fn fetch(&self, video_id: &str) -> Result<String, FetchError> {
        match self.fetch_inner(video_id).await {
            Ok(text) => Ok(text),
            Err(e) => {
                match &e {
                    BackendError::TranscriptsDisabled(_) => warn!("Transcripts disabled for video {video_id}"),
                    BackendError::NoTranscriptFound { .. } => {
                        warn!("No transcript found for video {video_id} after all attempts.")
                    }
                    other => error!("Error fetching transcript for {video_id}: {other}"),
                }
                Err(e.into())
            }
        }
    }

    async fn fetch_inner(&self, video_id: &str) -> Result<String, BackendError> {
        let tracks = self.backend.list_tracks(video_id).await?;
        debug!("Video {video_id} advertises {} caption track(s)", tracks.tracks.len());

        let track = self.select(&tracks)?;
        info!(
            "Using {} transcript in language: {} for {video_id}",
            track.kind, track.language_code
        );

        let segments = self.backend.fetch_segments(track).await?;
        Ok(join_segments(&segments))
    }

    fn select<'a>(&self, tracks: &'a TrackList) -> Result<&'a CaptionTrack, BackendError> {
        let preferred: Vec<&str> = self.languages.iter().map(String::as_str).collect();
        let video_id = &tracks.video_id;

        for step in FALLBACK_CHAIN {
            let found = match step {
                Selection::ManualPreferred => self.backend.select_track(tracks, &preferred, TrackKind::Manual),
                Selection::GeneratedPreferred => {
                    info!("No manual {preferred:?} transcript for {video_id}. Trying generated.");
                    self.backend.select_track(tracks, &preferred, TrackKind::Generated)
                }
                Selection::GeneratedAnyLanguage => {
                    warn!("No generated {preferred:?} transcript for {video_id}. Trying any available.");
                    self.first_generated_in_any_language(tracks)
                }
            };

            match found {
                Ok(track) => return Ok(track),
                Err(BackendError::NoTranscriptFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(BackendError::NoTranscriptFound {
            video_id: video_id.clone(),
            languages: self.backend.available_languages(tracks),
        })
    }

    fn first_generated_in_any_language<'a>(&self, tracks: &'a TrackList) -> Result<&'a CaptionTrack, BackendError> {
        let languages = self.backend.available_languages(tracks);
        for code in &languages {
            match self.backend.select_track(tracks, &[code.as_str()], TrackKind::Generated) {
                Ok(track) => return Ok(track),
                Err(BackendError::NoTranscriptFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(BackendError::NoTranscriptFound {
            video_id: tracks.video_id.clone(),
            languages,
        })
    }
}

/// Join segment texts with single spaces, keeping segment order
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
