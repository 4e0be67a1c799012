use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::Segment;
use crate::transcript::{BackendError, CaptionTrack, TrackKind, TrackList, TranscriptBackend};

enum Listing {
    Tracks(Vec<(CaptionTrack, Vec<String>)>),
    Disabled,
    Failing(String),
}

/// In-memory backend: each track carries its transcript, one segment per word
pub struct MockBackend {
    listing: Listing,
    segment_failure: Option<String>,
    list_calls: AtomicUsize,
}

pub fn track(language_code: &str, kind: TrackKind) -> CaptionTrack {
    CaptionTrack {
        language_code: language_code.to_string(),
        language: language_code.to_string(),
        kind,
        base_url: format!("https://example.test/timedtext?lang={language_code}&kind={kind}"),
    }
}

impl MockBackend {
    pub fn with_tracks(tracks: Vec<(CaptionTrack, &str)>) -> Self {
        let tracks = tracks
            .into_iter()
            .map(|(t, text)| (t, text.split_whitespace().map(str::to_string).collect()))
            .collect();
        Self::new(Listing::Tracks(tracks))
    }

    pub fn disabled() -> Self {
        Self::new(Listing::Disabled)
    }

    pub fn failing(message: &str) -> Self {
        Self::new(Listing::Failing(message.to_string()))
    }

    pub fn failing_segments(mut self, message: &str) -> Self {
        self.segment_failure = Some(message.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn new(listing: Listing) -> Self {
        Self {
            listing,
            segment_failure: None,
            list_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TranscriptBackend for MockBackend {
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.listing {
            Listing::Tracks(tracks) => Ok(TrackList {
                video_id: video_id.to_string(),
                tracks: tracks.iter().map(|(t, _)| t.clone()).collect(),
            }),
            Listing::Disabled => Err(BackendError::TranscriptsDisabled(video_id.to_string())),
            Listing::Failing(message) => Err(BackendError::Unparsable(message.clone())),
        }
    }

    async fn fetch_segments(&self, track: &CaptionTrack) -> Result<Vec<Segment>, BackendError> {
        if let Some(message) = &self.segment_failure {
            return Err(BackendError::Unparsable(message.clone()));
        }
        let Listing::Tracks(tracks) = &self.listing else {
            return Err(BackendError::Unparsable("no tracks listed".to_string()));
        };
        let texts = tracks
            .iter()
            .find(|(t, _)| t == track)
            .map(|(_, texts)| texts.clone())
            .unwrap_or_default();
        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Segment {
                text,
                start: i as f64,
                duration: 1.0,
            })
            .collect())
    }
}
