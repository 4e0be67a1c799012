use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::summarize::summarize;
use crate::transcript::{FetchError, TranscriptFetcher};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummaryError {
    #[error("Please enter a YouTube video URL.")]
    EmptyInput,

    #[error(
        "Invalid YouTube URL or could not extract Video ID. Please use a valid format \
         (e.g., https://www.youtube.com/watch?v=VIDEO_ID or https://youtu.be/VIDEO_ID)."
    )]
    UnparseableUrl,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Could not generate summary from the transcript.")]
    EmptyTranscriptResult,
}

/// Everything the page needs to show for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub summary: Option<String>,
    pub error: Option<String>,
    pub input_url: String,
    /// Raw transcript, only when an error followed a successful fetch
    pub raw_transcript: Option<String>,
}

pub struct RequestHandler {
    fetcher: TranscriptFetcher,
}

impl RequestHandler {
    pub fn new(fetcher: TranscriptFetcher) -> Self {
        Self { fetcher }
    }

    /// Turn a submitted URL into the page model
    pub async fn handle(&self, raw_url: &str) -> DisplayModel {
        let input_url = raw_url.trim().to_string();

        let (summary, error, raw_transcript) = match self.summarize_url(&input_url).await {
            Ok(summary) => (Some(summary), None, None),
            Err((e, fetched)) => {
                warn!("Summary failed for {input_url:?}: {e}");
                (None, Some(e.to_string()), fetched.filter(|t| !t.is_empty()))
            }
        };

        DisplayModel {
            summary,
            error,
            input_url,
            raw_transcript,
        }
    }

    async fn summarize_url(&self, url: &str) -> Result<String, (SummaryError, Option<String>)> {
        if url.is_empty() {
            return Err((SummaryError::EmptyInput, None));
        }

        let video_id = crate::extract_video_id(url).ok_or((SummaryError::UnparseableUrl, None))?;
        info!("Processing video ID: {video_id}");

        let text = self
            .fetcher
            .fetch(&video_id)
            .await
            .map_err(|e| (SummaryError::from(e), None))?;

        if text.is_empty() {
            return Err((SummaryError::EmptyTranscriptResult, None));
        }

        let summary = summarize(&text);
        if summary.is_empty() {
            return Err((SummaryError::EmptyTranscriptResult, Some(text)));
        }
        Ok(summary)
    }
}
