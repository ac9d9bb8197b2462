//! Transcript Fetcher - A Rust CLI tool for fetching YouTube caption transcripts
//!
//! This library lists the caption tracks a video offers, picks one with a
//! language-preference fallback policy, downloads it, and renders the result
//! as a JSON envelope or plain text.

pub mod cli;
pub mod config;
pub mod output;
pub mod selection;
pub mod utils;
pub mod youtube;

pub use cli::{Cli, OutputFormat};
pub use config::Config;
pub use output::TranscriptResponse;
pub use selection::{FetchedTranscript, TranscriptSelector};
pub use youtube::{Segment, TrackInfo, TranscriptList, TranscriptSource, YoutubeClient};

/// Error types specific to transcript retrieval
#[derive(thiserror::Error, Debug)]
pub enum FetcherError {
    #[error("HTTP client unavailable: {0}")]
    DependencyMissing(String),

    #[error("Invalid HTTP configuration: {0}")]
    InvalidConfig(String),

    #[error("Not a valid YouTube video id or URL: {0}")]
    InvalidVideoId(String),

    #[error("Transcripts are disabled for this video")]
    TranscriptsDisabled,

    #[error("No transcripts found for this video")]
    NoTranscriptFound,

    #[error("No suitable transcript found in preferred languages")]
    NoSuitableTranscript,

    #[error("Transcript {language_code} cannot be translated to {target}")]
    NotTranslatable { language_code: String, target: String },

    #[error("Video is unavailable or private")]
    VideoUnavailable,

    #[error("Video is unplayable: {0}")]
    VideoUnplayable(String),

    #[error("Video is age restricted and requires sign-in")]
    AgeRestricted,

    #[error("Too many requests to YouTube. Please try again later")]
    RateLimited,

    #[error("Request to YouTube failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse YouTube response: {0}")]
    Parse(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl FetcherError {
    /// Stable category string reported as `error_type` in the envelope
    pub fn category(&self) -> &'static str {
        match self {
            FetcherError::DependencyMissing(_) => "dependency_missing",
            FetcherError::InvalidConfig(_) => "invalid_config",
            FetcherError::InvalidVideoId(_) => "invalid_video_id",
            FetcherError::TranscriptsDisabled => "transcripts_disabled",
            FetcherError::NoTranscriptFound => "no_transcript_found",
            FetcherError::NoSuitableTranscript => "no_suitable_transcript",
            FetcherError::NotTranslatable { .. } => "not_translatable",
            FetcherError::VideoUnavailable => "video_unavailable",
            FetcherError::VideoUnplayable(_) => "video_unplayable",
            FetcherError::AgeRestricted => "age_restricted",
            FetcherError::RateLimited => "rate_limited",
            FetcherError::RequestFailed(_) => "request_failed",
            FetcherError::Parse(_) => "parse_error",
            FetcherError::Unexpected(_) => "unexpected_error",
        }
    }
}

impl From<reqwest::Error> for FetcherError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 429 => FetcherError::RateLimited,
            _ => FetcherError::RequestFailed(err.to_string()),
        }
    }
}

/// List the tracks and fetch the best transcript, reporting failures in the envelope
pub async fn fetch_transcript(
    source: &dyn TranscriptSource,
    video_id: &str,
    selector: &TranscriptSelector,
) -> TranscriptResponse {
    let list = match source.list_transcripts(video_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("Failed to list transcripts for {}: {}", video_id, e);
            return TranscriptResponse::failed(Some(video_id), &e, None);
        }
    };

    match selector.fetch_best(source, &list).await {
        Ok(fetched) => TranscriptResponse::fetched(&list, fetched),
        Err(e) => TranscriptResponse::failed(Some(video_id), &e, Some(&list)),
    }
}

/// List the available tracks without fetching any content
pub async fn list_transcripts(source: &dyn TranscriptSource, video_id: &str) -> TranscriptResponse {
    match source.list_transcripts(video_id).await {
        Ok(list) => TranscriptResponse::listed(&list),
        Err(e) => TranscriptResponse::failed(Some(video_id), &e, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::{test_track, MockTranscriptSource};

    fn selector() -> TranscriptSelector {
        TranscriptSelector::new(vec!["en".to_string()], vec![])
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(FetcherError::TranscriptsDisabled.category(), "transcripts_disabled");
        assert_eq!(FetcherError::RateLimited.category(), "rate_limited");
        assert_eq!(
            FetcherError::DependencyMissing("tls".into()).category(),
            "dependency_missing"
        );
        assert_eq!(
            FetcherError::Unexpected("boom".into()).category(),
            "unexpected_error"
        );
    }

    #[tokio::test]
    async fn test_disabled_transcripts_become_envelope() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_transcripts()
            .returning(|_| Err(FetcherError::TranscriptsDisabled));
        source.expect_fetch_segments().never();

        let response = fetch_transcript(&source, "dQw4w9WgXcQ", &selector()).await;

        assert!(!response.success);
        assert_eq!(response.error_type.as_deref(), Some("transcripts_disabled"));
        assert_eq!(response.video_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn test_successful_fetch() {
        let mut source = MockTranscriptSource::new();
        source.expect_list_transcripts().returning(|id| {
            Ok(TranscriptList {
                video_id: id.to_string(),
                tracks: vec![test_track("en", false, false)],
                translation_languages: vec![],
            })
        });
        source.expect_fetch_segments().times(1).returning(|_, _| {
            Ok(vec![Segment {
                start_time: 0.0,
                duration: 1.0,
                text: "hi".to_string(),
            }])
        });

        let response = fetch_transcript(&source, "dQw4w9WgXcQ", &selector()).await;

        assert!(response.success);
        let transcript = response.transcript.unwrap();
        assert!(!transcript.is_empty());
        assert_eq!(response.metadata.unwrap().total_segments, 1);
    }

    #[tokio::test]
    async fn test_empty_transcript_is_not_success() {
        let mut source = MockTranscriptSource::new();
        source.expect_list_transcripts().returning(|id| {
            Ok(TranscriptList {
                video_id: id.to_string(),
                tracks: vec![test_track("en", true, false)],
                translation_languages: vec![],
            })
        });
        source.expect_fetch_segments().returning(|_, _| Ok(vec![]));

        let response = fetch_transcript(&source, "dQw4w9WgXcQ", &selector()).await;

        assert!(!response.success);
        assert_eq!(response.error_type.as_deref(), Some("no_suitable_transcript"));
        assert_eq!(response.available_transcripts.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_only() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_transcripts()
            .returning(|_| Err(FetcherError::VideoUnavailable));

        let response = list_transcripts(&source, "dQw4w9WgXcQ").await;
        assert_eq!(response.error_type.as_deref(), Some("video_unavailable"));
    }
}
