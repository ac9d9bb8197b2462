use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod captions;
pub mod client;

pub use client::YoutubeClient;

use crate::FetcherError;

/// Individual caption segment with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start_time: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Caption text with markup removed
    pub text: String,
}

/// One caption track the video offers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Human-readable language name, e.g. "English (auto-generated)"
    pub language: String,

    /// Language code, e.g. "en" or "pt-BR"
    pub language_code: String,

    /// Whether the track was produced by speech recognition
    pub is_generated: bool,

    /// Whether the platform can machine-translate this track
    pub is_translatable: bool,

    #[serde(skip)]
    pub base_url: String,
}

/// Target language a translatable track can be converted into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    pub language: String,
    pub language_code: String,
}

/// All caption tracks for a video, in the order the platform lists them
#[derive(Debug, Clone, Default)]
pub struct TranscriptList {
    pub video_id: String,
    pub tracks: Vec<TrackInfo>,
    pub translation_languages: Vec<TranslationLanguage>,
}

impl TranscriptList {
    /// Manually created track with exactly this code
    pub fn find_manual(&self, language_code: &str) -> Option<usize> {
        self.tracks
            .iter()
            .position(|t| !t.is_generated && t.language_code == language_code)
    }

    /// Auto-generated track with exactly this code
    pub fn find_generated(&self, language_code: &str) -> Option<usize> {
        self.tracks
            .iter()
            .position(|t| t.is_generated && t.language_code == language_code)
    }

    pub fn can_translate_to(&self, language_code: &str) -> bool {
        self.translation_languages
            .iter()
            .any(|l| l.language_code == language_code)
    }
}

/// Seam between the language-selection policy and network I/O
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the caption tracks available for a video
    async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList, FetcherError>;

    /// Download one track, optionally machine-translated into `translate_to`.
    ///
    /// Fails with `NotTranslatable` when the track itself cannot be
    /// translated. Callers pick `translate_to` from the list's
    /// `translation_languages`.
    async fn fetch_segments(
        &self,
        track: &TrackInfo,
        translate_to: Option<String>,
    ) -> Result<Vec<Segment>, FetcherError>;
}

#[cfg(test)]
pub(crate) fn test_track(code: &str, generated: bool, translatable: bool) -> TrackInfo {
    TrackInfo {
        language: code.to_string(),
        language_code: code.to_string(),
        is_generated: generated,
        is_translatable: translatable,
        base_url: format!("https://www.youtube.com/api/timedtext?v=test&lang={}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> TranscriptList {
        TranscriptList {
            video_id: "dQw4w9WgXcQ".to_string(),
            tracks: vec![
                test_track("en", true, true),
                test_track("de", false, true),
                test_track("en", false, false),
            ],
            translation_languages: vec![TranslationLanguage {
                language: "French".to_string(),
                language_code: "fr".to_string(),
            }],
        }
    }

    #[test]
    fn test_find_manual_skips_generated() {
        assert_eq!(list().find_manual("en"), Some(2));
        assert_eq!(list().find_generated("en"), Some(0));
        assert_eq!(list().find_generated("de"), None);
    }

    #[test]
    fn test_codes_match_exactly() {
        assert_eq!(list().find_manual("EN"), None);
        assert_eq!(list().find_manual("en-US"), None);
    }

    #[test]
    fn test_translation_languages() {
        assert!(list().can_translate_to("fr"));
        assert!(!list().can_translate_to("es"));
    }

    #[test]
    fn test_base_url_not_serialized() {
        let json = serde_json::to_value(test_track("en", false, true)).unwrap();
        assert!(json.get("base_url").is_none());
        assert_eq!(json["language_code"], "en");
    }
}
