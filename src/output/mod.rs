use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::selection::FetchedTranscript;
use crate::youtube::{Segment, TrackInfo, TranscriptList};
use crate::FetcherError;

pub mod formatters;

pub use formatters::*;

/// Result envelope printed for every invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Vec<Segment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TranscriptMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_transcripts: Option<Vec<TrackInfo>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Metadata about the fetched transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMetadata {
    pub video_id: String,

    /// Language name of the returned segments
    pub language: String,

    /// Language code of the returned segments
    pub language_code: String,

    /// Whether the source track was machine-generated
    pub is_generated: bool,

    /// Source language code when the segments were machine-translated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_from: Option<String>,

    pub total_segments: usize,

    pub available_transcripts: Vec<TrackInfo>,

    pub fetched_at: DateTime<Utc>,
}

impl TranscriptResponse {
    /// Successful fetch of one transcript
    pub fn fetched(list: &TranscriptList, fetched: FetchedTranscript) -> Self {
        let metadata = TranscriptMetadata {
            video_id: list.video_id.clone(),
            language: fetched.language,
            language_code: fetched.language_code,
            is_generated: fetched.is_generated,
            translated_from: fetched.translated_from,
            total_segments: fetched.segments.len(),
            available_transcripts: list.tracks.clone(),
            fetched_at: Utc::now(),
        };

        Self {
            success: true,
            video_id: None,
            transcript: Some(fetched.segments),
            metadata: Some(metadata),
            available_transcripts: None,
            error: None,
            error_type: None,
        }
    }

    /// Successful listing without fetching content
    pub fn listed(list: &TranscriptList) -> Self {
        Self {
            success: true,
            video_id: Some(list.video_id.clone()),
            transcript: None,
            metadata: None,
            available_transcripts: Some(list.tracks.clone()),
            error: None,
            error_type: None,
        }
    }

    /// Failure envelope; the track list is attached when it is known
    pub fn failed(
        video_id: Option<&str>,
        error: &FetcherError,
        list: Option<&TranscriptList>,
    ) -> Self {
        Self {
            success: false,
            video_id: video_id.map(str::to_string),
            transcript: None,
            metadata: None,
            available_transcripts: list.map(|l| l.tracks.clone()),
            error: Some(error.to_string()),
            error_type: Some(error.category().to_string()),
        }
    }
}

/// Render the response in the requested format
pub fn render(
    response: &TranscriptResponse,
    format: &OutputFormat,
    pretty: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => format_as_json(response, pretty),
        OutputFormat::Text => Ok(format_as_text(response)),
    }
}

/// Save rendered output to file
pub fn save_to_file(content: &str, path: &Path) -> Result<()> {
    fs_err::write(path, format!("{}\n", content))?;
    Ok(())
}

/// Print rendered output to stdout
pub fn print_to_console(content: &str) {
    println!("{}", content);
}
