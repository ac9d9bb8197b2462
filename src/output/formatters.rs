use anyhow::{Context, Result};

use super::TranscriptResponse;

/// Format the response envelope as JSON
pub fn format_as_json(response: &TranscriptResponse, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };
    json.context("Failed to serialize response")
}

/// Format the response for human reading
pub fn format_as_text(response: &TranscriptResponse) -> String {
    if !response.success {
        return format!(
            "Error: {}",
            response.error.as_deref().unwrap_or("Unknown error")
        );
    }

    if let Some(transcript) = &response.transcript {
        return transcript
            .iter()
            .map(|segment| format!("[{:.2}s] {}", segment.start_time, segment.text))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut lines = vec!["Available transcripts:".to_string()];
    for track in response.available_transcripts.iter().flatten() {
        let kind = if track.is_generated { "Generated" } else { "Manual" };
        let mut line = format!("  - {} ({}) - {}", track.language, track.language_code, kind);
        if track.is_translatable {
            line.push_str(" [translatable]");
        }
        lines.push(line);
    }
    lines.join("\n")
}
