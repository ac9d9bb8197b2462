use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "transcript-fetcher",
    about = "Transcript Fetcher - Fetch YouTube caption transcripts with language fallback",
    version,
    long_about = "Lists the caption tracks of a YouTube video, picks one by language preference (manual tracks, then auto-generated, then fallback languages, then translation or any available track), and prints it as JSON or plain text."
)]
pub struct Cli {
    /// YouTube video ID or URL
    #[arg(value_name = "VIDEO_ID_OR_URL")]
    pub video: String,

    /// Preferred language codes, highest priority first (overrides config)
    #[arg(short, long, num_args = 1.., value_delimiter = ',', value_name = "LANG")]
    pub languages: Vec<String>,

    /// Only list available transcripts, don't fetch content
    #[arg(long)]
    pub list_only: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file
    #[arg(long, value_name = "FILE", env = "TRANSCRIPT_FETCHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON result envelope
    Json,
    /// Plain text, one caption per line
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_languages_and_flags() {
        let cli = Cli::try_parse_from([
            "transcript-fetcher",
            "dQw4w9WgXcQ",
            "--languages",
            "de",
            "en-US",
            "--format",
            "text",
            "--list-only",
        ])
        .unwrap();

        assert_eq!(cli.video, "dQw4w9WgXcQ");
        assert_eq!(cli.languages, vec!["de", "en-US"]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.list_only);
    }

    #[test]
    fn test_comma_separated_languages() {
        let cli =
            Cli::try_parse_from(["transcript-fetcher", "dQw4w9WgXcQ", "-l", "fr,es"]).unwrap();
        assert_eq!(cli.languages, vec!["fr", "es"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result = Cli::try_parse_from(["transcript-fetcher", "dQw4w9WgXcQ", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_requires_video() {
        assert!(Cli::try_parse_from(["transcript-fetcher"]).is_err());
    }
}
