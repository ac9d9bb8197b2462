use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOCAL_CONFIG: &str = "transcript-fetcher.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language preference settings
    pub languages: LanguageConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Preferred language codes, highest priority first
    pub preferred: Vec<String>,

    /// Secondary codes tried after every preferred code has failed
    pub fallback: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Accept-Language header, controls the language of track names
    pub accept_language: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Optional proxy URL for all requests
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            preferred: ["en", "en-US", "en-GB", "en-CA", "en-AU"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback: ["es", "fr", "de", "it", "pt", "ja", "ko", "zh", "ru"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("transcript-fetcher/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_language: "en-US".to_string(),
            timeout_secs: 30,
            proxy: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Config {
    /// Load configuration from an explicit path, the usual locations, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path(),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse and validate a YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {}", path.display());

        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Locate the first existing config file
    fn config_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            return Some(local_config);
        }

        let user_config = dirs::config_dir()?
            .join("transcript-fetcher")
            .join("config.yaml");

        user_config.exists().then_some(user_config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.languages.preferred.is_empty() {
            anyhow::bail!("At least one preferred language must be configured");
        }

        if self.languages.preferred.iter().any(|l| l.trim().is_empty()) {
            anyhow::bail!("Preferred language codes must not be empty");
        }

        if self.http.timeout_secs == 0 {
            anyhow::bail!("HTTP timeout must be greater than zero");
        }

        reqwest::header::HeaderValue::from_str(&self.http.accept_language)
            .with_context(|| format!("Invalid Accept-Language: {:?}", self.http.accept_language))?;

        if let Some(proxy) = &self.http.proxy {
            url::Url::parse(proxy).with_context(|| format!("Invalid proxy URL: {}", proxy))?;
            reqwest::Proxy::all(proxy.as_str())
                .with_context(|| format!("Unsupported proxy URL: {}", proxy))?;
        }

        Ok(())
    }
}
