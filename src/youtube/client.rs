use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use super::captions::parse_timedtext;
use super::{Segment, TrackInfo, TranscriptList, TranscriptSource, TranslationLanguage};
use crate::config::HttpConfig;
use crate::FetcherError;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid api key regex")
});

static CONSENT_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"name="v" value="(.*?)""#).expect("valid consent regex"));

/// Caption track listing and download against youtube.com
pub struct YoutubeClient {
    http: Client,
}

impl YoutubeClient {
    /// Build a client from the HTTP settings
    pub fn new(config: &HttpConfig) -> Result<Self, FetcherError> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
            FetcherError::InvalidConfig(format!("invalid Accept-Language: {}", e))
        })?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let mut builder = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| FetcherError::InvalidConfig(format!("invalid proxy: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let http = builder
            .build()
            .map_err(|e| FetcherError::DependencyMissing(e.to_string()))?;

        Ok(Self { http })
    }

    /// Fetch the watch page, accepting the cookie consent interstitial if shown
    async fn fetch_watch_html(&self, video_id: &str) -> Result<String, FetcherError> {
        let html = self.get_watch_page(video_id, None).await?;

        let Some(consent) = consent_value(&html) else {
            return Ok(html);
        };

        tracing::debug!("Consent page shown for {}, retrying with consent cookie", video_id);
        let cookie = format!("CONSENT=YES+{}", consent);
        let html = self.get_watch_page(video_id, Some(&cookie)).await?;

        if consent_value(&html).is_some() {
            return Err(FetcherError::RequestFailed(
                "failed to accept the cookie consent page".to_string(),
            ));
        }

        Ok(html)
    }

    async fn get_watch_page(
        &self,
        video_id: &str,
        cookie: Option<&str>,
    ) -> Result<String, FetcherError> {
        tracing::debug!("Fetching watch page for: {}", video_id);

        let mut request = self.http.get(WATCH_URL).query(&[("v", video_id)]);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        check_status(response.status())?;

        Ok(response.text().await?)
    }

    /// Query the innertube player endpoint for caption metadata
    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<PlayerResponse, FetcherError> {
        tracing::debug!("Requesting player data for: {}", video_id);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38",
                }
            },
            "videoId": video_id,
        });

        let response = self
            .http
            .post(PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;
        check_status(response.status())?;

        response
            .json::<PlayerResponse>()
            .await
            .map_err(|e| FetcherError::Parse(format!("player response: {}", e)))
    }
}

#[async_trait]
impl TranscriptSource for YoutubeClient {
    async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList, FetcherError> {
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_api_key(&html)?;
        let player = self.fetch_player_response(video_id, &api_key).await?;

        let list = build_transcript_list(video_id, player)?;
        tracing::info!("Found {} caption tracks for {}", list.tracks.len(), video_id);

        Ok(list)
    }

    async fn fetch_segments(
        &self,
        track: &TrackInfo,
        translate_to: Option<String>,
    ) -> Result<Vec<Segment>, FetcherError> {
        let url = caption_url(track, translate_to.as_deref())?;
        tracing::debug!(
            "Downloading captions: {} (translate_to={:?})",
            track.language_code,
            translate_to
        );

        let response = self.http.get(&url).send().await?;
        check_status(response.status())?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetcherError::RequestFailed(
                "YouTube returned an empty caption document".to_string(),
            ));
        }

        parse_timedtext(&body)
    }
}

fn check_status(status: StatusCode) -> Result<(), FetcherError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetcherError::RateLimited);
    }
    if !status.is_success() {
        return Err(FetcherError::RequestFailed(format!("HTTP {}", status)));
    }
    Ok(())
}

fn consent_value(html: &str) -> Option<String> {
    if !html.contains("action=\"https://consent.youtube.com/s\"") {
        return None;
    }
    CONSENT_VALUE
        .captures(html)
        .map(|caps| caps[1].to_string())
}

fn extract_api_key(html: &str) -> Result<String, FetcherError> {
    if let Some(caps) = API_KEY.captures(html) {
        return Ok(caps[1].to_string());
    }
    if html.contains("class=\"g-recaptcha\"") {
        return Err(FetcherError::RateLimited);
    }
    Err(FetcherError::Parse("INNERTUBE_API_KEY not found in watch page".to_string()))
}

/// Download URL for a track, with `tlang` appended when translating. Only the
/// track's own translatability is checked here. The target code comes from the
/// list's `translation_languages`.
fn caption_url(track: &TrackInfo, translate_to: Option<&str>) -> Result<String, FetcherError> {
    match translate_to {
        None => Ok(track.base_url.clone()),
        Some(target) if track.is_translatable => Ok(format!(
            "{}&tlang={}",
            track.base_url,
            urlencoding::encode(target)
        )),
        Some(target) => Err(FetcherError::NotTranslatable {
            language_code: track.language_code.clone(),
            target: target.to_string(),
        }),
    }
}

fn check_playability(status: &PlayabilityStatus) -> Result<(), FetcherError> {
    let reason = status.reason.clone().unwrap_or_default();
    let lowered = reason.to_lowercase();

    match status.status.as_str() {
        "OK" => Ok(()),
        "LOGIN_REQUIRED" if lowered.contains("not a bot") => Err(FetcherError::RateLimited),
        "LOGIN_REQUIRED" | "UNPLAYABLE" if is_age_gate(&lowered) => {
            Err(FetcherError::AgeRestricted)
        }
        "ERROR" if lowered.contains("unavailable") => Err(FetcherError::VideoUnavailable),
        other if reason.is_empty() => Err(FetcherError::VideoUnplayable(other.to_string())),
        _ => Err(FetcherError::VideoUnplayable(reason)),
    }
}

fn is_age_gate(reason: &str) -> bool {
    reason.contains("your age")
        || reason.contains("age-restricted")
        || reason.contains("inappropriate")
}

fn build_transcript_list(
    video_id: &str,
    player: PlayerResponse,
) -> Result<TranscriptList, FetcherError> {
    if let Some(status) = &player.playability_status {
        check_playability(status)?;
    }

    let renderer = player
        .captions
        .and_then(|c| c.renderer)
        .ok_or(FetcherError::TranscriptsDisabled)?;

    if renderer.caption_tracks.is_empty() {
        return Err(FetcherError::NoTranscriptFound);
    }

    let tracks = renderer
        .caption_tracks
        .into_iter()
        .map(|track| TrackInfo {
            language: track.name.text(),
            is_generated: track.kind.as_deref() == Some("asr"),
            is_translatable: track.is_translatable,
            base_url: track.base_url.replace("&fmt=srv3", ""),
            language_code: track.language_code,
        })
        .collect();

    let translation_languages = renderer
        .translation_languages
        .into_iter()
        .map(|lang| TranslationLanguage {
            language: lang.language_name.text(),
            language_code: lang.language_code,
        })
        .collect();

    Ok(TranscriptList {
        video_id: video_id.to_string(),
        tracks,
        translation_languages,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
    #[serde(default)]
    translation_languages: Vec<RawTranslationLanguage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    name: TextRuns,
    language_code: String,
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTranslationLanguage {
    language_code: String,
    #[serde(default)]
    language_name: TextRuns,
}

/// Innertube text, either a plain string or a list of runs
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRuns {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TextRuns {
    fn text(&self) -> String {
        match &self.simple_text {
            Some(text) => text.clone(),
            None => self.runs.iter().map(|r| r.text.as_str()).collect(),
        }
    }
}
