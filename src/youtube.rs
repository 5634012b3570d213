use std::fmt;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

// ── Constants ────────────────────────────────────────────────────────────────

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const OEMBED_URL: &str = "https://www.youtube.com/oembed";

// ── Lazy static regexes ──────────────────────────────────────────────────────

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/shorts/|youtube\.com/embed/)([^&\s?#]+)",
    )
    .unwrap()
});

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#(\d+)|#[xX]([0-9a-fA-F]+)|(amp|lt|gt|quot|apos));").unwrap()
});

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum YoutubeError {
    #[error("YouTube is receiving too many requests from this IP and now requires solving a captcha")]
    RateLimited,
    #[error("The video is no longer available ({0})")]
    VideoUnavailable(String),
    #[error("Transcript is disabled on this video ({0})")]
    TranscriptsDisabled(String),
    #[error("No transcripts are available in {lang} for this video ({video_id}). Available languages: {available}")]
    LanguageUnavailable {
        lang: String,
        video_id: String,
        available: String,
    },
    #[error("Upstream returned status {0}")]
    Upstream(u16),
    #[error("{0}")]
    Request(String),
}

// ── Types ────────────────────────────────────────────────────────────────────

/// A YouTube video identifier pulled out of a watch, short, shorts or embed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL, self.as_str())
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    pub text: String,
    pub offset: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsBlob {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
}

// ── Collaborator traits ──────────────────────────────────────────────────────

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the caption fragments of one track. `None` picks the video's
    /// default (first listed) track.
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
        lang: Option<&str>,
    ) -> Result<Vec<CaptionFragment>, YoutubeError>;
}

#[async_trait]
pub trait TitleSource: Send + Sync {
    async fn fetch_title(&self, video_id: &VideoId) -> Result<String, YoutubeError>;
}

// ── Public API ───────────────────────────────────────────────────────────────

pub fn parse_video_id(url: &str) -> Option<VideoId> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId::new(m.as_str()))
}

/// Talks to the public YouTube watch page, caption track and oembed endpoints.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: reqwest::Client,
}

impl YoutubeClient {
    pub fn new(insecure: bool) -> Result<Self, YoutubeError> {
        let mut builder = reqwest::ClientBuilder::new()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT);

        if insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| YoutubeError::Request(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get_text(&self, url: &str, lang: Option<&str>) -> Result<String, YoutubeError> {
        let accept_language = lang.unwrap_or("en-US,en;q=0.9");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT_LANGUAGE, accept_language)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(YoutubeError::Upstream(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| YoutubeError::Request(e.to_string()))
    }
}

#[async_trait]
impl TranscriptSource for YoutubeClient {
    async fn fetch_transcript(
        &self,
        video_id: &VideoId,
        lang: Option<&str>,
    ) -> Result<Vec<CaptionFragment>, YoutubeError> {
        let page = self.get_text(&video_id.watch_url(), lang).await?;
        let tracks = caption_tracks(&page, video_id)?;
        let track = select_track(&tracks, lang, video_id)?;

        tracing::debug!(%video_id, lang = %track.language_code, "fetching caption track");
        let markup = self.get_text(&track.base_url, lang).await?;
        Ok(parse_caption_markup(&markup))
    }
}

#[async_trait]
impl TitleSource for YoutubeClient {
    async fn fetch_title(&self, video_id: &VideoId) -> Result<String, YoutubeError> {
        let watch_url = video_id.watch_url();
        let url = Url::parse_with_params(
            OEMBED_URL,
            &[("url", watch_url.as_str()), ("format", "json")],
        )
        .map_err(|e| YoutubeError::Request(e.to_string()))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(YoutubeError::Upstream(response.status().as_u16()));
        }

        let oembed: OembedResponse = response
            .json()
            .await
            .map_err(|e| YoutubeError::Request(e.to_string()))?;
        Ok(oembed.title)
    }
}

fn request_error(e: reqwest::Error) -> YoutubeError {
    if e.is_timeout() {
        YoutubeError::Request(format!("TimeoutError: {}", e))
    } else if e.is_connect() {
        YoutubeError::Request(format!("ConnectError: {}", e))
    } else {
        YoutubeError::Request(format!("RequestError: {}", e))
    }
}

// ── Watch page parsing ───────────────────────────────────────────────────────

/// Pull the caption track list out of the player response embedded in a
/// watch page.
pub fn caption_tracks(page: &str, video_id: &VideoId) -> Result<Vec<CaptionTrack>, YoutubeError> {
    let Some((_, after)) = page.split_once("\"captions\":") else {
        if page.contains("class=\"g-recaptcha\"") {
            return Err(YoutubeError::RateLimited);
        }
        if !page.contains("\"playabilityStatus\":") {
            return Err(YoutubeError::VideoUnavailable(video_id.to_string()));
        }
        return Err(YoutubeError::TranscriptsDisabled(video_id.to_string()));
    };

    let blob = after
        .split_once(",\"videoDetails")
        .map(|(blob, _)| blob)
        .unwrap_or(after)
        .replace('\n', "");

    let captions: CaptionsBlob = serde_json::from_str(&blob)
        .map_err(|_| YoutubeError::TranscriptsDisabled(video_id.to_string()))?;

    let tracks = captions
        .player_captions_tracklist_renderer
        .map(|renderer| renderer.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(YoutubeError::TranscriptsDisabled(video_id.to_string()));
    }
    Ok(tracks)
}

pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    lang: Option<&str>,
    video_id: &VideoId,
) -> Result<&'a CaptionTrack, YoutubeError> {
    let found = match lang {
        None => tracks.first(),
        Some(lang) => tracks.iter().find(|t| t.language_code == lang),
    };

    found.ok_or_else(|| YoutubeError::LanguageUnavailable {
        lang: lang.unwrap_or("default").to_string(),
        video_id: video_id.to_string(),
        available: tracks
            .iter()
            .map(|t| t.language_code.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

// ── Caption track parsing ────────────────────────────────────────────────────

/// Parse `<text start=".." dur="..">..</text>` elements from a caption track.
pub fn parse_caption_markup(markup: &str) -> Vec<CaptionFragment> {
    let fragment = Html::parse_fragment(markup);
    let text_sel = Selector::parse("text").unwrap();

    fragment
        .select(&text_sel)
        .map(|el| {
            let attr = |name: &str| {
                el.value()
                    .attr(name)
                    .and_then(|v| v.parse::<f64>().ok())
                    .unwrap_or(0.0)
            };
            // Track text is entity-encoded twice; the parser undoes the first layer.
            let raw: String = el.text().collect();
            CaptionFragment {
                text: decode_entities(&raw),
                offset: attr("start"),
                duration: attr("dur"),
            }
        })
        .collect()
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("amp") => Some('&'),
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
