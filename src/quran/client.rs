use std::time::Duration;

use tracing::{debug, info};

use crate::config::ApiConfig;
use crate::error::{FetchError, Result};
use crate::quran::types::VerseRecord;

/// Where verse records and their narration audio come from
///
/// The session and the composition engine only talk to this trait, so the
/// whole pipeline can run against canned data.
#[allow(async_fn_in_trait)]
pub trait VerseSource {
    /// Fetch one verse record
    async fn fetch_verse(&self, surah: u32, ayah: u32) -> Result<VerseRecord>;

    /// Download the narration audio at `url`
    async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTPS client for the public verse-data API
#[derive(Debug, Clone)]
pub struct QuranApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl QuranApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ayah-reel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::RequestFailed {
                url: config.base_url.clone(),
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self::with_client(http, config))
    }

    /// Share an existing `reqwest::Client` (connection pool) with this API client
    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
        }
    }

    pub fn verse_url(&self, surah: u32, ayah: u32) -> String {
        format!("{}/api/{}/{}.json", self.base_url, surah, ayah)
    }

    async fn get_bytes(&self, url: &str, timeout: Option<Duration>) -> Result<Vec<u8>> {
        let mut request = self.http.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }
}

impl VerseSource for QuranApiClient {
    async fn fetch_verse(&self, surah: u32, ayah: u32) -> Result<VerseRecord> {
        let url = self.verse_url(surah, ayah);
        info!("Fetching verse data from: {}", url);

        let body = self.get_bytes(&url, Some(self.timeout)).await?;
        let verse = parse_verse(&url, &body)?;

        debug!("Verse {}:{} has {} audio variants", surah, ayah, verse.audio.len());
        Ok(verse)
    }

    async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading audio from: {}", url);
        let bytes = self.get_bytes(url, None).await?;
        if bytes.is_empty() {
            return Err(FetchError::MalformedPayload {
                url: url.to_string(),
                reason: "empty audio body".to_string(),
            }
            .into());
        }
        Ok(bytes)
    }
}

fn parse_verse(url: &str, body: &[u8]) -> Result<VerseRecord> {
    serde_json::from_slice(body).map_err(|e| {
        FetchError::MalformedPayload {
            url: url.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
