//! Page fetching
//!
//! The extraction core only needs "a parsed page, or nothing". This module
//! supplies that over HTTP with a polite delay before each request and a
//! bounded exponential backoff on transient failures.

use crate::config::ScraperConfig;
use crate::document::ParsedDocument;
use crate::error::{Error, FetchError, Result};
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Statuses worth another attempt
const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// Anything that can turn a URL into a parsed page
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Fetch and parse `url`; `None` on any failure.
    async fn fetch(&self, url: &str) -> Option<ParsedDocument>;
}

impl FetchError {
    /// Transient failures are retried, everything else fails fast
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Network(_) => true,
            FetchError::Http { status, .. } => RETRY_STATUSES.contains(status),
            FetchError::InvalidUrl(_) | FetchError::RetriesExhausted { .. } => false,
        }
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`
/// plus up to 25% jitter.
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    let base = Duration::from_millis(base_ms.saturating_mul(1u64 << exp));
    let jitter: f64 = rand::rng().random_range(0.0..=0.25);
    base + base.mul_f64(jitter)
}

/// HTTP page fetcher with browser-like headers
pub struct HttpFetcher {
    client: Client,
    config: ScraperConfig,
}

impl HttpFetcher {
    /// Build a fetcher from configuration
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .map_err(|e| Error::config(format!("invalid Accept-Language: {}", e)))?,
        );
        headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("document"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("navigate"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("none"),
        );
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Configuration in use
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetch a page body as text, retrying transient failures.
    ///
    /// The polite delay is paid once per page; retries wait only for their
    /// backoff.
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, url: &str) -> std::result::Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "URL must start with http:// or https://: {}",
                url
            )));
        }

        tokio::time::sleep(Duration::from_millis(self.config.polite_delay_ms)).await;

        let mut attempt = 0u32;
        loop {
            if attempt > 0 {
                let delay = backoff_delay(self.config.backoff_base_ms, attempt);
                warn!(
                    "Retry {} of {} for {} in {:.1}s",
                    attempt,
                    self.config.max_retries,
                    url,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }

            match self.fetch_once(parsed.clone()).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    debug!("Transient failure on attempt {}: {}", attempt + 1, e);
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    warn!("Last attempt failed: {}", e);
                    return Err(FetchError::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt + 1,
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: Url) -> std::result::Result<String, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_error(status, &url));
        }

        // Body is decoded as UTF-8 whatever charset the server declares
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        debug!(
            "Fetched {} bytes in {}ms",
            bytes.len(),
            start.elapsed().as_millis()
        );
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout_ms)
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

fn http_error(status: StatusCode, url: &Url) -> FetchError {
    FetchError::Http {
        status: status.as_u16(),
        url: url.to_string(),
    }
}

impl DocumentSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<ParsedDocument> {
        match self.fetch_html(url).await {
            Ok(body) => {
                info!("Fetched {} ({} bytes)", url, body.len());
                Some(ParsedDocument::parse(&body))
            }
            Err(e) => {
                error!("Failed to fetch {}: {}", url, e);
                None
            }
        }
    }
}
