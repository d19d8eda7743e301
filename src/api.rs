//! HTTP gateway to the story/user API.

use crate::error::{Result, SnoozeError};
use futures_util::StreamExt;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g. "https://hack-or-snooze-v3.herokuapp.com")
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    /// Responses larger than this are rejected as malformed
    pub max_body_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("snooze/{}", env!("CARGO_PKG_VERSION")),
            // 5 MB cap
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ClientConfig {
    /// Default settings pointed at another base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Thin wrapper over a `reqwest::Client` bound to one API base URL.
///
/// Every call is a single attempt: no retries, no backoff. Non-success
/// statuses are mapped onto [`SnoozeError`] by status class.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    max_body_bytes: usize,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let raw = config.base_url.trim();
        if raw.is_empty() {
            return Err(SnoozeError::InvalidUrl("URL cannot be empty".into()));
        }
        let base = Url::parse(raw).map_err(|e| SnoozeError::InvalidUrl(format!("{raw}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SnoozeError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .gzip(true)
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SnoozeError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SnoozeError::InvalidUrl(format!("{} cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, url = %url, "API request");
        Ok(self.http.request(method, url))
    }

    /// Send `request` and decode a successful body as JSON.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = self.send(request).await?;
        serde_json::from_slice(&body)
            .map_err(|e| SnoozeError::format(format!("failed to parse response: {e}")))
    }

    /// Send `request`, returning the raw body of a successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                SnoozeError::transport(format!("server unreachable: {e}"))
            } else {
                SnoozeError::from(e)
            }
        })?;

        let status = response.status();
        let body = self.read_body(response).await?;
        if status.is_success() {
            Ok(body)
        } else {
            let text = String::from_utf8_lossy(&body);
            debug!(status = %status, body = %text, "API request failed");
            Err(SnoozeError::from_status(status, &text))
        }
    }

    async fn read_body(&self, response: Response) -> Result<Vec<u8>> {
        let mut stream = response.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| SnoozeError::transport(format!("failed to read response body: {e}")))?;
            if buf.len() + chunk.len() > self.max_body_bytes {
                warn!(max = self.max_body_bytes, "response body too large");
                return Err(SnoozeError::format(format!(
                    "response body exceeds {} bytes",
                    self.max_body_bytes
                )));
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }
}
