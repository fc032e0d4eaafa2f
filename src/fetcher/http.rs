//! HTTP fetcher implementation
//!
//! Performs a GET for one page URL and decodes the JSON body. Failures are
//! classified into `FetchError` variants so callers can tell transient
//! transport problems from permanent ones.

use crate::config::UserAgentConfig;
use crate::engine::{Page, PageRequest};
use crate::fetcher::decode::{decode_response, into_page};
use crate::fetcher::{FetchError, PageFetcher};
use crate::media::MediaItem;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `request_timeout` - Upper bound for one request, connect included
///
/// # Example
///
/// ```no_run
/// use page_ripple::config::UserAgentConfig;
/// use page_ripple::fetcher::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     name: "page-ripple".to_string(),
///     version: "0.1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    request_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: Name/Version (+ContactURL)
    let user_agent = format!("{}/{} (+{})", config.name, config.version, config.contact_url);

    Client::builder()
        .user_agent(user_agent)
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches media pages over HTTP
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(
        config: &UserAgentConfig,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, request_timeout)?))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    type Item = MediaItem;

    async fn fetch_page(&self, request: &PageRequest) -> Result<Page<MediaItem>, FetchError> {
        let url = request.as_str();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, e))?;

        // The API reports its own errors in the body's meta block, often with a 4xx status
        let decoded = decode_response(&body);

        if !status.is_success() {
            if let Ok(envelope) = &decoded {
                if !envelope.meta.is_ok() {
                    return Err(FetchError::Api {
                        url: url.to_string(),
                        code: envelope.meta.code,
                        message: envelope.meta.describe(),
                    });
                }
            }
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope = decoded.map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })?;

        if !envelope.meta.is_ok() {
            return Err(FetchError::Api {
                url: url.to_string(),
                code: envelope.meta.code,
                message: envelope.meta.describe(),
            });
        }

        tracing::trace!("Fetched {} items from {}", envelope.data.len(), url);
        Ok(into_page(envelope))
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    let message = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };

    FetchError::Transport {
        url: url.to_string(),
        message,
        timed_out: e.is_timeout(),
    }
}
