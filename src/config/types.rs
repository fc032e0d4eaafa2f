use crate::engine::EngineConfig;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Page-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
    pub api: ApiConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Aggregation engine settings
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Stop once more than this many items have been accepted
    #[serde(rename = "max-accepted-items", default = "default_max_accepted_items")]
    pub max_accepted_items: usize,

    /// Stop once more than this many pages have been folded
    #[serde(rename = "max-iterations", default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Call-scoped timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How long to keep draining in-flight fetches after the stop decision (milliseconds)
    #[serde(rename = "drain-grace-ms", default = "default_drain_grace_ms")]
    pub drain_grace_ms: u64,

    /// Maximum number of fetches running at the same time
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Page size hint forwarded to request construction
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,
}

fn default_max_accepted_items() -> usize {
    30
}

fn default_max_iterations() -> u32 {
    5
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_drain_grace_ms() -> u64 {
    2_000
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_page_size() -> u32 {
    100
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_accepted_items: default_max_accepted_items(),
            max_iterations: default_max_iterations(),
            timeout_ms: default_timeout_ms(),
            drain_grace_ms: default_drain_grace_ms(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            page_size: default_page_size(),
        }
    }
}

impl EngineSettings {
    /// Converts the file representation into the engine's runtime configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_accepted_items: self.max_accepted_items,
            max_iterations: self.max_iterations,
            timeout: Duration::from_millis(self.timeout_ms),
            drain_grace: Duration::from_millis(self.drain_grace_ms),
            max_concurrent_fetches: self.max_concurrent_fetches,
            page_size: self.page_size,
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (must end with '/')
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Application client id, sent when no access token is configured
    #[serde(rename = "client-id")]
    pub client_id: String,

    /// User access token
    #[serde(rename = "access-token", default)]
    pub access_token: Option<String>,

    /// Per-request HTTP timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the client
    pub name: String,

    /// Version of the client
    pub version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}
