//! Page-Ripple: concurrent paginated aggregation
//!
//! This crate fans out page fetches against a paginated remote API, follows
//! continuation links as results arrive, filters items through an acceptance
//! predicate, and stops once it is satisfied, exhausted, or out of time.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod engine;
pub mod fetcher;
pub mod media;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Page-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("All {failures} fetches failed and no items were collected")]
    AllFetchesFailed { failures: u32 },

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::Phase,
        to: state::Phase,
    },

    #[error("Outstanding fetch counter would go negative")]
    OutstandingUnderflow,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning seeds into page requests
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Invalid base URL: {0}")]
    InvalidBase(#[from] ::url::ParseError),

    #[error("Base URL cannot have paths appended: {0}")]
    UnsupportedBase(String),

    #[error("Malformed location '{0}', expected LAT,LNG")]
    MalformedLocation(String),

    #[error("Tag cannot be empty")]
    EmptyTag,

    #[error("User id cannot be empty")]
    EmptyUser,

    #[error("Coordinates out of range: lat={lat}, lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}

/// Result type alias for Page-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::MediaClient;
pub use config::Config;
pub use endpoint::{build_seed_requests, Endpoint, Seed};
pub use engine::{
    policy_fn, AcceptancePredicate, Aggregation, AggregationStats, CompletionReason, Engine,
    EngineConfig, Page, PageRequest, PageResult, SatisfactionPolicy, ThresholdPolicy,
};
pub use fetcher::{DecodeError, FetchError, HttpPageFetcher, PageFetcher, RetryingFetcher};
pub use media::MediaItem;
pub use state::{AggregationState, Phase};
