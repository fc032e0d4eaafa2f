//! Integration tests for Page-Ripple
//!
//! These tests use wiremock to stand in for the media API and drive the real
//! HTTP fetcher through complete aggregations.

mod aggregate_tests;
mod fetcher_tests;

use page_ripple::config::{ApiConfig, Config, EngineSettings, UserAgentConfig};
use serde_json::{json, Value};

/// Creates a test configuration pointing at a mock server
pub fn create_test_config(server_uri: &str) -> Config {
    Config {
        engine: EngineSettings {
            max_accepted_items: 100,
            max_iterations: 10,
            timeout_ms: 5_000,
            drain_grace_ms: 500,
            max_concurrent_fetches: 4,
            page_size: 2,
        },
        api: ApiConfig {
            base_url: format!("{}/v1/", server_uri),
            client_id: "test-client".to_string(),
            access_token: None,
            request_timeout_ms: 5_000,
        },
        user_agent: UserAgentConfig {
            name: "TestClient".to_string(),
            version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
    }
}

/// A media record with the given id and tags
pub fn media(id: &str, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "type": "image",
        "link": format!("https://instagr.am/p/{}/", id),
        "tags": tags,
        "created_time": "1296703536",
        "user": {"id": "1", "username": "tester"},
        "likes": {"count": 3}
    })
}

/// A successful page body
pub fn page_body(items: Vec<Value>, next_url: Option<String>) -> Value {
    json!({
        "meta": {"code": 200},
        "data": items,
        "pagination": {"next_url": next_url.unwrap_or_default()}
    })
}
