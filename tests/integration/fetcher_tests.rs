//! HTTP fetcher behaviour against a mock media API

use crate::{media, page_body};
use page_ripple::fetcher::{FetchError, HttpPageFetcher, PageFetcher, RetryingFetcher};
use page_ripple::PageRequest;
use page_ripple::config::UserAgentConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpPageFetcher {
    let config = UserAgentConfig {
        name: "TestClient".to_string(),
        version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
    };
    HttpPageFetcher::from_config(&config, Duration::from_secs(5)).expect("Failed to build client")
}

#[tokio::test]
async fn test_decodes_items_and_continuation() {
    let mock_server = MockServer::start().await;
    let next = format!("{}/v1/page/2", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/v1/page/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![media("1", &["a"])], Some(next.clone()))),
        )
        .mount(&mock_server)
        .await;

    let request = PageRequest::new(format!("{}/v1/page/1", mock_server.uri()));
    let page = fetcher().fetch_page(&request).await.expect("Fetch failed");

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].user.username, "tester");
    assert_eq!(page.next.map(|n| n.to_string()), Some(next));
}

#[tokio::test]
async fn test_api_error_in_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": {
                "code": 400,
                "error_type": "OAuthParameterException",
                "error_message": "Missing client_id or access_token URL parameter."
            }
        })))
        .mount(&mock_server)
        .await;

    let request = PageRequest::new(format!("{}/v1/tags/x/media/recent", mock_server.uri()));
    let err = fetcher().fetch_page(&request).await.unwrap_err();

    match err {
        FetchError::Api { code, message, .. } => {
            assert_eq!(code, 400);
            assert!(message.starts_with("OAuthParameterException"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let request = PageRequest::new(format!("{}/v1/missing", mock_server.uri()));
    let err = fetcher().fetch_page(&request).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let request = PageRequest::new(format!("{}/v1/page/1", mock_server.uri()));
    let err = fetcher().fetch_page(&request).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_retrying_fetcher_recovers_from_server_error() {
    let mock_server = MockServer::start().await;

    // First call fails; once this mock is used up the next one answers
    Mock::given(method("GET"))
        .and(path("/v1/page/1"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/page/1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(vec![media("1", &[])], None)),
        )
        .mount(&mock_server)
        .await;

    let retrying = RetryingFetcher::new(fetcher(), 3, Duration::from_millis(10));
    let request = PageRequest::new(format!("{}/v1/page/1", mock_server.uri()));
    let page = retrying.fetch_page(&request).await.expect("Retry did not recover");

    assert_eq!(page.items.len(), 1);
}
