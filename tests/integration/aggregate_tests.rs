//! End-to-end aggregations against a mock media API

use crate::{create_test_config, media, page_body};
use page_ripple::engine::CompletionReason;
use page_ripple::media::accept_all;
use page_ripple::{MediaClient, RippleError, Seed};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_follows_pagination_until_exhausted() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/v1/tags/cats/media/recent"))
        .and(query_param("client_id", "test-client"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![media("1", &["cats"]), media("2", &["cats"])],
            Some(format!("{}/v1/next/cats-2", base_url)),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/next/cats-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![media("3", &["cats"]), media("4", &["cats"])], None)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = MediaClient::new(create_test_config(&base_url)).expect("Failed to create client");
    let result = client
        .tags_media_recent(&["cats".to_string()])
        .await
        .expect("Aggregation failed");

    assert_eq!(result.reason, CompletionReason::Exhausted);
    let ids: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(result.stats.fetches_issued, 2);
    assert_eq!(result.stats.pages_folded, 2);
}

#[tokio::test]
async fn test_satisfied_lineage_is_not_continued() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/v1/tags/cats/media/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![media("1", &["cats"]), media("2", &["cats"])],
            Some(format!("{}/v1/next/cats-2", base_url)),
        )))
        .mount(&mock_server)
        .await;

    // The continuation must never be requested
    Mock::given(method("GET"))
        .and(path("/v1/next/cats-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.engine.max_accepted_items = 1;

    let client = MediaClient::new(config).expect("Failed to create client");
    let result = client
        .tags_media_recent(&["cats".to_string()])
        .await
        .expect("Aggregation failed");

    assert_eq!(result.reason, CompletionReason::Satisfied);
    // The whole page is kept even though it overshoots the threshold
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn test_failed_tag_does_not_abort_other_tags() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/v1/tags/cats/media/recent"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/tags/dogs/media/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![media("d1", &["dogs"]), media("d2", &["dogs", "cats"])],
            None,
        )))
        .mount(&mock_server)
        .await;

    let client = MediaClient::new(create_test_config(&base_url)).expect("Failed to create client");
    let seeds = [Seed::tag("cats"), Seed::tag("dogs")];
    let policy = client.config().engine.engine_config().threshold_policy();
    let result = client
        .aggregate(&seeds, &accept_all(), &policy)
        .await
        .expect("Aggregation failed");

    assert_eq!(result.reason, CompletionReason::Exhausted);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.stats.pages_failed, 1);
}

#[tokio::test]
async fn test_every_lineage_failing_surfaces_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client =
        MediaClient::new(create_test_config(&mock_server.uri())).expect("Failed to create client");
    let result = client
        .tags_media_recent(&["cats".to_string(), "dogs".to_string()])
        .await;

    assert!(matches!(
        result,
        Err(RippleError::AllFetchesFailed { failures: 2 })
    ));
}

#[tokio::test]
async fn test_slow_api_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/tags/cats/media/recent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![media("1", &["cats"])], None))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.engine.timeout_ms = 100;
    config.engine.drain_grace_ms = 50;

    let client = MediaClient::new(config).expect("Failed to create client");
    let started = Instant::now();
    let result = client
        .tags_media_recent(&["cats".to_string()])
        .await
        .expect("Timeouts are not errors");

    assert_eq!(result.reason, CompletionReason::TimedOut);
    assert!(result.items.is_empty());
    assert_eq!(result.stats.abandoned, 1);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_location_search_request_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/media/search"))
        .and(query_param("lat", "48.8584"))
        .and(query_param("lng", "2.2945"))
        .and(query_param("client_id", "test-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
            vec![media("l1", &[]), media("l2", &["paris"])],
            None,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        MediaClient::new(create_test_config(&mock_server.uri())).expect("Failed to create client");
    let result = client
        .location_search(48.8584, 2.2945)
        .await
        .expect("Aggregation failed");

    assert_eq!(result.reason, CompletionReason::Exhausted);
    assert_eq!(result.items.len(), 2);
}
