//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer, max_attempts: u32) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(format!("{}/v5", server.uri()))
        .credentials("tok", "sec")
        .max_attempts(max_attempts)
        .retry_wait(Duration::from_millis(1))
        .build();
    HttpClient::with_config(config).unwrap()
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_attempts, 10);
    assert_eq!(config.retry_wait, Duration::from_secs(3));
    assert!(config.base_url.is_none());
    assert!(config.results_per_page.is_none());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.alchemer.com/v5")
        .credentials("token", "secret")
        .timeout(Duration::from_secs(60))
        .max_attempts(5)
        .retry_wait(Duration::from_millis(200))
        .results_per_page(100)
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://api.alchemer.com/v5".to_string())
    );
    assert_eq!(config.api_token, "token");
    assert_eq!(config.api_token_secret, "secret");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_attempts, 5);
    assert_eq!(config.retry_wait, Duration::from_millis(200));
    assert_eq!(config.results_per_page, Some(100));
    assert_eq!(config.user_agent, "test-agent/1.0");
}

// ============================================================================
// RequestParams Tests
// ============================================================================

#[test]
fn test_request_params_builder() {
    let params = RequestParams::new()
        .with("filter[field][0]", "date_modified")
        .with("page", 3);

    assert_eq!(params.get("filter[field][0]"), Some("date_modified"));
    assert_eq!(params.page(), 3);
    assert_eq!(params.len(), 2);
    assert!(!params.is_empty());
}

#[test]
fn test_request_params_for_page_leaves_original() {
    let params = RequestParams::new().with("a", "b");
    let page_two = params.for_page(2);

    assert_eq!(params.page(), 1);
    assert!(!params.contains("page"));
    assert_eq!(page_two.page(), 2);
    assert_eq!(page_two.get("a"), Some("b"));
}

// ============================================================================
// URL Tests
// ============================================================================

#[test]
fn test_endpoint_path_skips_empty_segments() {
    assert_eq!(endpoint_path(&["survey", "", "12", "surveyquestion"]), "survey/12/surveyquestion");
    assert_eq!(endpoint_path(&["survey"]), "survey");
    assert_eq!(endpoint_path::<&str>(&[]), "");
}

#[test]
fn test_build_url_adds_credentials_and_default_page() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://api.alchemer.com/v5/")
            .credentials("tok", "sec")
            .build(),
    )
    .unwrap();

    let url = client
        .build_url(&["survey", "100", "surveyresponse"], &RequestParams::new())
        .unwrap();

    assert_eq!(url.path(), "/v5/survey/100/surveyresponse/");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("api_token".to_string(), "tok".to_string())));
    assert!(pairs.contains(&("api_token_secret".to_string(), "sec".to_string())));
    assert!(pairs.contains(&("page".to_string(), "1".to_string())));
    assert!(!pairs.iter().any(|(k, _)| k == "resultsperpage"));
}

#[test]
fn test_build_url_with_page_size_override() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://api.alchemer.com/v5")
            .results_per_page(500)
            .build(),
    )
    .unwrap();

    let url = client
        .build_url(&["survey"], &RequestParams::new().with("page", 4))
        .unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    assert!(pairs.contains(&("resultsperpage".to_string(), "500".to_string())));
    assert_eq!(pairs.iter().filter(|(k, _)| k == "page").count(), 1);
    assert!(pairs.contains(&("page".to_string(), "4".to_string())));
}

#[test]
fn test_build_url_without_base_url() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    assert!(matches!(
        client.build_url(&["survey"], &RequestParams::new()),
        Err(Error::Config { .. })
    ));
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_unwraps_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .and(query_param("api_token", "tok"))
        .and(query_param("api_token_secret", "sec"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result_ok": true,
            "total_pages": 1,
            "data": [{"id": 1}, {"id": 2}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 3);
    let data = client
        .fetch(&["survey"], &RequestParams::new(), Envelope::Unwrap)
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": 1}, {"id": 2}]));
}

#[tokio::test]
async fn test_fetch_keeps_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/9/surveyresponse/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_pages": 3,
            "page": 1,
            "data": [{"id": "1"}]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 1);
    let body = client
        .fetch(
            &["survey", "9", "surveyresponse"],
            &RequestParams::new(),
            Envelope::Keep,
        )
        .await
        .unwrap();

    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["data"][0]["id"], "1");
}

#[tokio::test]
async fn test_fetch_empty_data_is_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/5/surveyquestion/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 1);
    let data = client
        .fetch(
            &["survey", "5", "surveyquestion"],
            &RequestParams::new(),
            Envelope::Unwrap,
        )
        .await
        .unwrap();

    assert_eq!(data, json!({}));
}

#[tokio::test]
async fn test_fetch_passes_caller_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .and(query_param("filter[field][0]", "date_modified"))
        .and(query_param("filter[operator][0]", ">"))
        .and(query_param("filter[value][0]", "2024-01-01 10:00:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 3}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 1);
    let params = RequestParams::new()
        .with("filter[field][0]", "date_modified")
        .with("filter[operator][0]", ">")
        .with("filter[value][0]", "2024-01-01 10:00:00");
    let data = client
        .fetch(&["survey"], &params, Envelope::Unwrap)
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": 3}]));
}

#[tokio::test]
async fn test_fetch_retries_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 1}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 10);
    let data = client
        .fetch(&["survey"], &RequestParams::new(), Envelope::Unwrap)
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": 1}]));
}

#[tokio::test]
async fn test_fetch_retries_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"id": 2}]})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 2);
    let data = client
        .fetch(&["survey"], &RequestParams::new(), Envelope::Unwrap)
        .await
        .unwrap();

    assert_eq!(data, json!([{"id": 2}]));
}

#[tokio::test]
async fn test_fetch_exhausts_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v5/survey/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server, 4);
    let err = client
        .fetch(&["survey"], &RequestParams::new(), Envelope::Unwrap)
        .await
        .unwrap_err();

    assert!(err.is_exhausted());
    match err {
        Error::RetriesExhausted {
            url,
            attempts,
            last_error,
        } => {
            assert_eq!(url, "/v5/survey/");
            assert_eq!(attempts, 4);
            assert!(last_error.contains("500"));
            assert!(!url.contains("tok"));
        }
        other => panic!("Expected RetriesExhausted, got {other:?}"),
    }
}
