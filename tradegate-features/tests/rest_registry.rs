//! REST registry against a mock backend.

use serde_json::json;
use std::time::Duration;
use tradegate_features::*;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn registry(server: &MockServer) -> RestFlagRegistry {
    RestFlagRegistry::new(
        RestRegistryConfig::new(server.uri(), "service-key").with_timeout(Duration::from_secs(2)),
    )
    .unwrap()
}

#[tokio::test]
async fn get_sends_filter_and_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/feature_flags"))
        .and(query_param("name", "eq.trade-finance"))
        .and(query_param("select", "*"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 3,
                "name": "trade-finance",
                "enabled": true,
                "rollout_percentage": 20,
                "description": "Letters of credit",
                "updated_at": "2024-05-01T12:00:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let flag = registry(&server)
        .await
        .get("trade-finance")
        .await
        .unwrap()
        .unwrap();

    assert!(flag.enabled);
    assert_eq!(flag.rollout_percentage, RolloutPercentage::new(20));
    assert_eq!(flag.description.as_deref(), Some("Letters of credit"));
}

#[tokio::test]
async fn empty_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/feature_flags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(registry(&server).await.get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn list_orders_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/feature_flags"))
        .and(query_param("order", "name.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "ai-advisor", "enabled": false, "rollout_percentage": null},
            {"name": "bulk-payments", "enabled": true, "rollout_percentage": 10}
        ])))
        .mount(&server)
        .await;

    let flags = registry(&server).await.list().await.unwrap();
    assert_eq!(flags.len(), 2);
    assert_eq!(flags[0].name, "ai-advisor");
}

#[tokio::test]
async fn server_error_maps_to_response_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = registry(&server).await.get("x").await.unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Response { status: 503, ref message } if message == "maintenance"
    ));
}

#[tokio::test]
async fn malformed_payload_maps_to_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"oops\":"))
        .mount(&server)
        .await;

    let err = registry(&server).await.get("x").await.unwrap_err();
    assert!(matches!(err, RegistryError::Decode(_)));
}

#[tokio::test]
async fn evaluator_fails_closed_on_backend_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("name", "eq.broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "broken", "enabled": true, "rollout_percentage": 0}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("name", "eq.down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let evaluator = RolloutEvaluator::new(registry(&server).await);
    let caller = CallerContext::user("user-42");

    assert_eq!(
        evaluator.evaluate("broken", &caller).await,
        EvaluationResult::off(Reason::Error)
    );
    assert_eq!(
        evaluator.evaluate("down", &caller).await,
        EvaluationResult::off(Reason::Error)
    );
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    let registry = RestFlagRegistry::new(
        RestRegistryConfig::new("http://127.0.0.1:9", "key").with_timeout(Duration::from_millis(500)),
    )
    .unwrap();

    let err = registry.get("x").await.unwrap_err();
    assert!(matches!(err, RegistryError::Unavailable(_)));
}
