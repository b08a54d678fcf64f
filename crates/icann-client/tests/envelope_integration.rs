//! Integration tests for the JSON request/response envelope


use icann_client::http::Method;
use icann_client::{Error, RequestContext};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use test_support::*;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Payload {
    name: String,
    count: u32,
}

fn sentinel() -> Payload {
    Payload {
        name: "untouched".to_string(),
        count: 7,
    }
}

async fn serve(body: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/thing"))
        .respond_with(body)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_empty_body_leaves_output_unchanged() {
    let server = serve(ResponseTemplate::new(200)).await;
    let client = mock_client(&server);

    let mut out = sentinel();
    let meta = client
        .execute_json(&RequestContext::background(), Method::GET, "/thing", None::<&()>, Some(&mut out))
        .await
        .unwrap();

    assert_eq!(meta.status.as_u16(), 200);
    assert_eq!(out, sentinel());
}

#[tokio::test]
async fn test_whitespace_body_is_treated_as_empty() {
    let server = serve(ResponseTemplate::new(200).set_body_string(" \r\n\t")).await;
    let client = mock_client(&server);

    let mut out = sentinel();
    client
        .execute_json(&RequestContext::background(), Method::GET, "/thing", None::<&()>, Some(&mut out))
        .await
        .unwrap();
    assert_eq!(out, sentinel());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = serve(ResponseTemplate::new(200).set_body_string("not-json")).await;
    let client = mock_client(&server);

    let mut out = Payload::default();
    let err = client
        .execute_json(&RequestContext::background(), Method::GET, "/thing", None::<&()>, Some(&mut out))
        .await
        .unwrap_err();

    match err {
        Error::Decode { response, .. } => {
            assert_eq!(response.status.as_u16(), 200);
            assert_eq!(response.url.path(), "/thing");
        }
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_output_skips_decoding() {
    let server = serve(ResponseTemplate::new(200).set_body_string("not-json")).await;
    let client = mock_client(&server);

    let meta = client
        .execute_json::<(), Payload>(&RequestContext::background(), Method::GET, "/thing", None, None)
        .await
        .unwrap();
    assert!(meta.status.is_success());
}

#[tokio::test]
async fn test_non_2xx_is_typed_http_error() {
    let server = serve(ResponseTemplate::new(404).set_body_json(json!({"message": "no such thing"}))).await;
    let client = mock_client(&server);

    let mut out = sentinel();
    let err = client
        .execute_json(&RequestContext::background(), Method::GET, "/thing", None::<&()>, Some(&mut out))
        .await
        .unwrap_err();

    let status = err.as_status().expect("typed http error");
    assert!(status.is_not_found());
    assert_eq!(status.method, Method::GET);
    assert_eq!(status.url, format!("{}/thing", server.uri()));
    assert_eq!(out, sentinel());
}

#[tokio::test]
async fn test_server_error_is_distinguishable() {
    let server = serve(ResponseTemplate::new(503)).await;
    let client = mock_client(&server);

    let err = client
        .get_json::<Payload>(&RequestContext::background(), "/thing")
        .await
        .unwrap_err();
    assert!(err.as_status().unwrap().is_server_error());
}

#[tokio::test]
async fn test_json_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/thing"))
        .and(header("Accept", "application/json"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "in", "count": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"name": "out", "count": 2})))
        .expect(1)
        .mount(&server)
        .await;
    let client = mock_client(&server);

    let input = Payload {
        name: "in".into(),
        count: 1,
    };
    let mut out = Payload::default();
    let meta = client
        .execute_json(&RequestContext::background(), Method::POST, "/thing", Some(&input), Some(&mut out))
        .await
        .unwrap();

    assert_eq!(meta.status.as_u16(), 201);
    assert_eq!(out, Payload { name: "out".into(), count: 2 });
}

#[tokio::test]
async fn test_get_sends_accept_without_content_type() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!({"name": "x", "count": 1}))).await;
    let client = mock_client(&server);

    let _: (Payload, _) = client
        .get_json(&RequestContext::background(), "/thing")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].headers.get("accept").unwrap(), "application/json");
    assert!(requests[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_basic_credentials_reach_server() {
    let server = MockServer::start().await;
    // base64("alice:s3cret")
    Mock::given(method("GET"))
        .and(path("/thing"))
        .and(header("Authorization", "Basic YWxpY2U6czNjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "authed", "count": 1})))
        .expect(1)
        .mount(&server)
        .await;
    let client = mock_client(&server);

    let (out, _): (Payload, _) = client
        .get_json(&RequestContext::background(), "/thing")
        .await
        .unwrap();
    assert_eq!(out.name, "authed");
}

#[tokio::test]
async fn test_repeated_calls_decode_identically() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!({"name": "stable", "count": 3}))).await;
    let client = mock_client(&server);
    let ctx = RequestContext::background();

    let (first, _): (Payload, _) = client.get_json(&ctx, "/thing").await.unwrap();
    let (second, _): (Payload, _) = client.get_json(&ctx, "/thing").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_absolute_url_bypasses_base() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!({"name": "abs", "count": 1}))).await;
    // Left pointing at the production base URL
    let client = icann_client::Client::new(icann_client::Config::basic(TLD, USERNAME, PASSWORD)).unwrap();

    let (out, _): (Payload, _) = client
        .get_json(&RequestContext::background(), &format!("{}/thing", server.uri()))
        .await
        .unwrap();
    assert_eq!(out.name, "abs");
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = serve(ResponseTemplate::new(200).set_delay(Duration::from_secs(10))).await;
    let client = mock_client(&server);

    let token = CancellationToken::new();
    let ctx = RequestContext::background().with_cancellation(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
    });

    let started = std::time::Instant::now();
    let err = client.get_json::<Payload>(&ctx, "/thing").await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let server = serve(ResponseTemplate::new(200)).await;
    let client = mock_client(&server);

    let token = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::background().with_cancellation(token);

    let err = client.get_json::<Payload>(&ctx, "/thing").await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deadline_surfaces_as_timeout() {
    let server = serve(ResponseTemplate::new(200).set_delay(Duration::from_secs(10))).await;
    let client = mock_client(&server);

    let ctx = RequestContext::background().with_timeout(Duration::from_millis(100));
    let err = client.get_json::<Payload>(&ctx, "/thing").await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
    assert!(err.as_status().is_none());
}
