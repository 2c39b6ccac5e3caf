//! Integration tests for the bundled HTTP transport against a mock server.

use mockito::{Matcher, Server};
use volley::{HttpTransport, RequestTemplate, TargetRequest, Transport, TransportError};

fn get_request(url: &str) -> TargetRequest {
    RequestTemplate::new().resolve(0, url)
}

#[tokio::test]
async fn test_fetch_realizes_owned_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/ok")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("hello")
        .create_async()
        .await;

    let transport = HttpTransport::new().expect("Failed to build transport");
    let response = transport
        .fetch(&get_request(&format!("{}/ok", server.url())))
        .await
        .expect("fetch failed");

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert_eq!(response.body.as_ref(), b"hello");
    assert_eq!(
        response.headers.get("content-type").map(String::as_str),
        Some("text/plain")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_a_response_not_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/broken")
        .with_status(503)
        .with_body("upstream down")
        .create_async()
        .await;

    let transport = HttpTransport::new().expect("Failed to build transport");
    let response = transport
        .fetch(&get_request(&format!("{}/broken", server.url())))
        .await
        .expect("a 5xx must still realize as a response");

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert_eq!(response.body.as_ref(), b"upstream down");
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let transport = HttpTransport::new().expect("Failed to build transport");

    // Port 1 is never listening
    let outcome = transport.fetch(&get_request("http://127.0.0.1:1/")).await;

    assert!(matches!(outcome, Err(TransportError::Http(_))));
}

#[tokio::test]
async fn test_invalid_target_rejected_without_dispatch() {
    let transport = HttpTransport::new().expect("Failed to build transport");

    let outcome = transport.fetch(&get_request("not a url")).await;

    match outcome {
        Err(TransportError::InvalidTarget { url, .. }) => assert_eq!(url, "not a url"),
        other => panic!("expected InvalidTarget, got {other:?}"),
    }
}

#[tokio::test]
async fn test_template_method_headers_and_body_forwarded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/submit")
        .match_header("x-api-key", "secret")
        .match_body(Matcher::Json(serde_json::json!({"probe": true})))
        .with_status(201)
        .create_async()
        .await;

    let template = RequestTemplate::new()
        .with_method("POST")
        .with_header("x-api-key", "secret")
        .with_body(serde_json::json!({"probe": true}));

    let transport = HttpTransport::new().expect("Failed to build transport");
    let response = transport
        .fetch(&template.resolve(0, &format!("{}/submit", server.url())))
        .await
        .expect("fetch failed");

    assert_eq!(response.status, 201);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_head_requests_dispatch_with_head_method() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("HEAD", "/ping")
        .with_status(200)
        .create_async()
        .await;

    let template = RequestTemplate::new().with_method("head");
    let transport = HttpTransport::new().expect("Failed to build transport");
    let response = transport
        .fetch(&template.resolve(0, &format!("{}/ping", server.url())))
        .await
        .expect("fetch failed");

    assert_eq!(response.status, 200);
    mock.assert_async().await;
}
