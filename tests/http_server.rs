//! End-to-end tests against the real accept loop over TCP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use echo_numfmt_api::error::ServiceResult;
use echo_numfmt_api::server::{ServerConfig, ServerState, router, serve};
use echo_numfmt_api::types::{EchoResponse, FormatNumberResponse, HealthResponse};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<ServiceResult<()>>,
}

impl TestServer {
    async fn start(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let app = router(Arc::new(ServerState::new(config)));
        let handle = tokio::spawn(serve(listener, app, shutdown.clone()));
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    async fn stop(self) {
        self.shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop")
            .unwrap()
            .unwrap();
    }
}

/// POST `body` and return the status with the parsed JSON body, 4xx included.
async fn post_json(url: String, body: Value) -> (u16, Value) {
    tokio::task::spawn_blocking(move || match ureq::post(&url).send_json(body) {
        Ok(resp) => (resp.status(), resp.into_json().unwrap()),
        Err(ureq::Error::Status(code, resp)) => (code, resp.into_json().unwrap()),
        Err(err) => panic!("transport error: {err}"),
    })
    .await
    .unwrap()
}

async fn get_json(url: String) -> (u16, Value) {
    tokio::task::spawn_blocking(move || match ureq::get(&url).call() {
        Ok(resp) => (resp.status(), resp.into_json().unwrap()),
        Err(ureq::Error::Status(code, resp)) => (code, resp.into_json().unwrap()),
        Err(err) => panic!("transport error: {err}"),
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_echo_over_http() {
    let server = TestServer::start(ServerConfig::default()).await;

    let message = "multi\nline ✓ message";
    let (status, body) = post_json(server.url("/echo"), json!({ "message": message })).await;
    assert_eq!(status, 200);
    let resp: EchoResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.message, message);

    // same input, same output
    let (_, again) = post_json(server.url("/echo"), json!({ "message": message })).await;
    assert_eq!(again["message"], message);

    let (status, body) = post_json(server.url("/echo"), json!({})).await;
    assert_eq!(status, 422);
    assert!(body["detail"].is_string());

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_format_number_over_http() {
    let server = TestServer::start(ServerConfig::default()).await;

    let (status, body) = post_json(server.url("/format-number"), json!({ "value": 2500000 })).await;
    assert_eq!(status, 200);
    let resp: FormatNumberResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.formatted, "2.5M");

    let (status, body) = post_json(server.url("/format-number"), json!({ "value": "NaN" })).await;
    assert_eq!(status, 422);
    assert!(body["detail"].as_str().unwrap().contains("finite"));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_health_and_openapi_over_http() {
    let server = TestServer::start(ServerConfig {
        openapi_url: Some("/openapi.json".to_string()),
        ..ServerConfig::default()
    })
    .await;

    let (status, body) = get_json(server.url("/health?verbose=true")).await;
    assert_eq!(status, 200);
    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "ok");
    assert!(
        health
            .endpoints
            .unwrap()
            .contains(&"GET /openapi.json".to_string())
    );

    let (status, doc) = get_json(server.url("/openapi.json")).await;
    assert_eq!(status, 200);
    assert_eq!(doc["openapi"], "3.1.0");

    let (status, body) = get_json(server.url("/missing")).await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Not Found");

    server.stop().await;
}
