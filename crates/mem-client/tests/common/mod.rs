//! Shared fixtures for the client integration tests.
#![allow(dead_code)]

use mem_client::ClientConfig;
use mem_telemetry::RecordingSink;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const API_KEY: &str = "m0-test-key";
pub const USER: &str = "test-user";

pub fn ping_mock(body: Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/v1/ping/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

pub async fn start_server() -> MockServer {
    let server = MockServer::start().await;
    ping_mock(json!({ "status": "ok" })).mount(&server).await;
    server
}

pub fn config(server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .api_key(API_KEY)
        .host(server.uri())
        .user_id(USER)
}

pub fn config_with_sink(server: &MockServer, sink: &RecordingSink) -> ClientConfig {
    config(server).telemetry(Arc::new(sink.clone()))
}

pub fn entity_list() -> Value {
    json!({
        "results": [
            { "type": "user", "id": "alex" },
            { "type": "agent", "id": "planner" },
            { "type": "run", "id": "run-7" }
        ]
    })
}

/// Paths of the DELETE requests the server saw, in arrival order.
pub fn deleted_paths(requests: &[Request]) -> Vec<String> {
    requests
        .iter()
        .filter(|r| r.method.as_str() == "DELETE")
        .map(|r| r.url.path().to_string())
        .collect()
}

pub fn find<'a>(requests: &'a [Request], verb: &str, url_path: &str) -> Option<&'a Request> {
    requests
        .iter()
        .find(|r| r.method.as_str() == verb && r.url.path() == url_path)
}
