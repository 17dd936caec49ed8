use clap::Parser;
use mem_cli::{run, Cli};
use mem_client::ClientConfig;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/ping/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;
    server
}

fn cli(server: &MockServer, args: &[&str]) -> Cli {
    let uri = server.uri();
    let mut argv = vec!["memctl", "--api-key", "m0-cli", "--host", uri.as_str()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn base() -> ClientConfig {
    ClientConfig::new().user_id("cli-test")
}

#[tokio::test]
async fn add_sends_text_as_user_message() {
    let server = server().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "I like tea" }],
            "user_id": "alex",
            "metadata": { "source": "cli" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "mem-1" }])))
        .mount(&server)
        .await;

    let args = cli(
        &server,
        &["add", "I like tea", "--user-id", "alex", "--metadata", r#"{"source":"cli"}"#],
    );
    let out = run(args, base()).await.unwrap();
    assert_eq!(out[0]["id"], "mem-1");
}

#[tokio::test]
async fn search_passes_limit() {
    let server = server().await;
    Mock::given(method("POST"))
        .and(path("/v2/memories/search/"))
        .and(body_json(json!({
            "query": "tea",
            "filters": { "user_id": "alex" },
            "limit": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let args = cli(
        &server,
        &[
            "search",
            "tea",
            "--api-version",
            "v2",
            "--limit",
            "5",
            "--filters",
            r#"{"user_id":"alex"}"#,
        ],
    );
    assert_eq!(run(args, base()).await.unwrap(), json!([]));
}

#[tokio::test]
async fn project_get_uses_flag_ids() {
    let server = server().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orgs/organizations/org-1/projects/proj-1/"))
        .and(query_param("fields", "custom_instructions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "custom_instructions": "short" })),
        )
        .mount(&server)
        .await;

    let args = cli(
        &server,
        &[
            "--org-id",
            "org-1",
            "--project-id",
            "proj-1",
            "project",
            "get",
            "--fields",
            "custom_instructions",
        ],
    );
    let out = run(args, base()).await.unwrap();
    assert_eq!(out["custom_instructions"], "short");
}

#[tokio::test]
async fn reset_requires_confirmation() {
    let server = server().await;
    let err = run(cli(&server, &["reset"]), base()).await.unwrap_err();
    assert!(err.to_string().contains("--yes"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn service_errors_are_returned() {
    let server = server().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/nope/"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = run(cli(&server, &["get", "nope"]), base()).await.unwrap_err();
    assert!(err.to_string().contains("404"));
}
