//! End-to-end dispatch through a real listener.

use std::fs;

use module_dispatcher::config::AppConfig;
use module_dispatcher::lifecycle::{bootstrap, Bootstrap};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

const INVENTORY: &str = r#"
namespace = "Inventory"

[modules.Parts]
module_name = "Parts"
controller = "rest_api::suppliers"
get_route = "api/parts/:handle"

[modules.Shipments]
module_name = "Shipments"
controller = "inventory::shipments"
get_route = "api/shipments"
display_in_modules = false
"#;

const BROKEN: &str = r#"
namespace = "Jobs"

[modules.Jobs]
controller = "rest_api::suppliers"
get_route = "api/jobs"
unexpected = "field"
"#;

async fn start() -> (common::TestServer, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("inventory.toml"), INVENTORY).unwrap();
    fs::write(dir.path().join("jobs.toml"), BROKEN).unwrap();

    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.manifests.directory = Some(dir.path().to_string_lossy().into_owned());

    let Bootstrap { aggregator, controllers } = bootstrap(&config).unwrap();
    let server = common::start_server(config, aggregator.as_ref(), &controllers).await;
    (server, dir)
}

#[tokio::test]
async fn test_root_redirects_to_listing() {
    let (server, _dir) = start().await;

    let res = common::client().get(server.url("/")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "/modules");
}

#[tokio::test]
async fn test_listing_skips_hidden_and_broken_modules() {
    let (server, _dir) = start().await;

    let res = common::client()
        .get(server.url("/modules"))
        .header("accept", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let keys: Vec<&String> = body["modules"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["ApiKeyManagement", "Parts"]);
    assert_eq!(body["modules"]["Parts"]["route"], "api/parts/:handle");
}

#[tokio::test]
async fn test_get_reaches_controller_with_params() {
    let (server, _dir) = start().await;
    let client = common::client();

    let res = client.get(server.url("/api/suppliers/acme")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"handle": "acme"}));

    let res = client.get(server.url("/api/parts/bolt-7")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"handle": "bolt-7"}));
}

#[tokio::test]
async fn test_post_body_and_params() {
    let (server, _dir) = start().await;

    let res = common::client()
        .post(server.url("/api/keys/update/rotate/acme"))
        .json(&json!({"key": "k-123"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"type": "rotate", "handle": "acme", "update": {"key": "k-123"}})
    );
}

#[tokio::test]
async fn test_form_body_is_decoded() {
    let (server, _dir) = start().await;

    let res = common::client()
        .post(server.url("/api/suppliers"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=Acme+Corp&city=Oslo")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await.unwrap(),
        json!({"created": {"name": "Acme Corp", "city": "Oslo"}})
    );
}

#[tokio::test]
async fn test_controller_committed_response_is_untouched() {
    let (server, _dir) = start().await;

    let res = common::client().delete(server.url("/api/suppliers/acme")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_declined_reply_carries_module_context() {
    let (server, _dir) = start().await;

    let res = common::client().post(server.url("/api/suppliers")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["module"], "Suppliers");
    assert_eq!(body["module_info"]["postRoute"], "api/suppliers");
    assert_eq!(body["error"], "missing supplier payload");
}

#[tokio::test]
async fn test_unregistered_controller_is_500() {
    let (server, _dir) = start().await;

    let res = common::client().get(server.url("/api/shipments")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["module"], "Shipments");
    assert_eq!(body["error"], "Internal server error. Check logs.");
}

#[tokio::test]
async fn test_broken_namespace_registers_nothing() {
    let (server, _dir) = start().await;

    let res = common::client().get(server.url("/api/jobs")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash_redirect() {
    let (server, _dir) = start().await;

    let res = common::client().get(server.url("/api/suppliers/acme/?x=1")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()["location"], "/api/suppliers/acme?x=1");
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let (server, _dir) = start().await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = server.url(&format!("/api/suppliers/s{i}"));
        tasks.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            (res.status(), res.json::<Value>().await.unwrap())
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let (status, body) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handle"], format!("s{i}"));
    }
}
