//! End-to-end scenarios against an in-process axum service.
//!
//! These tests drive a small items API through the public facade: chained
//! calls, templated paths, headers and bodies, typed decoding, and failure
//! reporting.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use iffy::prelude::*;
use iffy::{CollectingReporter, RunError, load_settings};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    id: u64,
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NewItem {
    name: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Clone, Default)]
struct AppState {
    items: Arc<Mutex<Vec<Item>>>,
}

const TOKEN: &str = "abc123";

async fn create_item(
    State(state): State<AppState>,
    Json(new): Json<NewItem>,
) -> (StatusCode, Json<Item>) {
    let mut items = state.items.lock();
    let item = Item {
        id: 7 + items.len() as u64,
        name: new.name,
        tags: new.tags,
    };
    items.push(item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Item>, StatusCode> {
    state
        .items
        .lock()
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.items.lock().clone())
}

async fn login() -> Json<Value> {
    Json(json!({"token": TOKEN, "user": {"name": "ada", "role": "admin"}}))
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(Json(json!({"name": "ada"}))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let map: serde_json::Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();
    Json(Value::Object(map))
}

fn app() -> Router {
    iffy::init_tracing();
    Router::new()
        .route("/items", post(create_item).get(list_items))
        .route("/items/{id}", get(get_item))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/headers", get(echo_headers))
        .with_state(AppState::default())
}

#[tokio::test]
async fn test_zero_calls_pass() {
    let report = tester(app()).run().await;
    assert!(report.passed());
    assert!(report.outcomes.is_empty());
}

#[tokio::test]
async fn test_create_then_fetch() {
    let mut tester = tester(app());
    tester
        .add_call(
            "create",
            Method::POST,
            "/items",
            JsonBody::new(&json!({"name": "widget", "tags": ["blue"]})).unwrap(),
        )
        .check(expect_status(201))
        .check(expect_json_fields(["id", "name"]));
    tester
        .add_call("fetch", Method::GET, r#"/items/{{field "create" "id"}}"#, ())
        .check(expect_status(200))
        .check(expect_json_branch(["name", "widget"]))
        .check(expect_content_type("application/json"));

    let report = tester.run().await;

    report.assert_passed();
    assert_eq!(
        report.outcome("fetch").unwrap().uri.as_deref(),
        Some("/items/7")
    );
    assert_eq!(tester.values().json(&["fetch", "tags"]).unwrap(), r#"["blue"]"#);
}

#[tokio::test]
async fn test_body_templates_copy_captured_values() {
    let mut tester = tester(app());
    tester.add_call(
        "first",
        Method::POST,
        "/items",
        JsonBody::from_value(json!({"name": "widget", "tags": ["a", "b"]})),
    );
    tester
        .add_call(
            "copy",
            Method::POST,
            "/items",
            StringBody::new(
                r#"{"name": "{{field "first" "name"}} copy", "tags": {{json "first" "tags"}}}"#,
            )
            .with_content_type("application/json"),
        )
        .check(expect_status(201))
        .check(expect_json_branch(["name", "widget copy"]));
    tester
        .add_call("list", Method::GET, "/items", ())
        .check(expect_list_length(2))
        .check(expect_list_non_empty);

    let report = tester.run().await;

    report.assert_passed();
    assert_eq!(
        tester.values().json(&["copy", "tags"]).unwrap(),
        r#"["a","b"]"#
    );
}

#[tokio::test]
async fn test_header_templates_carry_token() {
    let mut tester = tester(app());
    tester
        .add_call("login", Method::POST, "/login", ())
        .check(expect_json_branch(["user", "role", "admin"]));
    tester
        .add_call("me", Method::GET, "/me", ())
        .header("authorization", r#"Bearer {{field "login" "token"}}"#)
        .check(expect_status(200));
    tester
        .add_call("anonymous", Method::GET, "/me", ())
        .check(expect_status(401));

    tester.run().await.assert_passed();
}

#[tokio::test]
async fn test_typed_decode() {
    let created = Captured::<Item>::new();
    let mut tester = tester(app());
    tester
        .add_call(
            "create",
            Method::POST,
            "/items",
            JsonBody::from_value(json!({"name": "gear"})),
        )
        .decode_into(created.clone())
        .check(expect_decoded::<Item, _>(|item: &Item| {
            if item.name == "gear" {
                Ok(())
            } else {
                Err(CheckError::custom(format!("unexpected name {}", item.name)))
            }
        }));

    tester.run().await.assert_passed();

    let item = created.get().unwrap();
    assert_eq!(item.id, 7);
    assert_eq!(item.name, "gear");
}

#[tokio::test]
async fn test_failures_do_not_stop_the_run() {
    let reporter = CollectingReporter::new();
    let mut tester = tester(app()).with_reporter(reporter.clone());
    tester
        .add_call("missing", Method::GET, "/items/99", ())
        .check(expect_status(200));
    tester
        .add_call("broken", Method::GET, r#"/items/{{field "missing" "id" "x"}}"#, ())
        .check(expect_status(200));
    tester
        .add_call(
            "create",
            Method::POST,
            "/items",
            JsonBody::from_value(json!({"name": "late"})),
        )
        .check(expect_status(201));

    let report = tester.run().await;

    assert!(!report.passed());
    assert_eq!(
        reporter.messages(),
        vec![
            "missing: bad status code: expected 200, got 404".to_string(),
            "broken: template error: cannot dereference <no value> with key 'x'".to_string(),
        ]
    );
    assert!(matches!(
        report.failures_for("broken").next().unwrap().error,
        RunError::Render(_)
    ));
    assert_eq!(report.failures_for("create").count(), 0);
    assert_eq!(
        report.outcome("create").unwrap().status,
        Some(StatusCode::CREATED)
    );
}

#[tokio::test]
async fn test_settings_file_adds_default_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iffy.yaml");
    std::fs::write(
        &path,
        "default_headers:\n  x-suite: smoke\n  x-token: '{{field \"login\" \"token\"}}'\n",
    )
    .unwrap();
    let settings = load_settings(&path).unwrap();

    let mut tester = tester(app()).with_settings(settings);
    tester.add_call("login", Method::POST, "/login", ());
    tester
        .add_call("headers", Method::GET, "/headers", ())
        .header("x-call", "direct")
        .check(expect_status(200))
        .check(expect_header("content-type", Some("application/json")));

    tester.run().await.assert_passed();

    assert_eq!(tester.values().field(&["headers", "x-suite"]).unwrap(), "smoke");
    assert_eq!(tester.values().field(&["headers", "x-token"]).unwrap(), TOKEN);
    assert_eq!(tester.values().field(&["headers", "x-call"]).unwrap(), "direct");
}
