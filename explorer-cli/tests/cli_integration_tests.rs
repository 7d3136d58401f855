//! Integration tests for the `explorer` binary.

use assert_cmd::cargo::cargo_bin_cmd;
use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use predicates::prelude::PredicateBooleanExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use tempfile::TempDir;

fn explorer(session_dir: &TempDir, api_base: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("explorer");
    cmd.env("EXPLORER_SESSION_DIR", session_dir.path())
        .env("EXPLORER_API_BASE", api_base)
        .env_remove("RUST_LOG")
        .timeout(std::time::Duration::from_secs(10));
    cmd
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn api() -> Router {
    Router::new()
        .route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "secret" {
                    (
                        StatusCode::OK,
                        Json(json!({"access_token": "t1", "refresh_token": "r1"})),
                    )
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({"detail": "Invalid credentials"})),
                    )
                }
            }),
        )
        .route(
            "/search",
            get(
                |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                    if bearer(&headers) != Some("t1") {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"detail": "Not authenticated"})),
                        );
                    }
                    let query = params.get("query").cloned().unwrap_or_default();
                    (
                        StatusCode::OK,
                        Json(json!({"results": [{"title": format!("About {query}")}]})),
                    )
                },
            ),
        )
        .route(
            "/search/history",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"detail": "expired token"})),
                )
            }),
        )
        .route(
            "/image",
            post(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "id": 7,
                    "prompt": params.get("prompt").cloned().unwrap_or_default(),
                    "image_url": "",
                    "url": "https://img/7.png"
                }))
            }),
        )
        .route(
            "/image/history",
            get(|| async {
                Json(json!({"image_history": [
                    {"id": 4, "prompt": "a cat, sleeping", "image_url": "https://img/4.png", "timestamp": "t4"}
                ]}))
            }),
        )
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("explorer");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("login"))
        .stdout(predicates::str::contains("whoami"))
        .stdout(predicates::str::contains("history"))
        .stdout(predicates::str::contains("completion"));
}

#[test]
fn test_history_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let mut cmd = explorer(&dir, "http://127.0.0.1:9");
    cmd.args(["history", "videos"]);

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("invalid value"));
}

#[test]
fn test_whoami_without_session_fails() {
    let dir = TempDir::new().unwrap();
    let mut cmd = explorer(&dir, "http://127.0.0.1:9");
    cmd.arg("whoami");

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("no active session found"));
}

#[test]
fn test_search_without_session_fails() {
    let dir = TempDir::new().unwrap();
    let mut cmd = explorer(&dir, "http://127.0.0.1:9");
    cmd.args(["search", "rust"]);

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("run `explorer login` first"));
}

#[test]
fn test_logout_is_idempotent() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ace_auth.json"),
        r#"{"access_token":"t1","user":{"role":"user"}}"#,
    )
    .unwrap();

    explorer(&dir, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicates::str::contains("Removed session"));
    assert!(!dir.path().join("ace_auth.json").exists());

    explorer(&dir, "http://127.0.0.1:9")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicates::str::contains("No session found"));
}

#[test]
fn test_corrupt_session_is_treated_as_logged_out() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("ace_auth.json"), "{not json").unwrap();

    explorer(&dir, "http://127.0.0.1:9")
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicates::str::contains("no active session found"));
}

#[test]
fn test_completion_generates_script() {
    let mut cmd = cargo_bin_cmd!("explorer");
    cmd.args(["completion", "--shell", "bash"]);

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("explorer"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_search_and_forced_logout() {
    let base = spawn(api()).await;
    let dir = TempDir::new().unwrap();

    explorer(&dir, &base)
        .args(["login", "--email", "a@b.c", "--password-stdin"])
        .write_stdin("secret\n")
        .assert()
        .success()
        .stdout(predicates::str::contains("Logged in as a@b.c"))
        .stdout(predicates::str::contains("role: user"));
    assert!(dir.path().join("ace_auth.json").exists());

    explorer(&dir, &base)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicates::str::contains("a@b.c"));

    explorer(&dir, &base)
        .args(["search", "rust & cargo"])
        .assert()
        .success()
        .stdout(predicates::str::contains("About rust & cargo"));

    explorer(&dir, &base)
        .args(["history", "search"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("session expired; run `explorer login`"))
        .stderr(predicates::str::contains("expired token"));
    assert!(!dir.path().join("ace_auth.json").exists());

    explorer(&dir, &base)
        .arg("whoami")
        .assert()
        .failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_with_wrong_password_fails() {
    let base = spawn(api()).await;
    let dir = TempDir::new().unwrap();

    explorer(&dir, &base)
        .args(["login", "--email", "a@b.c", "--password-stdin"])
        .write_stdin("wrong\n")
        .assert()
        .failure()
        .stderr(predicates::str::contains("Invalid credentials"))
        .stderr(predicates::str::contains("session expired").not());
    assert!(!dir.path().join("ace_auth.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_history_export_writes_csv() {
    let base = spawn(api()).await;
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ace_auth.json"),
        r#"{"access_token":"t1","user":{"role":"user"}}"#,
    )
    .unwrap();
    let out = dir.path().join("images.csv");

    explorer(&dir, &base)
        .args(["history", "image", "--export"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicates::str::contains("Exported 1 rows"));

    let csv = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        csv,
        "ID,Prompt,Image URL,Timestamp\n4,\"a cat, sleeping\",https://img/4.png,t4"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_image_prints_fallback_url() {
    let base = spawn(api()).await;
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("ace_auth.json"),
        r#"{"access_token":"t1","user":{"role":"user"}}"#,
    )
    .unwrap();

    explorer(&dir, &base)
        .args(["image", "a lighthouse"])
        .assert()
        .success()
        .stdout(predicates::str::contains("id: 7"))
        .stdout(predicates::str::contains("prompt: a lighthouse"))
        .stdout(predicates::str::contains("url: https://img/7.png"));
}
