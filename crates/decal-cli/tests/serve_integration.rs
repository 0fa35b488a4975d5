// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the preview server.
//!
//! These tests drive the real router, configured from `decal.toml` text,
//! against a project laid out in a temp directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use tempfile::tempdir;
use tokio::sync::broadcast;

use decal_cli::config::Config;
use decal_cli::server::http::{create_app, AppState};

const CONFIG: &str = r#"
[project]
name = "fixture"

[[collection]]
name = "Styles"

[[collection.format]]
name = "CSS"
src_extension = ".scss"
dist_extension = ".css"
mime_type = "text/css"

[[collection.format]]
name = "Shout"
extension = ".txt"
command = "tr a-z A-Z"
serve_only = true

[[collection.format]]
name = "Broken"
extension = ".bad"
command = "false"
serve_only = true
"#;

/// Create a project with one styles component and a shared asset.
fn setup_test_project(dir: &Path) {
    let button = dir.join("styles/button");
    fs::create_dir_all(&button).unwrap();
    fs::write(button.join("button.scss"), ".button { color: red; }\n").unwrap();
    fs::write(button.join("button.demo.html"), "<button class=\"button\">Go</button>\n").unwrap();
    fs::write(button.join("notes.txt"), "hello").unwrap();
    fs::write(button.join("oops.bad"), "anything").unwrap();
    fs::write(button.join("logo.svg"), "<svg></svg>").unwrap();

    fs::create_dir_all(dir.join("assets")).unwrap();
    fs::write(dir.join("assets/font.txt"), "font bytes").unwrap();
}

fn test_server(dir: &Path) -> TestServer {
    let project = Config::parse(CONFIG).unwrap().to_project(dir).unwrap();
    let (reload_tx, _) = broadcast::channel(16);
    let state = Arc::new(AppState {
        assets_dir: dir.join("assets"),
        project,
        reload_tx: Arc::new(reload_tx),
    });
    TestServer::new(create_app(state)).unwrap()
}

#[tokio::test]
async fn test_exit_point_is_formatted_from_current_source() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/button.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/css");
    assert_eq!(response.text(), ".button { color: red; }\n");

    fs::write(
        dir.path().join("styles/button/button.scss"),
        ".button { color: blue; }\n",
    )
    .unwrap();
    let response = server.get("/styles/button/button.css").await;
    assert_eq!(response.text(), ".button { color: blue; }\n");
}

#[tokio::test]
async fn test_source_extension_is_formatted_by_command() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/notes.txt").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "HELLO");
}

#[tokio::test]
async fn test_formatter_failure_is_500() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/oops.bad").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Errors");
}

#[tokio::test]
async fn test_missing_source_is_404() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/missing.scss").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_directory_requests_redirect_to_index() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    for path in ["/styles/button/", "/styles/button"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(response.header("location"), "/styles/button/index.html");
    }
}

#[tokio::test]
async fn test_preview_page_has_includes_and_live_reload() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/button.demo.html").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains(r#"<button class="button">Go</button>"#));
    assert!(html.contains(r#"rel="stylesheet""#));
    assert!(html.contains("/styles/button/button.scss"));
    assert!(html.contains("/__livereload"));
}

#[tokio::test]
async fn test_submitted_form_without_toggle_disables_source() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server
        .get("/styles/button/button.demo.html")
        .add_query_param("reload", "true")
        .await;
    let html = response.text();
    assert!(!html.contains(r#"rel="stylesheet""#));
    assert!(html.contains(r#"type="checkbox""#));
}

#[tokio::test]
async fn test_missing_page_is_404_with_preview_shell() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/gone.demo.html").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("File not found"));
}

#[tokio::test]
async fn test_digest_lists_components() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<h2>Styles</h2>"));
    assert!(html.contains(r#"href="/styles/button/button.demo.html""#));
    assert!(html.contains("/__livereload"));
}

#[tokio::test]
async fn test_unclaimed_files_are_served_statically() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/button/logo.svg").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "<svg></svg>");

    let response = server.get("/styles/button/nothing.svg").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shared_assets_are_mounted() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/assets/font.txt").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "font bytes");
}

#[tokio::test]
async fn test_encoded_paths_reach_components() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let uber = dir.path().join("styles/über");
    fs::create_dir_all(&uber).unwrap();
    fs::write(uber.join("über.scss"), ".uber { color: green; }\n").unwrap();
    fs::write(uber.join("über.demo.html"), "<p class=\"uber\">Ü</p>\n").unwrap();
    let server = test_server(dir.path());

    let response = server.get("/styles/%C3%BCber/%C3%BCber.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "text/css");
    assert_eq!(response.text(), ".uber { color: green; }\n");

    let response = server.get("/styles/%C3%BCber/%C3%BCber.demo.html").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("/styles/über/über.scss"));
}

#[tokio::test]
async fn test_undecodable_path_is_404() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let server = test_server(dir.path());

    let response = server.get("/styles/%FF/button.css").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_ascii_page_gets_live_reload_before_body_end() {
    let dir = tempdir().unwrap();
    setup_test_project(dir.path());
    let content = "İSTANBUL İZMİR ".repeat(10);
    fs::write(
        dir.path().join("styles/button/index.html"),
        format!("<p>{}</p>\n", content),
    )
    .unwrap();
    let server = test_server(dir.path());

    let response = server.get("/styles/button/index.html").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains(&content));
    let script = html.find("/__livereload").unwrap();
    assert!(script < html.rfind("</body>").unwrap());
}
