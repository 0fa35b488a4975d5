// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server for development with live reload.
//!
//! This is a thin adapter: it converts the request path and query into a
//! `decal::Query`, calls `decal::resolve()`, and converts the resulting
//! `Resolution` back to HTTP. Files no format claims are handed to a
//! `ServeDir` rooted at the project.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State, WebSocketUpgrade},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use decal::page::html_escape;
use decal::{resolve, Project, Query, Resolution};
use percent_encoding::percent_decode_str;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::livereload::{handle_websocket, RELOAD_MESSAGE};

/// Shared application state for the development server.
pub struct AppState {
    /// The validated project.
    pub project: Project,
    /// Channel for sending reload notifications.
    pub reload_tx: Arc<broadcast::Sender<()>>,
    /// Shared assets served under `/assets`.
    pub assets_dir: PathBuf,
}

/// Builds the router: live reload, shared assets, and the resolver fallback.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket endpoint for live reload
        .route("/__livereload", get(livereload_handler))
        .nest_service("/assets", ServeDir::new(&state.assets_dir))
        // Everything else goes through the resolver
        .fallback(fallback_handler)
        .with_state(state)
}

/// Creates and starts the development HTTP server.
pub async fn create_server(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_app(state);

    // Bind and serve until the process is stopped
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // Each client gets its own receiver
    let rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, rx))
}

/// Resolves every request that is not live reload or a shared asset.
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    // Component routes are matched against decoded paths, as ServeDir does
    let raw_path = request.uri().path().to_string();
    let path = match percent_decode_str(&raw_path).decode_utf8() {
        Ok(path) => path.into_owned(),
        Err(_) => return not_found(&raw_path),
    };
    let query = Query::from_pairs(
        form_urlencoded::parse(request.uri().query().unwrap_or_default().as_bytes()).into_owned(),
    );

    match resolve(&state.project, &path, &query).await {
        Resolution::Redirect { location } => redirect_response(&location),
        Resolution::Digest { html } => Html(inject_livereload_script(&html)).into_response(),
        Resolution::Page { status, html } => (
            status_code(status),
            Html(inject_livereload_script(&html)),
        )
            .into_response(),
        Resolution::Asset {
            status,
            mime_type,
            body,
        } => (
            status_code(status),
            [
                (header::CONTENT_TYPE, mime_type),
                (header::CACHE_CONTROL, "no-store".to_string()),
            ],
            body,
        )
            .into_response(),
        Resolution::Static { path: file } => {
            tracing::debug!("Static: {}", file.display());
            // ServeDir decodes the original URI itself
            match ServeDir::new(state.project.root()).oneshot(request).await {
                Ok(response) => response.map(Body::new),
                Err(never) => match never {},
            }
        }
        Resolution::NotFound => not_found(&path),
    }
}

fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        error_page(&format!("Not found: {}", path)),
    )
        .into_response()
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_page(message: &str) -> Response {
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Error - decal</title>
    <style>
        body {{ font-family: system-ui, sans-serif; padding: 2rem; background: #1a1a2e; color: #eee; }}
        .error {{ background: #16213e; border-left: 4px solid #e94560; padding: 1rem; border-radius: 4px; }}
        pre {{ background: #0f0f1a; padding: 1rem; overflow-x: auto; border-radius: 4px; }}
    </style>
</head>
<body>
    <h1>Error</h1>
    <div class="error">
        <pre>{}</pre>
    </div>
</body>
</html>"#,
        html_escape(message)
    ))
    .into_response()
}

fn redirect_response(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}

/// Inserts the live reload client before the closing `</body>` (or
/// `</html>`) tag, or appends it.
pub fn inject_livereload_script(html: &str) -> String {
    let script = format!(
        r#"
<script>
(function() {{
    const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
    const ws = new WebSocket(protocol + '//' + window.location.host + '/__livereload');
    ws.onmessage = function(event) {{
        if (event.data === '{message}') {{
            console.log('[decal] Reloading...');
            window.location.reload();
        }}
    }};
    ws.onclose = function() {{
        console.log('[decal] Connection lost, attempting to reconnect...');
        setTimeout(function() {{
            window.location.reload();
        }}, 1000);
    }};
}})();
</script>
"#,
        message = RELOAD_MESSAGE
    );

    // Match on the original bytes; the tags are ASCII, so any hit is a char boundary
    match rfind_tag(html, "</body>").or_else(|| rfind_tag(html, "</html>")) {
        Some(pos) => {
            let mut result = html.to_string();
            result.insert_str(pos, &script);
            result
        }
        None => format!("{}{}", html, script),
    }
}

/// Byte offset of the last ASCII case-insensitive occurrence of `tag`.
fn rfind_tag(html: &str, tag: &str) -> Option<usize> {
    html.as_bytes()
        .windows(tag.len())
        .rposition(|window| window.eq_ignore_ascii_case(tag.as_bytes()))
}
