// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! WebSocket relay for file-change notifications.

use axum::extract::ws::{Message, WebSocket};
use tokio::sync::broadcast;

/// Message sent to preview pages when the project changed.
pub const RELOAD_MESSAGE: &str = "reload";

/// Forwards every change signal on `rx` to one connected preview page until
/// either side goes away.
pub async fn handle_websocket(mut socket: WebSocket, mut rx: broadcast::Receiver<()>) {
    loop {
        tokio::select! {
            // A project change was broadcast
            result = rx.recv() => {
                match result {
                    Ok(()) => {
                        // Tell the page to reload; a failed send means it is gone
                        if socket.send(Message::Text(RELOAD_MESSAGE.to_string())).await.is_err() {
                            break;
                        }
                    }
                    // Server shutting down
                    Err(broadcast::error::RecvError::Closed) => break,
                    // A page that missed signals only needs one reload.
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!("Live reload client lagged by {} signals", skipped);
                        if socket.send(Message::Text(RELOAD_MESSAGE.to_string())).await.is_err() {
                            break;
                        }
                    }
                }
            }
            // Traffic from the page itself
            msg = socket.recv() => {
                match msg {
                    // Closed, dropped or broken connection
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    // Keep-alive
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    // The client never sends anything we act on
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
