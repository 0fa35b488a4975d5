// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server components.
//!
//! This module provides the HTTP server and live reload functionality
//! behind `decal serve`.
//!
//! # Components
//!
//! - `http`: HTTP server using Axum
//! - `livereload`: WebSocket-based reload relay

/// HTTP server implementation using Axum.
pub mod http;
/// Live reload WebSocket server.
pub mod livereload;
