// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # decal CLI
//!
//! Command-line front end for the decal component-library tool.
//!
//! ## Features
//!
//! - **Preview server**: Live component previews with on-the-fly formatting
//! - **Live Reload**: Pages reload when project files change
//! - **Build**: Compile every component and bundle into `_dist/`
//! - **Scaffolding**: Create projects, configuration and components
//!
//! ## Usage
//!
//! ```bash
//! # Create a new project
//! decal new project my-library
//!
//! # Add a component to the styles collection
//! decal new component "Alert Banner" --collection styles
//!
//! # Start the preview server
//! decal serve --port 3000
//!
//! # Build into _dist/
//! decal build
//! ```
//!
//! ## Configuration
//!
//! Projects are configured via `decal.toml`:
//!
//! ```toml
//! [project]
//! name = "my-library"
//!
//! [dev]
//! port = 3000
//!
//! [[collection]]
//! preset = "sass"
//! ```

/// CLI command implementations (build, new, serve).
pub mod commands;
/// Project configuration loading from `decal.toml`.
pub mod config;
/// Development server with live reload.
pub mod server;
/// File system watching for live reload.
pub mod watcher;
