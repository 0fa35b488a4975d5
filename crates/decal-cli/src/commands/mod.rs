// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! Each submodule implements one `decal` command:
//!
//! - `build`: Compile every component into `_dist/`
//! - `new`: Create projects, configuration files and components
//! - `serve`: Preview server with on-the-fly formatting and live reload

/// Build command for writing artifacts into `_dist/`.
pub mod build;
/// Project, configuration and component creation.
pub mod new;
/// Development server with live reload.
pub mod serve;
