// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # decal
//!
//! Project model and build/serve pipeline for component libraries.
//!
//! A decal project is a directory of collections (`styles/`,
//! `web-components/`), each holding one subdirectory per component. Every
//! component kind declares the formats that compile its sources, the
//! scaffolds that create its files, and the includes that load it into a
//! live preview page.
//!
//! ## Features
//!
//! - Convention-based discovery: membership is the current set of directories
//! - Pluggable formats backed by closures or external compilers
//! - Template scaffolds for new components and regenerated bundles
//! - Serve-time resolution of preview pages and on-the-fly compiled assets
//! - Concurrent builds into `_dist/` with per-artifact failure isolation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use decal::{Preset, Project};
//!
//! let mut builder = Project::builder("./my-library");
//! builder.add_plugin(&Preset::Sass)?;
//! let project = builder.build()?;
//!
//! let report = project.build().await;
//! assert!(report.is_success());
//! ```

/// Name casings for directories, files and generated code.
pub mod casing;
/// Collections and member discovery.
pub mod collection;
/// External command formatters.
pub mod command;
/// Component templates and project bindings.
pub mod component;
/// Error types.
pub mod error;
/// File-type pipelines.
pub mod format;
/// Preview-page includes and toggle rules.
pub mod include;
/// Preview and digest page rendering.
pub mod page;
/// Built-in presets.
pub mod presets;
/// The project aggregate and build pipeline.
pub mod project;
/// Serve-time request resolution.
pub mod resolve;
/// Create and refresh scaffolds.
pub mod scaffold;
/// Template-based scaffolders.
pub mod template;

pub use casing::NameCasing;
pub use collection::{Collection, DirectoryScan, MemberLister, ProjectCollection};
pub use command::{CommandFormatter, CommandInput};
pub use component::{Component, ProjectComponent};
pub use error::{ConfigError, ConfigResult, FormatError, FormatResult, ScaffoldError, ScaffoldResult};
pub use format::{
    resolve_extension, ArtifactOutcome, ExtensionSource, FileType, FnFormatter, Format, FormatBuilder,
    Formatter, Namer, Passthrough, SkipReason,
};
pub use include::{is_enabled, select_scenario, Include, IncludeMode, QueryToggle};
pub use presets::{Preset, DEFAULT_PRESETS};
pub use project::{BuildReport, Plugin, Project, ProjectBuilder};
pub use resolve::{resolve, Query, Resolution};
pub use scaffold::{Scaffold, ScaffoldMode, ScaffoldOutcome, Scaffolder};
pub use template::{TemplateFile, TemplateScaffolder};
