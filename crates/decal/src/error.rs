// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the decal project model.
//!
//! Errors fall into three families, each with a different propagation policy:
//!
//! - [`ConfigError`]: the static project shape is invalid. These are fatal and
//!   abort startup before any build or serve work begins.
//! - [`FormatError`]: a formatter rejected one artifact. Contained at the
//!   artifact boundary (skipped in build mode, HTTP 500 in serve mode).
//! - [`ScaffoldError`]: a scaffolder failed for one component. Logged with
//!   the scaffold name and component slug, never propagated to the host.

use std::time::Duration;
use thiserror::Error;

/// Invalid static configuration of a Format, Component, Collection or Scaffold.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required field was empty or missing.
    #[error("{kind} error: no \"{field}\" specified")]
    MissingField {
        /// The kind of object being constructed ("Format", "Collection", ...).
        kind: &'static str,
        /// The missing field.
        field: &'static str,
    },

    /// A Format has neither an entry-point rule nor an extension.
    #[error("Format error: {0}. No entry point or extension specified, the source file cannot be located")]
    NoEntryPoint(String),

    /// Two collections share a directory name.
    #[error("Collection error: directory \"{0}\" is used by more than one collection")]
    DuplicateCollection(String),

    /// A collection or root component collides with a reserved output directory.
    #[error("Collection error: directory \"{0}\" is reserved")]
    ReservedDirectory(String),

    /// A preset name did not match any built-in preset.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// A scaffold template failed to compile.
    #[error("Scaffold template error in {name}: {message}")]
    Template {
        /// The scaffold name.
        name: String,
        /// The template compiler's message.
        message: String,
    },

    /// Any other invalid value.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failure of a single formatter invocation.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An external compiler exited unsuccessfully.
    #[error("{program} failed: {stderr}")]
    Command {
        /// The program that was run.
        program: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The formatter did not settle before the project's deadline.
    #[error("formatter timed out after {0:?}")]
    Timeout(Duration),

    /// A formatter reported an error message.
    #[error("{0}")]
    Message(String),
}

/// Failure of a single scaffolder invocation.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A scaffold template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A scaffolder reported an error message.
    #[error("{0}")]
    Message(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for formatter operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Result type for scaffold operations.
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = ConfigError::MissingField {
            kind: "Collection",
            field: "name",
        };
        assert_eq!(err.to_string(), "Collection error: no \"name\" specified");
    }

    #[test]
    fn test_command_error_carries_stderr() {
        let err = FormatError::Command {
            program: "sass".to_string(),
            stderr: "expected \";\"".to_string(),
        };
        assert!(err.to_string().contains("sass failed"));
        assert!(err.to_string().contains("expected"));
    }
}
