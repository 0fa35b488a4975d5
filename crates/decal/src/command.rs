// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Formatters backed by external compilers.
//!
//! [`CommandFormatter`] runs a program such as `sass` or `esbuild` as a
//! child process. Arguments may reference the source file:
//!
//! - `{path}`: the absolute path of the file being formatted
//! - `{dir}`: its parent directory
//!
//! Input is either piped on stdin (the default) or left for the program to
//! read from `{path}`. Standard output becomes the formatted contents.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{ConfigError, ConfigResult, FormatError, FormatResult};
use crate::format::Formatter;

/// How file contents reach the external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandInput {
    /// Contents are written to the program's stdin.
    #[default]
    Stdin,
    /// The program reads the file itself, typically via `{path}`.
    Path,
}

/// Runs an external program as a formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
    input: CommandInput,
}

impl CommandFormatter {
    /// Creates a formatter that pipes contents to `program`.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            input: CommandInput::Stdin,
        }
    }

    /// Parses a whitespace-separated command line such as `sass --stdin`.
    pub fn parse(command_line: &str) -> ConfigResult<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ConfigError::Invalid("empty formatter command".to_string()))?;
        Ok(Self::new(program, parts))
    }

    /// Sets how contents are passed to the program.
    pub fn with_input(mut self, input: CommandInput) -> Self {
        self.input = input;
        self
    }

    /// The program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn expand_args(&self, path: &Path) -> Vec<String> {
        let path_str = path.to_string_lossy();
        let dir = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.args
            .iter()
            .map(|arg| arg.replace("{path}", &path_str).replace("{dir}", &dir))
            .collect()
    }
}

#[async_trait]
impl Formatter for CommandFormatter {
    async fn format(&self, path: &Path, contents: &str) -> FormatResult<String> {
        let stdin = match self.input {
            CommandInput::Stdin => Stdio::piped(),
            CommandInput::Path => Stdio::null(),
        };

        let mut child = Command::new(&self.program)
            .args(self.expand_args(path))
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| FormatError::Command {
                program: self.program.clone(),
                stderr: e.to_string(),
            })?;

        // Feed stdin from a separate task so a large stdout cannot stall the write.
        let writer = child.stdin.take().map(|mut pipe| {
            let input = contents.to_string();
            tokio::spawn(async move {
                let _ = pipe.write_all(input.as_bytes()).await;
            })
        });

        let output = child.wait_with_output().await?;
        if let Some(writer) = writer {
            let _ = writer.await;
        }

        if !output.status.success() {
            return Err(FormatError::Command {
                program: self.program.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| FormatError::Message(format!("{} produced invalid UTF-8: {}", self.program, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let cmd = CommandFormatter::parse("esbuild --bundle --format=esm {path}").unwrap();
        assert_eq!(cmd.program(), "esbuild");
        assert_eq!(
            cmd.expand_args(Path::new("/p/web-components/nav/nav.js")),
            vec!["--bundle", "--format=esm", "/p/web-components/nav/nav.js"]
        );
    }

    #[test]
    fn test_parse_empty_command_fails() {
        assert!(CommandFormatter::parse("   ").is_err());
    }

    #[test]
    fn test_dir_placeholder() {
        let cmd = CommandFormatter::new("sass", ["--stdin", "--load-path={dir}"]);
        assert_eq!(
            cmd.expand_args(Path::new("/p/styles/button/button.scss")),
            vec!["--stdin", "--load-path=/p/styles/button"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdin_is_piped_to_program() {
        let cmd = CommandFormatter::new("cat", Vec::<String>::new());
        let out = cmd.format(Path::new("a.css"), "a { color: red }").await.unwrap();
        assert_eq!(out, "a { color: red }");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_command_error() {
        let cmd = CommandFormatter::new("sh", ["-c", "echo broken >&2; exit 3"]);
        let err = cmd.format(Path::new("a.css"), "").await.unwrap_err();
        match err {
            FormatError::Command { program, stderr } => {
                assert_eq!(program, "sh");
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_command_error() {
        let cmd = CommandFormatter::new("decal-no-such-program", Vec::<String>::new());
        let err = cmd.format(Path::new("a.css"), "").await.unwrap_err();
        assert!(matches!(err, FormatError::Command { .. }));
    }
}
