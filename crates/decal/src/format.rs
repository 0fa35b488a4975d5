// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! File-type pipelines owned by component templates.
//!
//! A [`Format`] knows how to find a component's source file (the entry
//! point), where its build artifact goes (the exit point), which MIME types
//! apply on each side, how to transform the contents, and which [`Include`]
//! it contributes to preview pages.
//!
//! # Extension resolution
//!
//! Formats accept several optional naming inputs. [`resolve_extension`]
//! reduces them to a single tagged result so the fallback order is explicit:
//!
//! 1. an explicit extension for that side (`src`/`dist`)
//! 2. a sibling value (the shared `extension`, or for `dist` the source side)
//! 3. the extension of the entry-point rule applied to a sample name
//!
//! # Examples
//!
//! ```rust,ignore
//! use decal::Format;
//!
//! let sass = Format::builder("CSS/Sass")
//!     .extension(".scss")
//!     .dist_extension(".css")
//!     .build()?;
//!
//! assert_eq!(sass.resolve_entry_point("button"), "button.scss");
//! assert_eq!(sass.resolve_exit_point("button"), "button.css");
//! ```

use async_trait::async_trait;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::component::ProjectComponent;
use crate::error::{ConfigError, ConfigResult, FormatError, FormatResult};
use crate::include::{normalize_id, Include};

/// Transforms the contents of one source file.
///
/// Formatters may be slow (external compilers) and may fail (syntax errors
/// in user content). Failures are contained per artifact by the caller.
#[async_trait]
pub trait Formatter: Send + Sync {
    /// Transforms `contents`, read from `path`, into the destination format.
    async fn format(&self, path: &Path, contents: &str) -> FormatResult<String>;
}

/// Identity formatter: the output equals the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

#[async_trait]
impl Formatter for Passthrough {
    async fn format(&self, _path: &Path, contents: &str) -> FormatResult<String> {
        Ok(contents.to_string())
    }
}

/// Adapts a synchronous closure into a [`Formatter`].
pub struct FnFormatter<F>(pub F);

#[async_trait]
impl<F> Formatter for FnFormatter<F>
where
    F: Fn(&Path, &str) -> FormatResult<String> + Send + Sync,
{
    async fn format(&self, path: &Path, contents: &str) -> FormatResult<String> {
        (self.0)(path, contents)
    }
}

/// Names a file from a component directory name.
#[derive(Clone)]
pub enum Namer {
    /// Always the same relative path.
    Static(String),
    /// A function of the component directory name.
    Derived(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl Namer {
    /// Wraps a naming function.
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Namer::Derived(Arc::new(f))
    }

    /// Applies the rule to a directory name.
    pub fn name(&self, dir_name: &str) -> String {
        match self {
            Namer::Static(path) => path.clone(),
            Namer::Derived(f) => f(dir_name),
        }
    }
}

impl fmt::Debug for Namer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namer::Static(path) => write!(f, "Static({:?})", path),
            Namer::Derived(_) => write!(f, "Derived(..)"),
        }
    }
}

/// An extension paired with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    /// Extension including the leading dot (`.scss`), or empty.
    pub extension: String,
    /// MIME type served for this side of the format.
    pub mime_type: String,
}

impl FileType {
    fn new(extension: String, mime_type: Option<String>) -> Self {
        let mime_type = mime_type.unwrap_or_else(|| guess_mime(&extension));
        Self {
            extension,
            mime_type,
        }
    }
}

fn guess_mime(extension: &str) -> String {
    mime_guess::from_ext(extension.trim_start_matches('.'))
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// Where an extension came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionSource {
    /// Given explicitly for this side.
    Explicit(String),
    /// Borrowed from a sibling value (shared extension or source side).
    DerivedFromSibling(String),
    /// Taken from the entry-point rule.
    DerivedFromEntryPoint(String),
    /// Nothing to derive from.
    Unresolved,
}

impl ExtensionSource {
    /// The resolved extension, if any.
    pub fn extension(&self) -> Option<&str> {
        match self {
            ExtensionSource::Explicit(ext)
            | ExtensionSource::DerivedFromSibling(ext)
            | ExtensionSource::DerivedFromEntryPoint(ext) => Some(ext),
            ExtensionSource::Unresolved => None,
        }
    }
}

/// Resolves one side's extension from the available inputs, in priority order.
pub fn resolve_extension(
    explicit: Option<&str>,
    sibling: Option<&str>,
    entry_point: Option<&str>,
) -> ExtensionSource {
    let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(dotted);

    if let Some(ext) = non_empty(explicit) {
        return ExtensionSource::Explicit(ext);
    }
    if let Some(ext) = non_empty(sibling) {
        return ExtensionSource::DerivedFromSibling(ext);
    }
    entry_point
        .and_then(|p| Path::new(p).extension())
        .map(|ext| ExtensionSource::DerivedFromEntryPoint(format!(".{}", ext.to_string_lossy())))
        .unwrap_or(ExtensionSource::Unresolved)
}

fn dotted(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

/// Sample directory name used to probe an entry-point rule for its extension.
const SAMPLE_DIR_NAME: &str = "component";

/// Which include a format contributes.
#[derive(Debug, Clone)]
enum IncludeChoice {
    Default,
    Disabled,
    Custom(Include),
}

/// Exit-point naming rule.
#[derive(Debug, Clone)]
enum ExitRule {
    Derived,
    Suppressed,
    Named(Namer),
}

/// Builder for [`Format`].
#[derive(Clone)]
pub struct FormatBuilder {
    name: String,
    id: Option<String>,
    entry_point: Option<Namer>,
    exit_point: ExitRule,
    extension: Option<String>,
    mime_type: Option<String>,
    src_extension: Option<String>,
    src_mime_type: Option<String>,
    dist_extension: Option<String>,
    dist_mime_type: Option<String>,
    formatter: Option<Arc<dyn Formatter>>,
    include: IncludeChoice,
}

impl FormatBuilder {
    /// Sets the identifier. Derived from the name when omitted.
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Sets a static entry point, relative to the component directory.
    pub fn entry_point(mut self, path: &str) -> Self {
        self.entry_point = Some(Namer::Static(path.to_string()));
        self
    }

    /// Sets an entry-point rule over the component directory name.
    pub fn entry_point_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.entry_point = Some(Namer::derived(f));
        self
    }

    /// Sets a static exit point, relative to the component's output directory.
    pub fn exit_point(mut self, path: &str) -> Self {
        self.exit_point = ExitRule::Named(Namer::Static(path.to_string()));
        self
    }

    /// Sets an exit-point rule over the component directory name.
    pub fn exit_point_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.exit_point = ExitRule::Named(Namer::derived(f));
        self
    }

    /// Produces no persisted artifact; the format only runs for previews.
    pub fn no_exit_point(mut self) -> Self {
        self.exit_point = ExitRule::Suppressed;
        self
    }

    /// Sets the extension shared by both sides unless overridden.
    pub fn extension(mut self, ext: &str) -> Self {
        self.extension = Some(ext.to_string());
        self
    }

    /// Sets the MIME type shared by both sides unless overridden.
    pub fn mime_type(mut self, mime: &str) -> Self {
        self.mime_type = Some(mime.to_string());
        self
    }

    /// Sets the source extension.
    pub fn src_extension(mut self, ext: &str) -> Self {
        self.src_extension = Some(ext.to_string());
        self
    }

    /// Sets the source MIME type.
    pub fn src_mime_type(mut self, mime: &str) -> Self {
        self.src_mime_type = Some(mime.to_string());
        self
    }

    /// Sets the destination extension.
    pub fn dist_extension(mut self, ext: &str) -> Self {
        self.dist_extension = Some(ext.to_string());
        self
    }

    /// Sets the destination MIME type.
    pub fn dist_mime_type(mut self, mime: &str) -> Self {
        self.dist_mime_type = Some(mime.to_string());
        self
    }

    /// Sets the formatter. Defaults to [`Passthrough`].
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Sets a shared formatter.
    pub fn shared_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Replaces the default include for this format.
    pub fn include(mut self, include: Include) -> Self {
        self.include = IncludeChoice::Custom(include);
        self
    }

    /// This format contributes no include tag.
    pub fn no_include(mut self) -> Self {
        self.include = IncludeChoice::Disabled;
        self
    }

    /// Validates the inputs and builds the format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for an empty name, and
    /// [`ConfigError::NoEntryPoint`] when neither an entry-point rule nor an
    /// extension is available.
    pub fn build(self) -> ConfigResult<Format> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                kind: "Format",
                field: "name",
            });
        }

        let sample = self.entry_point.as_ref().map(|n| n.name(SAMPLE_DIR_NAME));
        let src = resolve_extension(
            self.src_extension.as_deref(),
            self.extension.as_deref(),
            sample.as_deref(),
        );

        if self.entry_point.is_none() && src.extension().is_none() {
            return Err(ConfigError::NoEntryPoint(self.name));
        }

        let src_ext = src.extension().unwrap_or_default().to_string();
        let dist = resolve_extension(
            self.dist_extension.as_deref(),
            self.extension.as_deref().or(Some(src_ext.as_str())),
            None,
        );
        let dist_ext = dist.extension().unwrap_or_default().to_string();

        let entry_point = match self.entry_point {
            Some(namer) => namer,
            None => {
                let ext = src_ext.clone();
                Namer::derived(move |dir| format!("{}{}", dir, ext))
            }
        };

        let exit_point = match self.exit_point {
            ExitRule::Named(namer) => Some(namer),
            ExitRule::Suppressed => None,
            ExitRule::Derived => {
                let ext = dist_ext.clone();
                Some(Namer::derived(move |dir| format!("{}{}", dir, ext)))
            }
        };

        let id = normalize_id(self.id.as_deref().unwrap_or_default(), &self.name);

        let include = match self.include {
            IncludeChoice::Default => Include::default_for(&dist_ext, &id),
            IncludeChoice::Disabled => Include::inert(),
            IncludeChoice::Custom(include) => include,
        };

        let src_mime = self.src_mime_type.or_else(|| self.mime_type.clone());
        let dist_mime = self.dist_mime_type.or(self.mime_type);

        Ok(Format {
            name: self.name,
            id,
            entry_point,
            exit_point,
            src: FileType::new(src_ext, src_mime),
            dist: FileType::new(dist_ext, dist_mime),
            formatter: self.formatter.unwrap_or_else(|| Arc::new(Passthrough)),
            include,
        })
    }
}

/// A named source → destination transformation pipeline.
#[derive(Clone)]
pub struct Format {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Identifier derived from the name unless given.
    pub id: String,
    entry_point: Namer,
    exit_point: Option<Namer>,
    /// Source extension and MIME type.
    pub src: FileType,
    /// Destination extension and MIME type.
    pub dist: FileType,
    formatter: Arc<dyn Formatter>,
    /// The include this format contributes to preview pages.
    pub include: Include,
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("entry_point", &self.entry_point)
            .field("exit_point", &self.exit_point)
            .field("src", &self.src)
            .field("dist", &self.dist)
            .field("include", &self.include)
            .finish()
    }
}

/// Why an artifact was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The format produces no persisted artifact.
    NoExitPoint,
    /// The component has no entry file for this format.
    MissingEntry,
}

/// The outcome of building one component × format pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// The artifact was written.
    Written {
        /// Format name.
        format: String,
        /// Component slug.
        component: String,
        /// Output path relative to the project root.
        output: PathBuf,
    },
    /// Nothing to do for this pair.
    Skipped {
        /// Format name.
        format: String,
        /// Component slug.
        component: String,
        /// Why the artifact was skipped.
        reason: SkipReason,
    },
    /// Reading, transforming, or writing failed.
    Failed {
        /// Format name.
        format: String,
        /// Component slug.
        component: String,
        /// Error message.
        message: String,
    },
}

impl Format {
    /// Starts building a format with the given name.
    pub fn builder(name: &str) -> FormatBuilder {
        FormatBuilder {
            name: name.to_string(),
            id: None,
            entry_point: None,
            exit_point: ExitRule::Derived,
            extension: None,
            mime_type: None,
            src_extension: None,
            src_mime_type: None,
            dist_extension: None,
            dist_mime_type: None,
            formatter: None,
            include: IncludeChoice::Default,
        }
    }

    /// The source file for a component, relative to its directory.
    pub fn resolve_entry_point(&self, dir_name: &str) -> String {
        self.entry_point.name(dir_name)
    }

    /// The artifact path for a component, relative to its output directory.
    ///
    /// An empty string means the format persists nothing.
    pub fn resolve_exit_point(&self, dir_name: &str) -> String {
        self.exit_point
            .as_ref()
            .map(|namer| namer.name(dir_name))
            .unwrap_or_default()
    }

    /// Transforms `contents` with the owned formatter.
    pub async fn format(&self, path: &Path, contents: &str) -> FormatResult<String> {
        self.formatter.format(path, contents).await
    }

    /// Transforms `contents`, failing with [`FormatError::Timeout`] past `limit`.
    pub async fn format_within(
        &self,
        path: &Path,
        contents: &str,
        limit: Option<Duration>,
    ) -> FormatResult<String> {
        match limit {
            Some(limit) => tokio::time::timeout(limit, self.format(path, contents))
                .await
                .map_err(|_| FormatError::Timeout(limit))?,
            None => self.format(path, contents).await,
        }
    }

    /// Reads the component's entry file, formats it, and writes the artifact.
    ///
    /// A missing entry file is an expected skip. Every other failure is
    /// logged and reported as [`ArtifactOutcome::Failed`]; nothing panics or
    /// propagates, so sibling artifacts are unaffected.
    pub async fn build_to_file(&self, component: &ProjectComponent<'_>) -> ArtifactOutcome {
        let slug = component.slug();
        let dir_name = component.dir_name();

        let exit_point = self.resolve_exit_point(dir_name);
        if exit_point.is_empty() {
            return ArtifactOutcome::Skipped {
                format: self.name.clone(),
                component: slug,
                reason: SkipReason::NoExitPoint,
            };
        }

        let entry_path = component.dir().join(self.resolve_entry_point(dir_name));
        let contents = match tokio::fs::read_to_string(&entry_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("{}: no entry file for {}", self.name, slug);
                return ArtifactOutcome::Skipped {
                    format: self.name.clone(),
                    component: slug,
                    reason: SkipReason::MissingEntry,
                };
            }
            Err(e) => return self.failed(component, slug, e.to_string()),
        };

        let limit = component.project().format_timeout();
        let output = match self.format_within(&entry_path, &contents, limit).await {
            Ok(output) => output,
            Err(e) => return self.failed(component, slug, e.to_string()),
        };

        let out_path = component.dist_dir().join(&exit_point);
        if let Err(e) = write_file(&out_path, &output).await {
            return self.failed(component, slug, e.to_string());
        }

        let relative = component.project().relative(&out_path);
        tracing::info!("{}: {}", self.name, relative.display());

        ArtifactOutcome::Written {
            format: self.name.clone(),
            component: slug,
            output: relative,
        }
    }

    fn failed(&self, component: &ProjectComponent<'_>, slug: String, message: String) -> ArtifactOutcome {
        let entry = self.resolve_entry_point(component.dir_name());
        tracing::error!("{}: {}/{}: {}", self.name, slug, entry, message);
        ArtifactOutcome::Failed {
            format: self.name.clone(),
            component: slug,
            message,
        }
    }
}

async fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_only_fallback() {
        let format = Format::builder("CSS").extension(".css").build().unwrap();
        for dir in ["button", "alert-banner", "x", "card_2"] {
            assert_eq!(format.resolve_entry_point(dir), format!("{}.css", dir));
            assert_eq!(format.resolve_exit_point(dir), format!("{}.css", dir));
        }
        assert_eq!(format.dist.extension, format.src.extension);
        assert_eq!(format.src.mime_type, "text/css");
    }

    #[test]
    fn test_extension_without_dot_is_normalized() {
        let format = Format::builder("CSS").extension("css").build().unwrap();
        assert_eq!(format.src.extension, ".css");
    }

    #[test]
    fn test_src_and_dist_extensions() {
        let format = Format::builder("CSS/Sass")
            .src_extension(".scss")
            .dist_extension(".css")
            .build()
            .unwrap();
        assert_eq!(format.resolve_entry_point("button"), "button.scss");
        assert_eq!(format.resolve_exit_point("button"), "button.css");
        assert_eq!(format.dist.mime_type, "text/css");
    }

    #[test]
    fn test_entry_point_rule_provides_extension() {
        let format = Format::builder("Sass")
            .entry_point_with(|dir| format!("{}.scss", dir))
            .dist_extension(".css")
            .build()
            .unwrap();
        assert_eq!(format.src.extension, ".scss");
        assert_eq!(format.resolve_exit_point("card"), "card.css");
    }

    #[test]
    fn test_explicit_exit_point_wins_over_extension() {
        let format = Format::builder("JS")
            .extension(".js")
            .exit_point_with(|dir| format!("{}.min.js", dir))
            .build()
            .unwrap();
        assert_eq!(format.resolve_exit_point("nav"), "nav.min.js");
        assert_eq!(format.resolve_entry_point("nav"), "nav.js");
    }

    #[test]
    fn test_suppressed_exit_point_is_empty() {
        let format = Format::builder("Demo")
            .extension(".html")
            .no_exit_point()
            .build()
            .unwrap();
        assert_eq!(format.resolve_exit_point("nav"), "");
    }

    #[test]
    fn test_missing_entry_point_and_extension_fails() {
        let err = Format::builder("Broken").build().unwrap_err();
        assert!(matches!(err, ConfigError::NoEntryPoint(_)));
    }

    #[test]
    fn test_missing_name_fails() {
        let err = Format::builder("").extension(".js").build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_id_derived_from_name() {
        let format = Format::builder("JS/esbuild").extension(".js").build().unwrap();
        assert_eq!(format.id, "jsesbuild");
    }

    #[test]
    fn test_default_include_follows_dist_extension() {
        let js = Format::builder("JS").extension(".js").build().unwrap();
        assert!(js.include.tag("a.js").contains("<script"));

        let sass = Format::builder("Sass")
            .src_extension(".scss")
            .dist_extension(".css")
            .build()
            .unwrap();
        assert!(sass.include.tag("a.scss").contains("stylesheet"));

        let md = Format::builder("Docs").extension(".md").build().unwrap();
        assert!(md.include.is_inert());
    }

    #[test]
    fn test_resolve_extension_priority() {
        assert_eq!(
            resolve_extension(Some(".css"), Some(".scss"), Some("a.less")),
            ExtensionSource::Explicit(".css".to_string())
        );
        assert_eq!(
            resolve_extension(None, Some(".scss"), Some("a.less")),
            ExtensionSource::DerivedFromSibling(".scss".to_string())
        );
        assert_eq!(
            resolve_extension(Some(""), None, Some("a.less")),
            ExtensionSource::DerivedFromEntryPoint(".less".to_string())
        );
        assert_eq!(resolve_extension(None, None, Some("Makefile")), ExtensionSource::Unresolved);
        assert_eq!(resolve_extension(None, None, None), ExtensionSource::Unresolved);
    }

    #[tokio::test]
    async fn test_fn_formatter() {
        let format = Format::builder("Upper")
            .extension(".txt")
            .formatter(FnFormatter(|_: &Path, contents: &str| Ok(contents.to_uppercase())))
            .build()
            .unwrap();
        let out = format.format(Path::new("a.txt"), "abc").await.unwrap();
        assert_eq!(out, "ABC");
    }

    struct Slow;

    #[async_trait]
    impl Formatter for Slow {
        async fn format(&self, _path: &Path, contents: &str) -> FormatResult<String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(contents.to_string())
        }
    }

    #[tokio::test]
    async fn test_format_within_times_out() {
        let format = Format::builder("Slow").extension(".txt").formatter(Slow).build().unwrap();
        let err = format
            .format_within(Path::new("a.txt"), "x", Some(Duration::from_millis(20)))
            .await
            .unwrap_err();
        assert!(matches!(err, FormatError::Timeout(_)));
    }
}
