// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! decal project configuration.
//!
//! Configuration is loaded from `decal.toml` at the project root. Without a
//! configuration file (or with one that declares neither collections nor
//! components) the project uses the `web-component` and `sass` presets.
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! name = "acme-ui"
//!
//! [dev]
//! port = 3000
//! host = "127.0.0.1"
//! assets_dir = "assets"
//!
//! [build]
//! timeout_ms = 30000
//!
//! [[collection]]
//! preset = "sass"
//!
//! [[collection]]
//! name = "Icons"
//! dir_name = "icons"
//!
//! [[collection.format]]
//! name = "SVG"
//! extension = ".svg"
//! command = "svgo --input={path} --output=-"
//! input = "path"
//!
//! [[collection.scaffold]]
//! name = "Standard Icon"
//! [collection.scaffold.files]
//! "{{ component.case.param }}.svg" = "<svg></svg>"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use decal::{
    Collection, CommandFormatter, CommandInput, Component, ConfigError, Format, Formatter,
    Include, Passthrough, Preset, Project, Scaffold, ScaffoldMode, TemplateFile,
    TemplateScaffolder, DEFAULT_PRESETS,
};
use serde::Deserialize;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "decal.toml";

/// Main configuration structure loaded from `decal.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Development server settings.
    #[serde(default)]
    pub dev: DevConfig,
    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Collections, in registration order.
    #[serde(default)]
    pub collection: Vec<CollectionConfig>,
    /// Stand-alone components directly under the project root.
    #[serde(default)]
    pub component: Vec<ComponentConfig>,
}

/// Project metadata configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Project name (default: the project directory's name).
    #[serde(default)]
    pub name: Option<String>,
}

/// Development server configuration.
#[derive(Debug, Deserialize)]
pub struct DevConfig {
    /// Server port (default: 3000).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Server host (default: "127.0.0.1").
    #[serde(default = "default_host")]
    pub host: String,
    /// Shared assets (fonts, images) served verbatim under `/assets`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
}

/// Build configuration.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Deadline for one formatter call in milliseconds; 0 disables it
    /// (default: 30000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// A `[[collection]]` table.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionConfig {
    /// Built-in preset to start from.
    #[serde(default)]
    pub preset: Option<String>,
    /// Human-readable name. Required without a preset.
    #[serde(default)]
    pub name: Option<String>,
    /// Directory under the project root.
    #[serde(default)]
    pub dir_name: Option<String>,
    /// Command line replacing the preset's formatter.
    #[serde(default)]
    pub formatter: Option<String>,
    /// Additional formats.
    #[serde(default)]
    pub format: Vec<FormatConfig>,
    /// Additional scaffolds.
    #[serde(default)]
    pub scaffold: Vec<ScaffoldConfig>,
    /// Includes added to every member's preview page.
    #[serde(default)]
    pub include: Vec<IncludeConfig>,
    /// Bundle component regenerated from every member.
    #[serde(default)]
    pub bundle: Option<BundleConfig>,
}

/// A `[[collection.format]]` or `[[component.format]]` table.
#[derive(Debug, Default, Deserialize)]
pub struct FormatConfig {
    /// Format name, used in logs.
    pub name: String,
    /// Id used in preview-page toggles.
    #[serde(default)]
    pub id: Option<String>,
    /// Extension shared by source and output.
    #[serde(default)]
    pub extension: Option<String>,
    /// Source extension.
    #[serde(default)]
    pub src_extension: Option<String>,
    /// Output extension.
    #[serde(default)]
    pub dist_extension: Option<String>,
    /// Output MIME type.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Entry-point file name; `{name}` is replaced by the component directory.
    #[serde(default)]
    pub entry_point: Option<String>,
    /// Exit-point file name; `{name}` is replaced by the component directory.
    #[serde(default)]
    pub exit_point: Option<String>,
    /// Serve only, never write a build artifact.
    #[serde(default)]
    pub serve_only: bool,
    /// External command; omitted means the source is copied unchanged.
    #[serde(default)]
    pub command: Option<String>,
    /// How the command receives the source.
    #[serde(default)]
    pub input: InputConfig,
}

/// How a format command receives its source.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputConfig {
    /// Contents piped on stdin.
    #[default]
    Stdin,
    /// Path substituted for `{path}`.
    Path,
}

/// A `[[collection.scaffold]]` or `[[component.scaffold]]` table.
#[derive(Debug, Deserialize)]
pub struct ScaffoldConfig {
    /// Scaffold name, used in logs.
    pub name: String,
    /// `new` or `refresh` (default: `new`).
    #[serde(default)]
    pub mode: ModeConfig,
    /// File-name template to content template.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

/// Scaffold mode as written in configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeConfig {
    /// Creates new component directories.
    #[default]
    New,
    /// Regenerates derived files.
    Refresh,
}

/// An `[[collection.include]]` or `[[component.include]]` table.
#[derive(Debug, Deserialize)]
pub struct IncludeConfig {
    /// Label in the toggle form.
    pub name: String,
    /// Query parameter id (default: derived from the name).
    #[serde(default)]
    pub id: Option<String>,
    /// HTML injected into `<head>` when enabled.
    #[serde(default)]
    pub tag: String,
    /// Makes this a scenario; `{content}` is replaced by the page body.
    #[serde(default)]
    pub wrap: Option<String>,
    /// Whether the include starts enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// A `[collection.bundle]` table.
#[derive(Debug, Deserialize)]
pub struct BundleConfig {
    /// Bundle name (default: "<collection> Bundle").
    #[serde(default)]
    pub name: Option<String>,
    /// Directory under `_dist/bundles` naming (default: "<collection dir>-bundle").
    #[serde(default)]
    pub dir_name: Option<String>,
    /// Refresh templates; `children` lists every member.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

/// A `[[component]]` table.
#[derive(Debug, Deserialize)]
pub struct ComponentConfig {
    /// Human-readable name.
    pub name: String,
    /// Directory under the project root (default: kebab-cased name).
    #[serde(default)]
    pub dir_name: Option<String>,
    /// Formats.
    #[serde(default)]
    pub format: Vec<FormatConfig>,
    /// Scaffolds.
    #[serde(default)]
    pub scaffold: Vec<ScaffoldConfig>,
    /// Includes.
    #[serde(default)]
    pub include: Vec<IncludeConfig>,
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Config {
    /// Loads configuration from `conf` (relative to `dir`) or from
    /// `decal.toml` in `dir`.
    ///
    /// A missing default file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, or if the
    /// file exists but cannot be parsed.
    pub fn load(dir: &Path, conf: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match conf {
            Some(conf) => dir.join(conf),
            None => {
                let path = dir.join(CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, dir.display());
                    return Ok(Config::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Cannot read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid {}", config_path.display()))
    }

    /// Parses configuration text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The per-call formatter deadline.
    pub fn format_timeout(&self) -> Option<Duration> {
        match self.build.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Registers the configured shape and validates it into a [`Project`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn to_project(&self, dir: &Path) -> Result<Project, ConfigError> {
        let mut builder = Project::builder(dir);
        if let Some(name) = &self.project.name {
            builder.name(name);
        }
        builder.format_timeout(self.format_timeout());

        if self.collection.is_empty() && self.component.is_empty() {
            for preset in DEFAULT_PRESETS {
                builder.add_plugin(preset)?;
            }
        }

        for collection in &self.collection {
            builder.apply_collection(collection.to_collection()?);
        }
        for component in &self.component {
            builder.create_component(component.to_component()?);
        }

        builder.build()
    }
}

impl CollectionConfig {
    /// Builds the collection this table describes.
    pub fn to_collection(&self) -> Result<Collection, ConfigError> {
        let mut collection = match &self.preset {
            Some(preset) => {
                let preset: Preset = preset.parse()?;
                let formatter = match &self.formatter {
                    Some(command) => Arc::new(CommandFormatter::parse(command)?) as Arc<dyn Formatter>,
                    None => preset.default_formatter(),
                };
                preset.collection_with(formatter)?
            }
            None => {
                let name = self.name.as_deref().ok_or(ConfigError::MissingField {
                    kind: "Collection",
                    field: "name",
                })?;
                Collection::new(name, Component::new(name))
            }
        };

        if let Some(name) = &self.name {
            collection.name = name.clone();
            collection.component.name = name.clone();
        }
        if let Some(dir_name) = &self.dir_name {
            collection.dir_name = dir_name.clone();
        }

        for format in &self.format {
            collection.component.formats.push(format.to_format()?);
        }
        for scaffold in &self.scaffold {
            collection.component.scaffolds.push(scaffold.to_scaffold()?);
        }
        for include in &self.include {
            collection.includes.push(include.to_include());
        }

        if let Some(bundle) = &self.bundle {
            let name = bundle
                .name
                .clone()
                .unwrap_or_else(|| format!("{} Bundle", collection.name));
            let dir_name = bundle
                .dir_name
                .clone()
                .unwrap_or_else(|| format!("{}-bundle", collection.dir_name));
            let mut component = Component::new(&name).with_dir_name(&dir_name);
            component.formats = collection.component.formats.clone();
            if !bundle.files.is_empty() {
                component.scaffolds.push(Scaffold::new(
                    &format!("{} Refresher", name),
                    ScaffoldMode::Refresh,
                    TemplateScaffolder::new(&name, template_files(&bundle.files))?,
                ));
            }
            collection.bundle = Some(component);
        }

        Ok(collection)
    }
}

impl ComponentConfig {
    /// Builds the stand-alone component this table describes.
    pub fn to_component(&self) -> Result<Component, ConfigError> {
        let mut component = Component::new(&self.name);
        if let Some(dir_name) = &self.dir_name {
            component = component.with_dir_name(dir_name);
        }
        for format in &self.format {
            component = component.with_format(format.to_format()?);
        }
        for scaffold in &self.scaffold {
            component = component.with_scaffold(scaffold.to_scaffold()?);
        }
        for include in &self.include {
            component = component.with_include(include.to_include());
        }
        Ok(component)
    }
}

impl FormatConfig {
    /// Builds the format this table describes.
    pub fn to_format(&self) -> Result<Format, ConfigError> {
        let mut builder = Format::builder(&self.name);

        if let Some(id) = &self.id {
            builder = builder.id(id);
        }
        if let Some(ext) = &self.extension {
            builder = builder.extension(ext);
        }
        if let Some(ext) = &self.src_extension {
            builder = builder.src_extension(ext);
        }
        if let Some(ext) = &self.dist_extension {
            builder = builder.dist_extension(ext);
        }
        if let Some(mime) = &self.mime_type {
            builder = builder.dist_mime_type(mime);
        }
        if let Some(pattern) = &self.entry_point {
            builder = match name_pattern(pattern) {
                Some(pattern) => builder.entry_point_with(move |dir| pattern.replace("{name}", dir)),
                None => builder.entry_point(pattern),
            };
        }
        if self.serve_only {
            builder = builder.no_exit_point();
        } else if let Some(pattern) = &self.exit_point {
            builder = match name_pattern(pattern) {
                Some(pattern) => builder.exit_point_with(move |dir| pattern.replace("{name}", dir)),
                None => builder.exit_point(pattern),
            };
        }

        let formatter: Arc<dyn Formatter> = match &self.command {
            Some(command) => {
                let input = match self.input {
                    InputConfig::Stdin => CommandInput::Stdin,
                    InputConfig::Path => CommandInput::Path,
                };
                Arc::new(CommandFormatter::parse(command)?.with_input(input))
            }
            None => Arc::new(Passthrough),
        };

        builder.shared_formatter(formatter).build()
    }
}

fn name_pattern(pattern: &str) -> Option<String> {
    pattern.contains("{name}").then(|| pattern.to_string())
}

impl ScaffoldConfig {
    /// Builds the scaffold this table describes.
    pub fn to_scaffold(&self) -> Result<Scaffold, ConfigError> {
        let mode = match self.mode {
            ModeConfig::New => ScaffoldMode::New,
            ModeConfig::Refresh => ScaffoldMode::Refresh,
        };
        let scaffolder = TemplateScaffolder::new(&self.name, template_files(&self.files))?;
        Ok(Scaffold::new(&self.name, mode, scaffolder))
    }
}

impl IncludeConfig {
    /// Builds the include this table describes.
    pub fn to_include(&self) -> Include {
        let id = self.id.clone().unwrap_or_default();
        let tag = self.tag.clone();

        let include = match &self.wrap {
            Some(wrap) => {
                let wrap = wrap.clone();
                Include::scenario(
                    &self.name,
                    &id,
                    move |_| tag.clone(),
                    move |content| wrap.replace("{content}", content),
                )
            }
            None => Include::fixed(&self.name, &id, &tag),
        };

        match self.enabled {
            Some(enabled) => include.with_default_enabled(enabled),
            None => include,
        }
    }
}

fn template_files(files: &BTreeMap<String, String>) -> Vec<TemplateFile> {
    files
        .iter()
        .map(|(path, contents)| TemplateFile {
            path: path.clone(),
            contents: contents.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal::IncludeMode;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.dev.port, 3000);
        assert_eq!(config.dev.host, "127.0.0.1");
        assert_eq!(config.format_timeout(), Some(Duration::from_secs(30)));

        let dir = tempfile::tempdir().unwrap();
        let project = config.to_project(dir.path()).unwrap();
        let dirs: Vec<_> = project.collections().iter().map(|c| c.dir_name()).collect();
        assert_eq!(dirs, vec!["web-components", "styles"]);
    }

    #[test]
    fn test_missing_default_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert!(config.collection.is_empty());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path(), Some(Path::new("other.toml"))).is_err());
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let config = Config::parse("[build]\ntimeout_ms = 0\n").unwrap();
        assert_eq!(config.format_timeout(), None);
    }

    #[test]
    fn test_preset_collection_with_overrides() {
        let config = Config::parse(
            r#"
[project]
name = "acme"

[[collection]]
preset = "css"
dir_name = "css"
formatter = "postcss --use autoprefixer"

[[collection.include]]
name = "Reset"
tag = '<link rel="stylesheet" href="/assets/reset.css" />'
"#,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let project = config.to_project(dir.path()).unwrap();
        assert_eq!(project.name(), "acme");
        let collection = project.collection("css").unwrap();
        assert_eq!(collection.name(), "Styles");
        assert_eq!(collection.collection().includes[0].id, "reset");
    }

    #[test]
    fn test_custom_collection() {
        let config = Config::parse(
            r#"
[[collection]]
name = "Icons"

[[collection.format]]
name = "SVG"
extension = ".svg"
exit_point = "{name}.min.svg"

[[collection.scaffold]]
name = "Standard Icon"
[collection.scaffold.files]
"{{ component.case.param }}.svg" = "<svg></svg>"

[[collection.include]]
name = "Dark"
tag = '<style>body { background: black; }</style>'
wrap = '<div class="dark">{content}</div>'

[collection.bundle]
[collection.bundle.files]
"{{ component.dir_name }}.svg" = "{% for child in children %}{{ child.slug }}\n{% endfor %}"
"#,
        )
        .unwrap();

        let collection = config.collection[0].to_collection().unwrap();
        assert_eq!(collection.dir_name, "icons");
        let format = &collection.component.formats[0];
        assert_eq!(format.resolve_entry_point("home"), "home.svg");
        assert_eq!(format.resolve_exit_point("home"), "home.min.svg");
        assert_eq!(collection.component.scaffolds[0].mode, ScaffoldMode::New);

        let include = &collection.includes[0];
        assert_eq!(include.mode, IncludeMode::Scenario);
        assert_eq!(include.template("<i></i>"), r#"<div class="dark"><i></i></div>"#);

        let bundle = collection.bundle.unwrap();
        assert_eq!(bundle.dir_name(), "icons-bundle");
        assert_eq!(bundle.scaffolds[0].mode, ScaffoldMode::Refresh);
    }

    #[test]
    fn test_collection_without_name_or_preset_is_rejected() {
        let config = Config::parse("[[collection]]\ndir_name = \"things\"\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            config.to_project(dir.path()),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let config = Config::parse("[[collection]]\npreset = \"less\"\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            config.to_project(dir.path()),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_stand_alone_component() {
        let config = Config::parse(
            r#"
[[component]]
name = "Style Guide"

[[component.format]]
name = "Markdown"
extension = ".md"
serve_only = true
"#,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let project = config.to_project(dir.path()).unwrap();
        assert!(project.collections().is_empty());
        let roots = project.root_components();
        assert_eq!(roots[0].dir_name(), "style-guide");
        assert_eq!(roots[0].formats()[0].resolve_exit_point("style-guide"), "");
    }
}
