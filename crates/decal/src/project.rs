// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The project root aggregate and the build pipeline.
//!
//! A [`Project`] is assembled once through [`ProjectBuilder`] and is
//! immutable afterwards. Component lists are recomputed from the file system
//! on every access.
//!
//! # Build
//!
//! [`Project::build`] runs in two joined phases:
//!
//! 1. every collection is rebundled, so bundle entry files reflect the
//!    current members
//! 2. every component × format pair is built concurrently; each pair is its
//!    own failure domain
//!
//! # Examples
//!
//! ```rust,ignore
//! use decal::{Collection, Component, Format, Project};
//!
//! let sass = Format::builder("CSS/Sass").src_extension(".scss").dist_extension(".css").build()?;
//! let styles = Collection::new("Styles", Component::new("Style").with_format(sass));
//!
//! let mut builder = Project::builder("./my-library");
//! builder.apply_collection(styles);
//! let project = builder.build()?;
//!
//! let report = project.build().await;
//! println!("{} artifacts written", report.written().count());
//! ```

use futures_util::future::join_all;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::collection::{Collection, DirectoryScan, MemberLister, ProjectCollection};
use crate::component::{Component, ProjectComponent};
use crate::error::{ConfigError, ConfigResult};
use crate::format::{ArtifactOutcome, Format};
use crate::scaffold::ScaffoldOutcome;

/// Build output root, relative to the project.
pub const DIST_DIR: &str = "_dist";
/// Bundle component sources, relative to the project.
pub const BUNDLES_DIR: &str = "bundles";
/// Scratch space, relative to the project.
pub const TEMP_DIR: &str = "_temp";
/// Directory names no collection or root component may use.
pub const RESERVED_DIRS: &[&str] = &[DIST_DIR, BUNDLES_DIR, TEMP_DIR];

/// Default bound on a single formatter call.
pub const DEFAULT_FORMAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Converts a path to a string with forward slashes.
pub fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    #[cfg(windows)]
    {
        use std::path::Component;
        path.as_ref()
            .components()
            .filter_map(|component| match component {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
    #[cfg(not(windows))]
    {
        path.as_ref().to_string_lossy().to_string()
    }
}

/// Registers collections and components on a project.
///
/// Presets implement this so a configuration can pull in a whole stack
/// (formats, scaffolds, bundle) with one call.
pub trait Plugin {
    /// Adds this plugin's shape to the builder.
    fn apply(&self, project: &mut ProjectBuilder) -> ConfigResult<()>;
}

/// Collects the static shape of a project before validation.
pub struct ProjectBuilder {
    root: PathBuf,
    name: Option<String>,
    collections: Vec<Collection>,
    components: Vec<Component>,
    format_timeout: Option<Duration>,
    lister: Arc<dyn MemberLister>,
}

impl ProjectBuilder {
    /// Sets the project name. Defaults to the root directory's name.
    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    /// Registers a collection.
    pub fn apply_collection(&mut self, collection: Collection) -> &mut Self {
        self.collections.push(collection);
        self
    }

    /// Registers a stand-alone component under the project root.
    pub fn create_component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    /// Lets a plugin register its collections and components.
    pub fn add_plugin(&mut self, plugin: &dyn Plugin) -> ConfigResult<&mut Self> {
        plugin.apply(self)?;
        Ok(self)
    }

    /// Bounds every formatter call. `None` disables the bound.
    pub fn format_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.format_timeout = timeout;
        self
    }

    /// Replaces the directory scan used to discover collection members.
    pub fn member_lister(&mut self, lister: Arc<dyn MemberLister>) -> &mut Self {
        self.lister = lister;
        self
    }

    /// The collections registered so far.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Validates the shape and builds the project.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for empty names, reserved or duplicate
    /// directories, or a root that cannot be made absolute.
    pub fn build(self) -> ConfigResult<Project> {
        let mut dirs = HashSet::new();

        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    kind: "Collection",
                    field: "name",
                });
            }
            validate_dir_name("Collection", &collection.dir_name)?;
            if !dirs.insert(collection.dir_name.clone()) {
                return Err(ConfigError::DuplicateCollection(collection.dir_name.clone()));
            }
            validate_component(&collection.component)?;
        }

        for component in &self.components {
            validate_component(component)?;
            let dir_name = component.dir_name();
            validate_dir_name("Component", &dir_name)?;
            if !dirs.insert(dir_name.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "component directory \"{}\" is already in use",
                    dir_name
                )));
            }
        }

        let mut bundles = HashSet::new();
        for bundle in self.collections.iter().filter_map(|c| c.bundle.as_ref()) {
            validate_component(bundle)?;
            let dir_name = bundle.dir_name();
            if dir_name.is_empty() || !bundles.insert(dir_name.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "bundle directory \"{}\" is empty or already in use",
                    dir_name
                )));
            }
        }

        let root = if self.root.is_absolute() {
            self.root
        } else {
            std::env::current_dir()
                .map_err(|e| ConfigError::Invalid(format!("cannot resolve project directory: {}", e)))?
                .join(self.root)
        };

        let name = self.name.unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "decal".to_string())
        });

        Ok(Project {
            name,
            root,
            collections: self.collections,
            components: self.components,
            format_timeout: self.format_timeout,
            lister: self.lister,
        })
    }
}

fn validate_component(component: &Component) -> ConfigResult<()> {
    if component.name.trim().is_empty() {
        return Err(ConfigError::MissingField {
            kind: "Component",
            field: "name",
        });
    }
    Ok(())
}

fn validate_dir_name(kind: &'static str, dir_name: &str) -> ConfigResult<()> {
    if dir_name.is_empty() {
        return Err(ConfigError::MissingField {
            kind,
            field: "dir_name",
        });
    }
    if RESERVED_DIRS.contains(&dir_name) {
        return Err(ConfigError::ReservedDirectory(dir_name.to_string()));
    }
    if dir_name.contains(['/', '\\']) || dir_name == "." || dir_name == ".." {
        return Err(ConfigError::Invalid(format!(
            "{} directory \"{}\" must be a single path segment",
            kind, dir_name
        )));
    }
    Ok(())
}

/// A validated project.
pub struct Project {
    name: String,
    root: PathBuf,
    collections: Vec<Collection>,
    components: Vec<Component>,
    format_timeout: Option<Duration>,
    lister: Arc<dyn MemberLister>,
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("root", &self.root)
            .field("collections", &self.collections.len())
            .field("components", &self.components.len())
            .field("format_timeout", &self.format_timeout)
            .finish()
    }
}

/// Every outcome of one build.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Refresh scaffold outcomes from the rebundle phase.
    pub rebundled: Vec<ScaffoldOutcome>,
    /// One outcome per component × format pair.
    pub outcomes: Vec<ArtifactOutcome>,
}

impl BuildReport {
    /// Artifacts that were written.
    pub fn written(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ArtifactOutcome::Written { .. }))
    }

    /// Artifacts that failed.
    pub fn failed(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ArtifactOutcome::Failed { .. }))
    }

    /// Returns true if no artifact failed.
    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

impl Project {
    /// Starts building a project rooted at `root`.
    pub fn builder(root: impl Into<PathBuf>) -> ProjectBuilder {
        ProjectBuilder {
            root: root.into(),
            name: None,
            collections: Vec::new(),
            components: Vec::new(),
            format_timeout: Some(DEFAULT_FORMAT_TIMEOUT),
            lister: Arc::new(DirectoryScan),
        }
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute project directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Build output root.
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(DIST_DIR)
    }

    /// Bundle component sources.
    pub fn bundles_dir(&self) -> PathBuf {
        self.root.join(BUNDLES_DIR)
    }

    /// Scratch space.
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join(TEMP_DIR)
    }

    /// `path` relative to the project root, or unchanged if outside it.
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    /// The formatter deadline.
    pub fn format_timeout(&self) -> Option<Duration> {
        self.format_timeout
    }

    /// The member discovery strategy.
    pub fn member_lister(&self) -> &dyn MemberLister {
        self.lister.as_ref()
    }

    /// Binds a collection template to this project.
    pub fn bind<'a>(&'a self, collection: &'a Collection) -> ProjectCollection<'a> {
        ProjectCollection::new(self, collection)
    }

    /// Every collection.
    pub fn collections(&self) -> Vec<ProjectCollection<'_>> {
        self.collections.iter().map(|c| self.bind(c)).collect()
    }

    /// The collection stored in `dir_name`.
    pub fn collection(&self, dir_name: &str) -> Option<ProjectCollection<'_>> {
        self.collections
            .iter()
            .find(|c| c.dir_name == dir_name)
            .map(|c| self.bind(c))
    }

    /// Stand-alone components under the project root.
    pub fn root_components(&self) -> Vec<ProjectComponent<'_>> {
        self.components
            .iter()
            .map(|c| ProjectComponent::root(self, c, c.dir_name()))
            .collect()
    }

    /// One bundle component per collection that defines one.
    pub fn bundle_components(&self) -> Vec<ProjectComponent<'_>> {
        self.collections().iter().filter_map(|c| c.bundle()).collect()
    }

    /// Collection members, root components, and bundle components.
    pub fn components(&self) -> Vec<ProjectComponent<'_>> {
        let mut components: Vec<_> = self
            .collections()
            .iter()
            .flat_map(|c| c.components())
            .collect();
        components.extend(self.root_components());
        components.extend(self.bundle_components());
        components
    }

    /// Every format of every template, collection members first.
    pub fn formats(&self) -> Vec<&Format> {
        self.collections
            .iter()
            .flat_map(|c| {
                let bundle = c.bundle.iter().flat_map(|b| b.formats.iter());
                c.component.formats.iter().chain(bundle)
            })
            .chain(self.components.iter().flat_map(|c| c.formats.iter()))
            .collect()
    }

    /// Runs every collection's refresh scaffolds.
    pub async fn rebundle(&self) -> Vec<ScaffoldOutcome> {
        let collections = self.collections();
        join_all(collections.iter().map(|c| c.rebundle()))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Rebundles, then builds every component × format pair.
    ///
    /// Never fails as a whole: per-artifact failures are logged and reported
    /// in the returned [`BuildReport`].
    pub async fn build(&self) -> BuildReport {
        let rebundled = self.rebundle().await;

        let components = self.components();
        let builds = components
            .iter()
            .flat_map(|component| component.formats().iter().map(move |f| f.build_to_file(component)));
        let outcomes = join_all(builds).await;

        tracing::info!(
            "Built {} artifacts for {} components",
            outcomes
                .iter()
                .filter(|o| matches!(o, ArtifactOutcome::Written { .. }))
                .count(),
            components.len()
        );

        BuildReport {
            rebundled,
            outcomes,
        }
    }
}
