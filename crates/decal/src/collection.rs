// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Collections of components sharing one template.
//!
//! Membership is never stored. Every call to
//! [`ProjectCollection::components`] asks the project's [`MemberLister`] for
//! the current subdirectories, so edits made outside the process show up on
//! the next request or build.

use futures_util::future::join_all;
use std::fs;
use std::path::{Path, PathBuf};

use crate::component::{Component, ProjectComponent};
use crate::include::Include;
use crate::project::Project;
use crate::scaffold::{ScaffoldMode, ScaffoldOutcome};

/// Directory names that are never collection members.
pub const IGNORED_MEMBER_DIRS: &[&str] = &["node_modules"];

/// Lists the member directory names of a collection directory.
///
/// Implementations must return names sorted and free of duplicates. A missing
/// directory yields an empty list.
pub trait MemberLister: Send + Sync {
    /// Lists member directory names under `dir`.
    fn list(&self, dir: &Path) -> Vec<String>;
}

/// Lists immediate subdirectories on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryScan;

impl MemberLister for DirectoryScan {
    fn list(&self, dir: &Path) -> Vec<String> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| !IGNORED_MEMBER_DIRS.contains(&name.as_str()) && !name.starts_with('.'))
            .collect();

        names.sort();
        names
    }
}

/// A collection template.
#[derive(Debug, Clone)]
pub struct Collection {
    /// Human-readable name.
    pub name: String,
    /// Directory name under the project root, unique per project.
    pub dir_name: String,
    /// The template every member shares.
    pub component: Component,
    /// Page contributions for every member.
    pub includes: Vec<Include>,
    /// Optional bundle template.
    pub bundle: Option<Component>,
}

impl Collection {
    /// Creates a collection. The directory name defaults to the lowercased
    /// name with spaces replaced by dashes.
    pub fn new(name: &str, component: Component) -> Self {
        Self {
            name: name.to_string(),
            dir_name: name.to_lowercase().replace(' ', "-"),
            component,
            includes: Vec::new(),
            bundle: None,
        }
    }

    /// Sets the directory name.
    pub fn with_dir_name(mut self, dir_name: &str) -> Self {
        self.dir_name = dir_name.to_string();
        self
    }

    /// Adds an include.
    pub fn with_include(mut self, include: Include) -> Self {
        self.includes.push(include);
        self
    }

    /// Sets the bundle template.
    pub fn with_bundle(mut self, bundle: Component) -> Self {
        self.bundle = Some(bundle);
        self
    }
}

/// A collection bound to a project.
#[derive(Debug, Clone, Copy)]
pub struct ProjectCollection<'a> {
    project: &'a Project,
    collection: &'a Collection,
}

impl<'a> ProjectCollection<'a> {
    /// Binds a collection to a project.
    pub fn new(project: &'a Project, collection: &'a Collection) -> Self {
        Self {
            project,
            collection,
        }
    }

    /// The collection template.
    pub fn collection(&self) -> &'a Collection {
        self.collection
    }

    /// The owning project.
    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// Human-readable name.
    pub fn name(&self) -> &'a str {
        &self.collection.name
    }

    /// Directory name.
    pub fn dir_name(&self) -> &'a str {
        &self.collection.dir_name
    }

    /// The absolute collection directory.
    pub fn dir(&self) -> PathBuf {
        self.project.root().join(&self.collection.dir_name)
    }

    /// The current members, freshly listed.
    pub fn components(&self) -> Vec<ProjectComponent<'a>> {
        self.project
            .member_lister()
            .list(&self.dir())
            .into_iter()
            .map(|dir_name| ProjectComponent::member(self.project, self.collection, dir_name))
            .collect()
    }

    /// A member binding for `dir_name`, whether or not it exists on disk.
    pub fn component(&self, dir_name: &str) -> ProjectComponent<'a> {
        ProjectComponent::member(self.project, self.collection, dir_name)
    }

    /// The bundle component, if the collection defines one.
    pub fn bundle(&self) -> Option<ProjectComponent<'a>> {
        self.collection.bundle.as_ref().map(|template| {
            ProjectComponent::bundle(self.project, self.collection, template, template.dir_name())
        })
    }

    /// Runs every refresh scaffold of the bundle component.
    ///
    /// Scaffolds run concurrently; each failure is logged by the scaffold and
    /// does not stop the others.
    pub async fn rebundle(&self) -> Vec<ScaffoldOutcome> {
        let Some(bundle) = self.bundle() else {
            return Vec::new();
        };

        let refreshes = bundle
            .scaffolds()
            .iter()
            .filter(|scaffold| scaffold.mode == ScaffoldMode::Refresh)
            .map(|scaffold| scaffold.refresh(&bundle));

        let outcomes = join_all(refreshes).await;
        tracing::debug!("Rebundled {} ({} scaffolds)", self.collection.name, outcomes.len());
        outcomes
    }
}
