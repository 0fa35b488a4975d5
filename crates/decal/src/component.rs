// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Component templates and their project bindings.
//!
//! A [`Component`] is static configuration: the formats, scaffolds and
//! includes every component of one kind shares. A [`ProjectComponent`] pairs
//! a template with its owning project, optional collection, and directory
//! name. Bindings are cheap borrowing values created fresh on every listing;
//! every path they expose is recomputed from identity on each call.

use std::path::PathBuf;

use crate::casing::NameCasing;
use crate::collection::Collection;
use crate::format::Format;
use crate::include::Include;
use crate::project::{path_to_string, Project};
use crate::scaffold::Scaffold;

/// A component template.
#[derive(Debug, Clone)]
pub struct Component {
    /// Human-readable name.
    pub name: String,
    dir_name: Option<String>,
    /// File-type pipelines.
    pub formats: Vec<Format>,
    /// Recipes that create or refresh files.
    pub scaffolds: Vec<Scaffold>,
    /// Page contributions beyond the formats' own includes.
    pub includes: Vec<Include>,
}

impl Component {
    /// Creates an empty template.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dir_name: None,
            formats: Vec::new(),
            scaffolds: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Sets the directory name used when this template is a bundle or a
    /// stand-alone root component.
    pub fn with_dir_name(mut self, dir_name: &str) -> Self {
        self.dir_name = Some(dir_name.to_string());
        self
    }

    /// Adds a format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.formats.push(format);
        self
    }

    /// Adds a scaffold.
    pub fn with_scaffold(mut self, scaffold: Scaffold) -> Self {
        self.scaffolds.push(scaffold);
        self
    }

    /// Adds an include.
    pub fn with_include(mut self, include: Include) -> Self {
        self.includes.push(include);
        self
    }

    /// The directory name: explicit, or the kebab-cased name.
    pub fn dir_name(&self) -> String {
        match &self.dir_name {
            Some(dir_name) if !dir_name.is_empty() => dir_name.clone(),
            _ => NameCasing::new(&self.name).param,
        }
    }
}

/// A component template bound to a project location.
#[derive(Debug, Clone)]
pub struct ProjectComponent<'a> {
    project: &'a Project,
    collection: Option<&'a Collection>,
    template: &'a Component,
    dir_name: String,
    is_bundle: bool,
}

impl<'a> ProjectComponent<'a> {
    /// A member of a collection.
    pub fn member(project: &'a Project, collection: &'a Collection, dir_name: impl Into<String>) -> Self {
        Self {
            project,
            collection: Some(collection),
            template: &collection.component,
            dir_name: dir_name.into(),
            is_bundle: false,
        }
    }

    /// A stand-alone component directly under the project root.
    pub fn root(project: &'a Project, template: &'a Component, dir_name: impl Into<String>) -> Self {
        Self {
            project,
            collection: None,
            template,
            dir_name: dir_name.into(),
            is_bundle: false,
        }
    }

    /// The synthetic bundle component of a collection.
    pub fn bundle(
        project: &'a Project,
        collection: &'a Collection,
        template: &'a Component,
        dir_name: impl Into<String>,
    ) -> Self {
        Self {
            project,
            collection: Some(collection),
            template,
            dir_name: dir_name.into(),
            is_bundle: true,
        }
    }

    /// The owning project.
    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// The owning collection, if any.
    pub fn collection(&self) -> Option<&'a Collection> {
        self.collection
    }

    /// The shared template.
    pub fn template(&self) -> &'a Component {
        self.template
    }

    /// The directory name.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// Whether this is a collection's bundle component.
    pub fn is_bundle(&self) -> bool {
        self.is_bundle
    }

    /// The template's formats.
    pub fn formats(&self) -> &'a [Format] {
        &self.template.formats
    }

    /// The template's scaffolds.
    pub fn scaffolds(&self) -> &'a [Scaffold] {
        &self.template.scaffolds
    }

    /// The template's includes.
    pub fn includes(&self) -> &'a [Include] {
        &self.template.includes
    }

    /// Casings of the directory name, for scaffolds.
    pub fn case(&self) -> NameCasing {
        NameCasing::new(&self.dir_name)
    }

    /// The absolute component directory.
    pub fn dir(&self) -> PathBuf {
        if self.is_bundle {
            self.project.bundles_dir().join(&self.dir_name)
        } else if let Some(collection) = self.collection {
            self.project.root().join(&collection.dir_name).join(&self.dir_name)
        } else {
            self.project.root().join(&self.dir_name)
        }
    }

    /// The directory relative to the project root, with `/` separators.
    pub fn slug(&self) -> String {
        path_to_string(self.project.relative(&self.dir()))
    }

    /// The preview URL path.
    pub fn route(&self) -> String {
        format!("/{}", self.slug())
    }

    /// Where this component's artifacts are written.
    ///
    /// Bundles write straight into `_dist/bundles`; everything else mirrors
    /// its slug under `_dist`.
    pub fn dist_dir(&self) -> PathBuf {
        if self.is_bundle {
            self.project.dist_dir().join("bundles")
        } else {
            self.project.dist_dir().join(self.slug())
        }
    }

    /// Other members of the same collection.
    pub fn siblings(&self) -> Vec<ProjectComponent<'a>> {
        match self.collection {
            Some(collection) if !self.is_bundle => self
                .project
                .bind(collection)
                .components()
                .into_iter()
                .filter(|c| c.dir_name != self.dir_name)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Every member of the owning collection, for bundles only.
    pub fn children(&self) -> Vec<ProjectComponent<'a>> {
        match self.collection {
            Some(collection) if self.is_bundle => self.project.bind(collection).components(),
            _ => Vec::new(),
        }
    }

    /// Includes contributed by the owning collection.
    pub fn collection_includes(&self) -> &'a [Include] {
        self.collection.map(|c| c.includes.as_slice()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_dir_name_defaults_to_kebab() {
        assert_eq!(Component::new("Sass Bundle").dir_name(), "sass-bundle");
        assert_eq!(
            Component::new("Sass Bundle").with_dir_name("styles-bundle").dir_name(),
            "styles-bundle"
        );
    }
}
