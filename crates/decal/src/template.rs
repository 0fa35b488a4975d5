// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Scaffolding from text templates.
//!
//! A [`TemplateScaffolder`] holds pairs of (file-name template, content
//! template) and renders both with minijinja into the component directory.
//!
//! Templates see this context:
//!
//! ```text
//! component.dir_name   component.slug   component.route   component.case.*
//! children[].dir_name  children[].slug  children[].case.*
//! project.name       project.prefix
//! ```

use async_trait::async_trait;
use minijinja::{context, Environment};
use serde::Serialize;

use crate::casing::NameCasing;
use crate::component::ProjectComponent;
use crate::error::{ConfigError, ConfigResult, ScaffoldError, ScaffoldResult};
use crate::scaffold::Scaffolder;

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// File path relative to the component directory, as a template.
    pub path: String,
    /// File contents, as a template.
    pub contents: String,
}

/// Renders a fixed set of templates into a component directory.
#[derive(Debug, Clone)]
pub struct TemplateScaffolder {
    name: String,
    files: Vec<TemplateFile>,
}

#[derive(Serialize)]
struct ComponentContext {
    dir_name: String,
    slug: String,
    route: String,
    case: NameCasing,
}

impl ComponentContext {
    fn new(component: &ProjectComponent<'_>) -> Self {
        Self {
            dir_name: component.dir_name().to_string(),
            slug: component.slug(),
            route: component.route(),
            case: component.case(),
        }
    }
}

#[derive(Serialize)]
struct ProjectContext {
    name: String,
    prefix: String,
}

impl TemplateScaffolder {
    /// Creates a scaffolder, checking every template compiles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Template`] naming the first template that fails.
    pub fn new(name: &str, files: Vec<TemplateFile>) -> ConfigResult<Self> {
        {
            let env = Environment::new();
            for file in &files {
                for source in [file.path.as_str(), file.contents.as_str()] {
                    env.template_from_str(source).map_err(|e| ConfigError::Template {
                        name: name.to_string(),
                        message: e.to_string(),
                    })?;
                }
            }
        }
        Ok(Self {
            name: name.to_string(),
            files,
        })
    }

    /// Convenience constructor over `(path, contents)` pairs.
    pub fn from_pairs(name: &str, pairs: &[(&str, &str)]) -> ConfigResult<Self> {
        let files = pairs
            .iter()
            .map(|(path, contents)| TemplateFile {
                path: path.to_string(),
                contents: contents.to_string(),
            })
            .collect();
        Self::new(name, files)
    }

    /// The templates this scaffolder renders.
    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    fn render(&self, component: &ProjectComponent<'_>) -> ScaffoldResult<Vec<(String, String)>> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);

        let children: Vec<ComponentContext> =
            component.children().iter().map(ComponentContext::new).collect();
        let ctx = context! {
            component => ComponentContext::new(component),
            children => children,
            project => ProjectContext {
                name: component.project().name().to_string(),
                prefix: NameCasing::new(component.project().name()).param,
            },
        };

        self.files
            .iter()
            .map(|file| -> ScaffoldResult<(String, String)> {
                let path = env.render_str(&file.path, &ctx)?;
                let contents = env.render_str(&file.contents, &ctx)?;
                Ok((path, contents))
            })
            .collect()
    }
}

#[async_trait]
impl Scaffolder for TemplateScaffolder {
    async fn scaffold(&self, component: &ProjectComponent<'_>) -> ScaffoldResult<()> {
        let dir = component.dir();
        for (path, contents) in self.render(component)? {
            let path = path.trim();
            if path.is_empty() || path.split('/').any(|part| part == "..") {
                return Err(ScaffoldError::Message(format!(
                    "{}: invalid file name \"{}\"",
                    self.name, path
                )));
            }
            let target = dir.join(path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&target, contents).await?;
        }
        Ok(())
    }
}
