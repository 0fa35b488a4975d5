// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Recipes that create or regenerate component files.
//!
//! A [`Scaffold`] runs in one of two modes:
//!
//! - [`ScaffoldMode::New`]: writes a component's starting files once. An
//!   existing directory is never touched.
//! - [`ScaffoldMode::Refresh`]: regenerates derived files (bundle entry
//!   points) unconditionally and must be safe to re-run.
//!
//! Failures are logged with the scaffold name and component slug and turned
//! into a [`ScaffoldOutcome`]; they never propagate to the host.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::casing::NameCasing;
use crate::collection::ProjectCollection;
use crate::component::ProjectComponent;
use crate::error::ScaffoldResult;

/// When a scaffold runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaffoldMode {
    /// Once, when a component is created.
    #[default]
    New,
    /// Every time a collection is rebundled.
    Refresh,
}

impl fmt::Display for ScaffoldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaffoldMode::New => write!(f, "new"),
            ScaffoldMode::Refresh => write!(f, "refresh"),
        }
    }
}

/// Writes files for one component.
#[async_trait]
pub trait Scaffolder: Send + Sync {
    /// Materializes files into `component.dir()`.
    async fn scaffold(&self, component: &ProjectComponent<'_>) -> ScaffoldResult<()>;
}

/// Maps a human-readable name to a directory name.
pub type DirNamer = Arc<dyn Fn(&NameCasing) -> String + Send + Sync>;

/// Result of one scaffold invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldOutcome {
    /// A new component directory was written.
    Created,
    /// Derived files were regenerated.
    Refreshed,
    /// The directory already existed; nothing was written.
    AlreadyExists,
    /// The operation does not match the scaffold's mode.
    Misuse,
    /// The scaffolder failed.
    Failed(String),
}

/// A named scaffolding recipe.
#[derive(Clone)]
pub struct Scaffold {
    /// Human-readable name, used in logs.
    pub name: String,
    /// New or refresh.
    pub mode: ScaffoldMode,
    dir_namer: DirNamer,
    scaffolder: Arc<dyn Scaffolder>,
}

impl fmt::Debug for Scaffold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scaffold")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish()
    }
}

impl Scaffold {
    /// Creates a scaffold. Directory names default to kebab case.
    pub fn new<S: Scaffolder + 'static>(name: &str, mode: ScaffoldMode, scaffolder: S) -> Self {
        Self::shared(name, mode, Arc::new(scaffolder))
    }

    /// Creates a scaffold over a shared scaffolder.
    pub fn shared(name: &str, mode: ScaffoldMode, scaffolder: Arc<dyn Scaffolder>) -> Self {
        Self {
            name: name.to_string(),
            mode,
            dir_namer: Arc::new(|case: &NameCasing| case.param.clone()),
            scaffolder,
        }
    }

    /// Replaces the directory-naming rule.
    pub fn with_dir_namer<F>(mut self, f: F) -> Self
    where
        F: Fn(&NameCasing) -> String + Send + Sync + 'static,
    {
        self.dir_namer = Arc::new(f);
        self
    }

    /// The directory name for a human-readable component name.
    pub fn dir_name(&self, human_name: &str) -> String {
        (self.dir_namer)(&NameCasing::new(human_name))
    }

    /// Creates a component's files if its directory does not exist yet.
    ///
    /// `prompted` marks a user-initiated action: an existing directory is
    /// then reported with a warning, and success prints follow-up guidance.
    pub async fn create(&self, component: &ProjectComponent<'_>, prompted: bool) -> ScaffoldOutcome {
        if self.mode != ScaffoldMode::New {
            return self.misuse("create", component);
        }

        let slug = component.slug();
        let dir = component.dir();

        if tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            if prompted {
                tracing::warn!("{}: {} already exists, nothing to create", self.name, slug);
            } else {
                tracing::debug!("{}: {} already exists", self.name, slug);
            }
            return ScaffoldOutcome::AlreadyExists;
        }

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            return self.failed(&slug, e.to_string());
        }

        match self.scaffolder.scaffold(component).await {
            Ok(()) => {
                tracing::info!("{}: created {}", self.name, slug);
                if prompted {
                    tracing::info!("Preview it at {}/", component.route());
                }
                ScaffoldOutcome::Created
            }
            Err(e) => self.failed(&slug, e.to_string()),
        }
    }

    /// Regenerates derived files unconditionally.
    pub async fn refresh(&self, component: &ProjectComponent<'_>) -> ScaffoldOutcome {
        if self.mode != ScaffoldMode::Refresh {
            return self.misuse("refresh", component);
        }

        let slug = component.slug();
        if let Err(e) = tokio::fs::create_dir_all(component.dir()).await {
            return self.failed(&slug, e.to_string());
        }

        match self.scaffolder.scaffold(component).await {
            Ok(()) => {
                tracing::debug!("{}: refreshed {}", self.name, slug);
                ScaffoldOutcome::Refreshed
            }
            Err(e) => self.failed(&slug, e.to_string()),
        }
    }

    /// Creates a new member of `collection` from a human-readable name, then
    /// rebundles the collection once.
    pub async fn create_for_collection(
        &self,
        human_name: &str,
        collection: &ProjectCollection<'_>,
    ) -> ScaffoldOutcome {
        let dir_name = self.dir_name(human_name);
        let component = collection.component(&dir_name);

        let outcome = self.create(&component, true).await;
        collection.rebundle().await;
        outcome
    }

    fn misuse(&self, operation: &str, component: &ProjectComponent<'_>) -> ScaffoldOutcome {
        tracing::warn!(
            "{}: cannot {} {} with a {} scaffold",
            self.name,
            operation,
            component.slug(),
            self.mode
        );
        ScaffoldOutcome::Misuse
    }

    fn failed(&self, slug: &str, message: String) -> ScaffoldOutcome {
        tracing::error!("{}: {}: {}", self.name, slug, message);
        ScaffoldOutcome::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl Scaffolder for Noop {
        async fn scaffold(&self, _component: &ProjectComponent<'_>) -> ScaffoldResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_dir_namer_is_kebab() {
        let scaffold = Scaffold::new("Standard", ScaffoldMode::New, Noop);
        assert_eq!(scaffold.dir_name("Alert Banner"), "alert-banner");
    }

    #[test]
    fn test_custom_dir_namer() {
        let scaffold = Scaffold::new("Standard", ScaffoldMode::New, Noop)
            .with_dir_namer(|case| case.snake.clone());
        assert_eq!(scaffold.dir_name("Alert Banner"), "alert_banner");
    }
}
