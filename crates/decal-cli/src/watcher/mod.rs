// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! File system watching for live reload.
//!
//! This module provides `FileWatcher` for monitoring a project directory and
//! reporting debounced batches of changes.
//!
//! # Features
//!
//! - Debounced file change events (750ms)
//! - Build output, scratch files, `node_modules` and `.git` are ignored
//! - Structural changes (created, removed, renamed) are flagged so callers
//!   can rebundle the collections whose membership changed

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use decal::project::{DIST_DIR, TEMP_DIR};
use decal::Project;
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, RecommendedCache};

/// Directories whose contents never trigger a reload.
pub const IGNORED_DIRS: &[&str] = &[DIST_DIR, TEMP_DIR, "node_modules", ".git"];

/// One changed path in a debounced batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Path relative to the watched root.
    pub path: PathBuf,
    /// The path was created, removed, or renamed.
    pub structural: bool,
}

/// Watches a project directory for changes.
pub struct FileWatcher {
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl FileWatcher {
    /// Starts watching `root` recursively.
    ///
    /// `on_change` runs on the watcher's own thread once per debounced batch
    /// that contains at least one relevant path.
    pub fn new<F>(root: &Path, on_change: F) -> anyhow::Result<Self>
    where
        F: Fn(Vec<FileChange>) + Send + 'static,
    {
        let base_path = root.to_path_buf();

        let mut debouncer = new_debouncer(
            Duration::from_millis(750),
            None,
            move |result: DebounceEventResult| match result {
                Ok(events) => {
                    let mut changes: Vec<FileChange> = Vec::new();
                    for event in &events {
                        let structural = matches!(
                            event.kind,
                            EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
                        );
                        for path in &event.paths {
                            let path = path.strip_prefix(&base_path).unwrap_or(path).to_path_buf();
                            if is_ignored(&path) {
                                continue;
                            }
                            match changes.iter_mut().find(|c| c.path == path) {
                                Some(existing) => existing.structural |= structural,
                                None => changes.push(FileChange { path, structural }),
                            }
                        }
                    }

                    if !changes.is_empty() {
                        on_change(changes);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        tracing::warn!("Watch error: {}", error);
                    }
                }
            },
        )?;

        debouncer.watch(root, RecursiveMode::Recursive)?;
        tracing::debug!("Watching {}", root.display());

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Whether a relative path lies inside an ignored directory.
pub fn is_ignored(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => IGNORED_DIRS.iter().any(|ignored| name == *ignored),
        _ => false,
    })
}

/// Directory names of the collections whose member set a batch may have
/// changed: a direct child of the collection directory was created,
/// removed, or renamed.
pub fn affected_collections(project: &Project, changes: &[FileChange]) -> Vec<String> {
    let mut affected: Vec<String> = Vec::new();

    for change in changes.iter().filter(|c| c.structural) {
        let parts: Vec<_> = change.path.components().collect();
        let [Component::Normal(parent), Component::Normal(_)] = parts.as_slice() else {
            continue;
        };
        let Some(parent) = parent.to_str() else {
            continue;
        };
        if project.collection(parent).is_some() && !affected.iter().any(|a| a == parent) {
            affected.push(parent.to_string());
        }
    }

    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use decal::{Collection, Component as Template};

    fn change(path: &str, structural: bool) -> FileChange {
        FileChange {
            path: PathBuf::from(path),
            structural,
        }
    }

    fn project() -> Project {
        let mut builder = Project::builder("/tmp/decal-watch");
        builder.apply_collection(Collection::new("Styles", Template::new("Styles")));
        builder.apply_collection(Collection::new("Icons", Template::new("Icons")));
        builder.build().unwrap()
    }

    #[test]
    fn test_ignored_directories() {
        assert!(is_ignored(Path::new("_dist/styles/button/button.css")));
        assert!(is_ignored(Path::new("styles/button/node_modules/x.js")));
        assert!(is_ignored(Path::new(".git/HEAD")));
        assert!(!is_ignored(Path::new("styles/button/button.scss")));
    }

    #[test]
    fn test_new_member_directory_affects_its_collection() {
        let project = project();
        let changes = vec![
            change("styles/alert", true),
            change("styles/alert/alert.scss", true),
            change("styles/button", true),
        ];
        assert_eq!(affected_collections(&project, &changes), vec!["styles".to_string()]);
    }

    #[test]
    fn test_edits_do_not_affect_membership() {
        let project = project();
        let changes = vec![
            change("styles/button", false),
            change("styles/button/button.scss", true),
            change("docs/readme", true),
        ];
        assert!(affected_collections(&project, &changes).is_empty());
    }
}
