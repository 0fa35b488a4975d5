// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Serve-time request resolution.
//!
//! [`resolve`] maps a URL path and query to a [`Resolution`]: a redirect, the
//! digest, a composed preview page, a formatted asset, or a file for the
//! static server. It never fails; read errors become 404 and formatter
//! errors 500, each logged with the format name and relative path.
//!
//! # Resolution order
//!
//! 1. `/` and `/index.html` render the digest
//! 2. paths ending in `/`, or equal to a component route, redirect to
//!    `index.html` beneath them
//! 3. `.html` (but not `.raw.html`) becomes a composed preview page
//! 4. a request for a component's exit point, or for any path ending in a
//!    format's source extension, is formatted on the fly (longest extension
//!    first, the owning component's formats before all others)
//! 5. everything else goes to the static file server

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::component::ProjectComponent;
use crate::format::Format;
use crate::page::{compose, not_found_content, render_digest, render_page, PageParts};
use crate::project::Project;

/// Decoded query parameters, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Builds a query from decoded key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What to answer for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect (302) to `location`.
    Redirect {
        /// Target URL path.
        location: String,
    },
    /// The digest page.
    Digest {
        /// Rendered HTML.
        html: String,
    },
    /// A composed preview page.
    Page {
        /// HTTP status; 404 when the page file was missing.
        status: u16,
        /// Rendered HTML.
        html: String,
    },
    /// A formatted asset.
    Asset {
        /// HTTP status.
        status: u16,
        /// Content type.
        mime_type: String,
        /// Response body.
        body: String,
    },
    /// Hand the request to the static file server.
    Static {
        /// The file-system path the request maps to.
        path: PathBuf,
    },
    /// The path cannot name anything inside the project.
    NotFound,
}

/// Resolves one request against the project's current file-system state.
pub async fn resolve(project: &Project, path: &str, query: &Query) -> Resolution {
    if path == "/" || path == "/index.html" {
        return Resolution::Digest {
            html: render_digest(project),
        };
    }

    if path.split('/').any(|segment| segment == ".." || segment.contains('\\')) {
        return Resolution::NotFound;
    }

    let components = project.components();

    if path.ends_with('/') {
        return Resolution::Redirect {
            location: format!("{}index.html", path),
        };
    }
    if components.iter().any(|c| c.route() == path) {
        return Resolution::Redirect {
            location: format!("{}/index.html", path),
        };
    }

    let file_path = project.root().join(path.trim_start_matches('/'));
    let owner = owning_component(&components, path);

    if path.ends_with(".html") && !path.ends_with(".raw.html") {
        return page(project, owner, &file_path, query).await;
    }

    match asset_source(project, owner, path, &file_path) {
        Some((format, source)) => asset(project, format, &source).await,
        None => Resolution::Static { path: file_path },
    }
}

/// The component whose route is the longest segment-aligned prefix of `path`.
pub fn owning_component<'c, 'a>(
    components: &'c [ProjectComponent<'a>],
    path: &str,
) -> Option<&'c ProjectComponent<'a>> {
    components
        .iter()
        .filter(|c| {
            let route = c.route();
            path == route || path.starts_with(&format!("{}/", route))
        })
        .max_by_key(|c| c.route().len())
}

async fn page(
    project: &Project,
    owner: Option<&ProjectComponent<'_>>,
    file_path: &Path,
    query: &Query,
) -> Resolution {
    let (status, content) = match tokio::fs::read_to_string(file_path).await {
        Ok(content) => (200, content),
        Err(e) => {
            let relative = project.relative(file_path);
            tracing::warn!("Not found: {} ({})", relative.display(), e);
            (404, not_found_content(&relative))
        }
    };

    let parts = match owner {
        Some(component) => compose(component, content, query).await,
        None => PageParts {
            content,
            ..PageParts::default()
        },
    };

    Resolution::Page {
        status,
        html: render_page(&parts),
    }
}

/// Picks the format and source file that serve `path`, if any.
fn asset_source<'p>(
    project: &'p Project,
    owner: Option<&ProjectComponent<'p>>,
    path: &str,
    file_path: &Path,
) -> Option<(&'p Format, PathBuf)> {
    if let Some(component) = owner {
        let rel = path
            .strip_prefix(&component.route())
            .unwrap_or(path)
            .trim_start_matches('/');
        let dir_name = component.dir_name();

        let mut formats: Vec<&'p Format> = component.formats().iter().collect();
        formats.sort_by_key(|f| std::cmp::Reverse(f.src.extension.len()));

        for format in formats.iter().copied() {
            let exit_point = format.resolve_exit_point(dir_name);
            if !exit_point.is_empty() && rel == exit_point {
                let entry = component.dir().join(format.resolve_entry_point(dir_name));
                return Some((format, entry));
            }
        }
        for format in formats.iter().copied() {
            if claims(format, path) {
                return Some((format, file_path.to_path_buf()));
            }
        }
    }

    let mut formats = project.formats();
    formats.sort_by_key(|f| std::cmp::Reverse(f.src.extension.len()));
    formats
        .into_iter()
        .find(|format| claims(format, path))
        .map(|format| (format, file_path.to_path_buf()))
}

fn claims(format: &Format, path: &str) -> bool {
    !format.src.extension.is_empty() && path.ends_with(&format.src.extension)
}

async fn asset(project: &Project, format: &Format, source: &Path) -> Resolution {
    let relative = project.relative(source);

    let contents = match tokio::fs::read_to_string(source).await {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                tracing::warn!("{}: not found: {}", format.name, relative.display());
            } else {
                tracing::error!("{}: cannot read {}: {}", format.name, relative.display(), e);
            }
            return text(404, "Not found");
        }
    };

    match format
        .format_within(source, &contents, project.format_timeout())
        .await
    {
        Ok(body) => {
            tracing::debug!("{}: served {}", format.name, relative.display());
            Resolution::Asset {
                status: 200,
                mime_type: format.dist.mime_type.clone(),
                body,
            }
        }
        Err(e) => {
            tracing::error!("{}: errors in {}: {}", format.name, relative.display(), e);
            text(500, "Errors")
        }
    }
}

fn text(status: u16, body: &str) -> Resolution {
    Resolution::Asset {
        status,
        mime_type: "text/plain".to_string(),
        body: body.to_string(),
    }
}
