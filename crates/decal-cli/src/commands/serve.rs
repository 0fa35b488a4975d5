// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Development server command with live reload support.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::runtime::Handle;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::server::http::{create_server, AppState};
use crate::watcher::{affected_collections, FileChange, FileWatcher};

/// Options for `decal serve`; unset values fall back to `decal.toml`.
#[derive(Debug)]
pub struct ServeOptions<'a> {
    /// Project directory.
    pub dir: &'a Path,
    /// Configuration file relative to `dir`.
    pub conf: Option<&'a Path>,
    /// Host to bind to.
    pub host: Option<String>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// Only show errors.
    pub quiet: bool,
}

/// Runs the preview server with live reload.
pub async fn run(options: ServeOptions<'_>) -> anyhow::Result<()> {
    let config = Config::load(options.dir, options.conf)?;
    let project = config.to_project(options.dir)?;
    let quiet = options.quiet;

    // Bring bundle sources in line with current membership before serving
    let start = Instant::now();
    let rebundled = project.rebundle().await;
    if !quiet && !rebundled.is_empty() {
        println!(
            "  {} {} {}",
            style("✓").green(),
            style(format!("Refreshed {} bundle(s)", rebundled.len())).dim(),
            style(format!("{}ms", start.elapsed().as_millis())).dim()
        );
    }

    // Reload signals fan out to every connected preview page
    let (reload_tx, _) = broadcast::channel::<()>(16);
    let reload_tx = Arc::new(reload_tx);

    let state = Arc::new(AppState {
        assets_dir: project.root().join(&config.dev.assets_dir),
        project,
        reload_tx,
    });

    // The watcher callback runs on the debouncer's thread, so async work
    // is handed back to the runtime
    let runtime = Handle::current();
    let watcher_state = state.clone();
    let _watcher = FileWatcher::new(state.project.root(), move |changes: Vec<FileChange>| {
        let start = Instant::now();
        let affected = affected_collections(&watcher_state.project, &changes);

        let task_state = watcher_state.clone();
        runtime.spawn(async move {
            // Rebundle first so the reloaded page sees the new bundle
            for dir_name in &affected {
                if let Some(collection) = task_state.project.collection(dir_name) {
                    collection.rebundle().await;
                }
            }
            // No receivers just means no page is open
            let _ = task_state.reload_tx.send(());
        });

        if !quiet {
            notify_change(&changes, start);
        }
    })?;

    // Command-line flags win over decal.toml
    let host = options.host.unwrap_or(config.dev.host);
    let port = options.port.unwrap_or(config.dev.port);
    let addr = format!("{}:{}", host, port);

    if !quiet {
        println!(
            "{} {}",
            style("Project:").cyan(),
            style(state.project.name()).bold()
        );
        println!(
            "{} {}",
            style("Server:").cyan(),
            style(format!("http://{}", addr)).green().bold()
        );
        println!(
            "{} {}",
            style("Status:").cyan(),
            style("Watching for changes...").dim()
        );
        println!();
    }

    create_server(&addr, state).await
}

/// Shows a short spinner naming the changed files.
fn notify_change(changes: &[FileChange], start: Instant) {
    let display = changes
        .iter()
        .map(|c| c.path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::default_spinner().template("  {spinner:.cyan} decal {msg}") {
        pb.set_style(spinner);
    }
    pb.set_message(display.clone());
    pb.enable_steady_tick(Duration::from_millis(80));

    // Keep the spinner visible long enough to read
    let elapsed = start.elapsed();
    if elapsed < Duration::from_millis(400) {
        std::thread::sleep(Duration::from_millis(400) - elapsed);
    }

    pb.finish_with_message(format!(
        "{} {} {}",
        style("✓").green(),
        style(&display).dim(),
        style(format!("{}ms", start.elapsed().as_millis())).dim()
    ));
}
