// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Build command for writing every component's artifacts into `_dist/`.

use std::path::Path;
use std::time::Instant;

use console::style;
use decal::project::path_to_string;
use decal::{ArtifactOutcome, BuildReport};

use crate::config::Config;

/// Rebundles and builds the project in `dir`.
///
/// Failed artifacts are reported but do not fail the command; only
/// configuration errors do.
pub async fn run(dir: &Path, conf: Option<&Path>, quiet: bool) -> anyhow::Result<()> {
    let config = Config::load(dir, conf)?;
    let project = config.to_project(dir)?;

    if !quiet {
        println!(
            "{} {}",
            style("Building components in:").cyan(),
            project.root().display()
        );
    }

    let start = Instant::now();
    let report = project.build().await;
    print_report(&report, quiet);

    println!(
        "{} {} {}",
        style("Build complete:").green().bold(),
        summary(&report),
        style(format!("{}ms", start.elapsed().as_millis())).dim()
    );

    Ok(())
}

fn print_report(report: &BuildReport, quiet: bool) {
    for outcome in &report.outcomes {
        match outcome {
            ArtifactOutcome::Written { format, output, .. } if !quiet => {
                println!(
                    "  {} {} {}",
                    style("✓").green(),
                    format,
                    style(path_to_string(output)).dim()
                );
            }
            ArtifactOutcome::Failed {
                format,
                component,
                message,
            } => {
                eprintln!(
                    "  {} {} {} {}",
                    style("✗").red(),
                    format,
                    style(component).dim(),
                    style(message).red()
                );
            }
            _ => {}
        }
    }
}

/// One-line summary of a build report.
pub fn summary(report: &BuildReport) -> String {
    let written = report.written().count();
    let failed = report.failed().count();
    if failed == 0 {
        format!("{} artifact(s) written", written)
    } else {
        format!("{} artifact(s) written, {} failed", written, failed)
    }
}
