// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use decal_cli::commands;
use decal_cli::commands::new::ComponentOptions;
use decal_cli::commands::serve::ServeOptions;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "decal")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Scaffold, preview and build component libraries", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Quiet mode: only show errors (useful for CI)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the preview server with live reload
    Serve {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Configuration file, relative to the project directory
        #[arg(short, long)]
        conf: Option<PathBuf>,
        /// Port to run the server on (default: from decal.toml, else 3000)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind to (default: from decal.toml, else 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
    },
    /// Build every component into _dist/
    Build {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Configuration file, relative to the project directory
        #[arg(short, long)]
        conf: Option<PathBuf>,
    },
    /// Create a project, a configuration file or a component
    New {
        #[command(subcommand)]
        what: NewCommands,
    },
}

#[derive(Subcommand)]
enum NewCommands {
    /// Create a new project directory
    Project {
        /// Project directory to create
        name: String,
    },
    /// Write the default decal.toml
    Config {
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Scaffold a new component in a collection
    Component {
        /// Human-readable component name, e.g. "Alert Banner"
        name: String,
        /// Collection directory (optional when there is only one)
        #[arg(long)]
        collection: Option<String>,
        /// Scaffold name (default: the collection's first)
        #[arg(long)]
        scaffold: Option<String>,
        /// Project directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
        /// Configuration file, relative to the project directory
        #[arg(short, long)]
        conf: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Serve { dir, conf, port, host } => {
            commands::serve::run(ServeOptions {
                dir: &dir,
                conf: conf.as_deref(),
                host,
                port,
                quiet: cli.quiet,
            })
            .await
        }
        Commands::Build { dir, conf } => {
            commands::build::run(&dir, conf.as_deref(), cli.quiet).await
        }
        Commands::New { what } => match what {
            NewCommands::Project { name } => commands::new::project(&name),
            NewCommands::Config { dir } => commands::new::config(&dir),
            NewCommands::Component {
                name,
                collection,
                scaffold,
                dir,
                conf,
            } => {
                commands::new::component(ComponentOptions {
                    name: &name,
                    collection: collection.as_deref(),
                    scaffold: scaffold.as_deref(),
                    dir: &dir,
                    conf: conf.as_deref(),
                })
                .await
            }
        },
    }
}
