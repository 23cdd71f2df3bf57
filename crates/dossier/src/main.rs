//! Dossier CLI - documentation site generator.
//!
//! Provides commands for:
//! - `build`: Render the project graph to every configured output
//! - `watch`: Rebuild whenever the project graph or readme changes

mod commands;
mod error;
mod output;
mod project;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, WatchArgs};
use output::Output;

/// Dossier - documentation site generator.
#[derive(Parser)]
#[command(name = "dossier", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render documentation outputs once.
    Build(BuildArgs),
    /// Render, then re-render on every change to the project files.
    Watch(WatchArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Build(args) => args.render.verbose,
        Commands::Watch(args) => args.render.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Single-threaded: documents render sequentially, jobs interleave.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    let result = rt.block_on(async {
        match cli.command {
            Commands::Build(args) => args.execute().await,
            Commands::Watch(args) => args.execute().await,
        }
    });

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
