//! Modspec command-line inspector
//!
//! Shows the loadable shape of module manifests and the link order of a
//! module within a directory of manifests.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modspec")]
#[command(about = "Module specification inspector", long_about = None)]
#[command(version)]
struct Cli {
    /// Loader configuration file (modspec.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the concrete specification a manifest describes
    Inspect {
        /// Module manifest file
        manifest: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve a module's dependencies from a directory of manifests
    Link {
        /// Directory containing *.toml module manifests
        dir: PathBuf,
        /// Module to link
        module: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MODSPEC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let options = commands::alias_options(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { manifest, json } => commands::inspect::execute(&manifest, &options, json),
        Commands::Link { dir, module, json } => commands::link::execute(&dir, &module, &options, json),
    }
}
