//! rescomp CLI - manifest-driven resource compilation from the command line.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{check, compile, key};

#[derive(Parser)]
#[command(name = "rescomp")]
#[command(about = "Compile raw JSON entity data into nested documents and indexes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full compilation
    Compile {
        /// Path to the manifest YAML file
        manifest: String,
        /// Directory containing the raw JSON data files
        #[arg(long)]
        raw_dir: String,
        /// Output directory, replaced atomically on success
        #[arg(long)]
        out: String,
        /// Maximum nesting depth for child relationships
        #[arg(long)]
        max_depth: Option<u32>,
        /// Output the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and validate a manifest without compiling
    Check {
        /// Path to the manifest YAML file
        manifest: String,
        /// Output warnings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the canonical key form of a JSON scalar
    Key {
        /// JSON scalar literal, e.g. '1.50' or '"abc"'
        input: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            manifest,
            raw_dir,
            out,
            max_depth,
            json,
        } => compile::run(manifest, raw_dir, out, max_depth, json),
        Commands::Check { manifest, json } => check::run(manifest, json),
        Commands::Key { input } => key::run(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
