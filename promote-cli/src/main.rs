//! Promote: render manifests remotely and commit them to a working directory.
//!
//! # Usage
//!
//! ```text
//! promote render --config <file> [--work-dir <dir>] [--deadline <duration>]
//! promote validate --config <file>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{render::RenderArgs, validate::ValidateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "promote",
    version,
    about = "Render Kubernetes manifests through a remote service and commit them to disk",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Call the render service and write its manifests under the work dir.
    Render(RenderArgs),

    /// Validate a step config file without contacting the render service.
    Validate(ValidateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Validate(args) => args.run(),
    }
}
