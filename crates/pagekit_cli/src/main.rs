//! pagekit CLI
//!
//! Replay gesture scripts against a pager and inspect pager configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pagekit_pager::PagerConfig;

mod script;
mod simulate;

use script::Script;

#[derive(Parser)]
#[command(name = "pagekit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "pagekit pager CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a gesture script and print the pager's events
    Simulate {
        /// Script file (TOML)
        script: PathBuf,

        /// Pager configuration, overrides the script's `config`
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print one JSON record per event
        #[arg(long)]
        json: bool,

        /// Tick on a frame loop thread in wall-clock time
        #[arg(long)]
        realtime: bool,
    },

    /// Validate a pager configuration, or print the defaults
    Config {
        /// Configuration file (TOML)
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            script,
            config,
            json,
            realtime,
        } => cmd_simulate(&script, config, json, realtime),

        Commands::Config { path } => cmd_config(path),
    }
}

fn load_config(path: Option<&Path>) -> Result<PagerConfig> {
    match path {
        Some(path) => PagerConfig::load(path)
            .with_context(|| format!("Failed to load pager config {}", path.display())),
        None => Ok(PagerConfig::default()),
    }
}

fn cmd_simulate(path: &Path, config: Option<PathBuf>, json: bool, realtime: bool) -> Result<()> {
    let script = Script::load(path)?;
    let config = load_config(config.as_deref().or(script.config.as_deref()))?;

    info!(
        "Replaying {} ({} steps, {} pages)",
        path.display(),
        script.steps.len(),
        script.page_keys().len()
    );

    let options = simulate::Options { json, realtime };
    let summary = simulate::run(&script, config, options, &mut io::stdout().lock())?;

    if json {
        let line = serde_json::to_string(&summary).context("Failed to serialize summary")?;
        println!("{{\"summary\":{line}}}");
    } else {
        println!();
        println!(
            "Finished on page {} (offset {:.1}, {:?}) after {} events in {:.0}ms",
            summary.page, summary.offset, summary.state, summary.events, summary.elapsed_ms
        );
    }

    Ok(())
}

fn cmd_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path.as_deref())?;
    if let Some(path) = &path {
        info!("{} is valid", path.display());
    }

    let text = config.to_toml_string().context("Failed to serialize config")?;
    print!("{text}");
    Ok(())
}
