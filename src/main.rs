use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

mod output;
mod runner;
mod sampler;
mod session;
mod sweep;

use gas_exchange_common::SessionConfig;
use output::OutputFormat;

/// Headless leaf gas exchange session engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the session configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay the scripted control events and record the flux chart (default)
    Run,
    /// Evaluate the model over a grid of airflow and boundary layer thickness
    Sweep {
        /// Output CSV path (defaults to <base_filename>_sweep.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Leaf Gas Exchange Engine...");

    // --- Load Configuration ---
    let config = SessionConfig::load(&args.config)?;
    info!("Loaded configuration from {}", args.config.display());
    debug!("Session configuration: {:#?}", config);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(&config),
        Command::Sweep { output } => {
            let rows = sweep::run_sweep(&config.sweep, &config.initial, config.model.light_model);
            let path = output.unwrap_or_else(|| PathBuf::from(format!("{}_sweep.csv", config.output.base_filename)));
            output::save_sweep_csv(&path, &rows)
        }
    }
}

fn run(config: &SessionConfig) -> Result<()> {
    let snapshots = runner::run_session(config)?;

    // --- Save Recorded Data ---
    info!("Saving recorded data...");
    if config.output.save_snapshots {
        let format = OutputFormat::from_name(config.output.format.as_deref().unwrap_or("json"));
        output::save_snapshots(&config.output.base_filename, format, &snapshots)?;
    } else {
        info!("Skipping saving snapshots as per config (save_snapshots is false).");
    }

    if config.output.save_samples {
        let filename = format!("{}_flux.csv", config.output.base_filename);
        output::save_samples_csv(&filename, &snapshots)?;
    } else {
        info!("Skipping saving flux samples as per config.");
    }

    info!("Session Complete.");
    Ok(())
}
