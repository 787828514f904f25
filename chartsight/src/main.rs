//! Chartsight demo binary.
//!
//! Runs the controller headlessly against a mock runtime and a simulated
//! snapshot endpoint.

use std::path::PathBuf;

use clap::Parser;

use chartsight::demo;
use chartsight_common::{ChartsightConfig, init_tracing, load_config};

#[derive(Debug, Parser)]
#[command(name = "chartsight", about = "Headless demo of the Chartsight chart controller")]
struct Args {
    /// Path to a JSON5 configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of live-update ticks to process before exiting.
    #[arg(long, default_value_t = 5)]
    ticks: u64,

    /// Override the poll interval in milliseconds.
    #[arg(long)]
    refresh_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config: ChartsightConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => ChartsightConfig::default(),
    };
    if let Some(refresh_ms) = args.refresh_ms {
        config.refresh_interval_ms = refresh_ms;
    }

    init_tracing(&config.logging)?;

    tracing::info!("Starting Chartsight demo");
    demo::run(config, args.ticks).await
}
