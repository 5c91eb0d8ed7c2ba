//! Hearth kernel daemon.
//!
//! Boots a kernel from a JSON config file (or defaults), starts the
//! tick generator, and idles until interrupted. Collaborators link
//! against the kernel crates and mount themselves through the
//! registry; this binary is the standalone host for them.
//!
//! Usage:
//!   hearthd --config hearth.json
//!   hearthd --data-dir ./data --verbose

use anyhow::{Context, Result};
use clap::Parser;
use hearth_kernel::{Kernel, KernelConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "hearthd")]
#[command(about = "Hearth coordination kernel daemon")]
struct Args {
    /// Path to the kernel config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the state data directory
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => KernelConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => KernelConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let tick_enabled = config.tick_enabled;
    let kernel = Kernel::new(config).context("booting kernel")?;
    if tick_enabled {
        kernel.start_ticks();
    }

    info!(
        domains = kernel.state().domains().len(),
        ticks = tick_enabled,
        "Hearth kernel running, press ctrl-c to stop"
    );
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;

    info!("Shutting down");
    kernel.stop_ticks();
    Ok(())
}
