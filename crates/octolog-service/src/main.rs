//! octolog-service - drains the sensor store into CSV partitions.
//!
//! Run with: `cargo run -p octolog-service`

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use octolog_archive::Archive;
use octolog_service::{Config, Drainer, SystemClock, drain};
use octolog_store::Store;

/// octolog-service - periodic drain from the sensor store into
/// daily/monthly CSV partition files.
#[derive(Parser, Debug)]
#[command(name = "octolog-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Partition output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seconds between drain cycles (overrides config).
    #[arg(short, long)]
    interval: Option<u64>,

    /// Run a single drain cycle and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("octolog_service=info".parse()?)
                .add_directive("octolog_store=info".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(db_path) = args.database {
        config.storage.path = db_path;
    }
    if let Some(dir) = args.output_dir {
        config.archive.dir = dir;
    }
    if let Some(interval) = args.interval {
        config.drain.poll_interval = interval;
    }
    config.validate()?;

    let store = Store::open(&config.storage.path)?;
    let archive = Archive::new(&config.archive.dir);
    let mut drainer = Drainer::new(store, archive, SystemClock);

    if args.once {
        let report = drainer.run_cycle()?;
        info!(
            "Drained {} rows into {} ({} purged)",
            report.drained,
            drainer.partition_keys().day,
            report.purged
        );
        return Ok(());
    }

    info!(
        "Draining into {} every {}s",
        config.archive.dir.display(),
        config.drain.poll_interval
    );
    drain::run(drainer, Duration::from_secs(config.drain.poll_interval)).await;

    Ok(())
}
