//! Swim sensor log replay tool.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use swim_metrics::app::{ReplayApp, ReplayArgs};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = ReplayArgs::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Swim Metrics - log replay");

    let app = ReplayApp::new(args).context("failed to set up replay")?;
    if let Some(report) = app.run().context("replay failed")? {
        println!(
            "{} lengths, {:.1}s swimming over {:.1}s of log",
            report.lengths.len(),
            swim_metrics::utils::safe_cast::nanos_to_secs(report.swim_time),
            swim_metrics::utils::safe_cast::nanos_to_secs(report.summary.duration()),
        );
    }

    Ok(())
}
