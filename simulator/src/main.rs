use anyhow::Context;
use clap::Parser;
use feed::bridge::FeedBridge;
use generator::crowd::{gate_counts, rotate_images, CrowdConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::FeedConfig;
use workflow::runner::Runner;

mod feed;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic live-data feed for the crowd-flow dashboard")]
struct Args {
    /// Run a single generation pass and emit a baseline summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a feed config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 6)]
    gates: usize,
    #[arg(long, default_value_t = 50)]
    max_capacity: u32,
    #[arg(long, default_value_t = 15)]
    penalty_factor: u32,
    /// Seed for the synthetic crowd generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Ceiling for generated per-gate counts
    #[arg(long, default_value_t = 150)]
    peak: u32,
    /// Keep the HTTP feed alive for dashboard polling
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let feed_config = if let Some(path) = args.workflow {
        FeedConfig::load(path)?
    } else {
        FeedConfig::from_args(args.gates, args.max_capacity, args.penalty_factor)
    };

    let crowd = CrowdConfig {
        gates: feed_config.gates,
        seed: args.seed,
        peak: args.peak,
        ..Default::default()
    };

    let runner = Runner::new(feed_config.clone());
    let bridge = FeedBridge::new(Arc::new(runner.clone()), crowd.clone());

    let counts = gate_counts(&crowd, 0);
    let images = rotate_images(&crowd, 0);
    let response = runner.execute(&counts, &images)?;

    if args.offline {
        println!(
            "Offline run -> gates {}, people {}, screens {}",
            response.metadata.num_gates,
            response.metadata.total_people,
            response.screens.len()
        );

        bridge.publish(&response)?;
        bridge.publish_status("Offline feed results ready.");

        let report = format!(
            "gates={} people={} screens={} counts={:?}\n",
            response.metadata.num_gates,
            response.metadata.total_people,
            response.screens.len(),
            counts
        );
        let report_path = PathBuf::from("tools/data/offline_feed.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        bridge.publish(&response)?;
        bridge.publish_status("HTTP feed running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
