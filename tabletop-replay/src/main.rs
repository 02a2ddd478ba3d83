//! # Tabletop Replay
//!
//! Headless replay of scripted tabletop sessions.

use anyhow::Context;
use clap::Parser;
use tabletop_replay::{execute, CliArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tabletop_replay=info,tabletop_core=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Use JSON format for log pipelines (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    tracing::info!("Starting tabletop replay of {}", args.script.display());

    let report = execute(&args)
        .with_context(|| format!("replaying {}", args.script.display()))?;

    tracing::info!(
        "Replay finished: {} steps, {} gestures, {} rolls",
        report.steps,
        report.gestures.len(),
        report.rolls.len()
    );
    if args.out_state.is_none() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
