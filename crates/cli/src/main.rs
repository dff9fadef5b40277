//! Action arbitration demo.
//!
//! Spawns one actor runtime with a handful of sample actions and plays
//! scripted request timelines against it, logging every lifecycle and
//! arbitration event.
//!
//! ```bash
//! cargo run -p action-cli -- --scenario preempt
//! RUST_LOG=action_core=debug cargo run -p action-cli
//! ```

mod catalog;
mod timeline;

use std::time::Duration;

use action_core::Actor;
use action_runtime::{ActorRuntime, Event, Topic, WorkerConfig};
use anyhow::Result;
use clap::Parser;
use strum::IntoEnumIterator;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use timeline::Scenario;

/// Action arbitration demo
#[derive(Parser)]
#[command(name = "action-cli")]
#[command(about = "Plays scripted action requests against one actor", long_about = None)]
#[command(version)]
struct Cli {
    /// Timeline to play; plays all of them when omitted
    #[arg(short, long, value_enum)]
    scenario: Option<Scenario>,

    /// Milliseconds between ticks (overrides ACTION_TICK_MS)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Display name of the demo actor
    #[arg(long, default_value = "player")]
    actor: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for ACTION_* and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = WorkerConfig::from_env();
    if let Some(ms) = cli.tick_ms {
        config = config.with_tick_interval(Duration::from_millis(ms));
    }
    let tick_interval = config.tick_interval;

    let runtime = ActorRuntime::builder(Actor::new(0, cli.actor))
        .config(config)
        .registry(catalog::registry())
        .build();
    let handle = runtime.handle();

    let lifecycle = tokio::spawn(log_events(runtime.subscribe(Topic::Lifecycle)));
    let arbitration = tokio::spawn(log_events(runtime.subscribe(Topic::Arbitration)));

    let scenarios: Vec<Scenario> = match cli.scenario {
        Some(scenario) => vec![scenario],
        None => Scenario::iter().collect(),
    };

    for scenario in scenarios {
        info!(%scenario, "Playing scenario");
        timeline::play(&handle, scenario.cues(), tick_interval).await?;

        // Start the next timeline from idle.
        handle.cancel().await?;
    }

    let status = handle.status().await?;
    info!(?status, "Final status");

    drop(handle);
    runtime.shutdown().await?;

    lifecycle.await?;
    arbitration.await?;

    Ok(())
}

/// Logs events until the bus closes.
async fn log_events(mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(Event::Lifecycle(event)) => info!(
                actor = %event.actor,
                action = %event.action,
                kind = %event.kind,
                "Lifecycle"
            ),
            Ok(Event::Rejected(event)) => info!(
                actor = %event.actor,
                action = %event.action,
                reason = %event.reason,
                "Rejected"
            ),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event subscriber lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}
