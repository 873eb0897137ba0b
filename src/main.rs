//! Barbershop simulation - sleeping barbers, a bounded waiting room and
//! impatient customers
//!
//! Module structure:
//! - `domain/` - Core types (CustomerId, BarberId, Rating, Outcome)
//! - `io/` - Outward-facing consumers (event narration, reporting)
//! - `services/` - Shop behavior (WaitingRoom, barbers, arrivals, day cycle)
//! - `infra/` - Infrastructure (Config, StatsRegistry, RandomSource)

use anyhow::Context;
use barbershop_sim::infra::Config;
use barbershop_sim::io::{create_event_channel, LogDayReporter, Narrator};
use barbershop_sim::services::{ArrivalProcess, DayCycle, Simulation};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Sleeping-barber shop simulation
#[derive(Parser, Debug)]
#[command(name = "barbershop-sim", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to CONFIG_FILE, then config/shop.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Seed the random source for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Run the day cycle for this many days (0 = until Ctrl+C)
    #[arg(long)]
    days: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Default: INFO, use RUST_LOG=debug for barber steps and day progress
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339())
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_timer(UtcTime::rfc_3339())
            .with_target(false)
            .init();
    }

    info!(git_hash = %env!("GIT_HASH"), "barbershop-sim starting");

    // An explicit --config must load; otherwise fall back to defaults
    let mut config = match args.config.as_deref() {
        Some(path) => Config::from_file(path)?,
        None => Config::load(&[]),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(days) = args.days {
        config = config.with_days(days);
    }
    config.validate().context("Invalid configuration after command line overrides")?;

    info!(
        config_file = %config.config_file(),
        capacity = %config.capacity(),
        barbers = %config.barbers(),
        sleep_chance_pct = %config.sleep_chance_pct(),
        renege_one_in = %config.renege_one_in(),
        arrival_interval_ms = %config.arrival_interval_ms(),
        day_cycle = %config.day_cycle_enabled(),
        batch_size = %config.batch_size(),
        days = %config.days(),
        seed = ?config.seed(),
        "config_loaded"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    // Event channel (bounded, producers never block)
    let (events, event_rx) = create_event_channel(config.event_buffer());
    let narrator = tokio::spawn(Narrator::new(event_rx).run(shutdown_rx.clone()));

    let day_cycle = config.day_cycle_enabled();
    let sim = Arc::new(Simulation::from_config(config, Some(events.clone())));
    let mut staff = sim.spawn_staff(&shutdown_rx);

    // Handle shutdown on Ctrl+C
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = signal_tx.send(true);
    });

    if day_cycle {
        let days = DayCycle::new(sim.clone(), Arc::new(LogDayReporter))
            .run(shutdown_rx.clone())
            .await;
        info!(days = %days, "day_cycle_complete");
    } else {
        ArrivalProcess::continuous(sim.clone()).run(shutdown_rx.clone()).await;
    }

    // Stop everyone still running (no-op if Ctrl+C already did)
    let _ = shutdown_tx.send(true);

    while let Some(res) = staff.join_next().await {
        res.context("Staff task failed")?;
    }
    let narrated = narrator.await.context("Narrator task failed")?;

    sim.stats().snapshot().log();
    info!(
        narrated = %narrated,
        ratings = %sim.ratings().len(),
        average_rating = ?sim.ratings().average(),
        events_dropped = %events.dropped(),
        "barbershop-sim shutdown complete"
    );
    Ok(())
}
