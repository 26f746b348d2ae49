// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.

//! CLI entry point for the GridION simulation launcher.

use anyhow::Result;
use gridion_launcher::cli::{self, Commands};
use gridion_launcher::solvers::{DEFAULT_SOLVER, InstalledSolvers};
use gridion_types::{ExtractConfig, RunConfig};
use serde::Serialize;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let cli = cli::parse(&InstalledSolvers);

    match cli.command {
        Commands::Run(args) => run_command(args.into()),
        Commands::Extract(args) => extract_command(args.into()),
    }
}

fn init_tracing() {
    // Respects RUST_LOG. Logs go to stderr so stdout stays clean for the
    // emitted configuration.
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn run_command(config: RunConfig) -> Result<()> {
    info!("Run configuration accepted:");
    info!("   Range: {} -> {}", date(&config.start_date), date(&config.end_date));
    info!(
        "   Interval: {}",
        config
            .interval_hours
            .map_or_else(|| "(unset)".to_string(), |hours| format!("{hours}h"))
    );
    info!("   Threads: {}", config.threads);
    info!(
        "   Solver: {}",
        config.solver.as_deref().unwrap_or(DEFAULT_SOLVER)
    );
    if config.extract_data {
        info!(
            "   Post-run extraction enabled (keep result.mat files: {})",
            config.keep_matlab
        );
    }
    if let Some(scenario_id) = &config.scenario_id {
        info!("   Scenario: {scenario_id}");
    }

    emit(&config)
}

fn extract_command(config: ExtractConfig) -> Result<()> {
    info!("Extraction configuration accepted:");
    info!("   Range: {} -> {}", date(&config.start_date), date(&config.end_date));
    info!("   Frequency: {}", config.frequency);
    if let Some(scenario_id) = &config.scenario_id {
        info!("   Scenario: {scenario_id}");
    }

    emit(&config)
}

fn date(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(unset)")
}

// The printed configuration is the hand-off to the engine orchestrator, which
// owns all semantic validation before launch.
fn emit<T: Serialize>(config: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
