// In app/src/commands.rs

use anyhow::{Context, Result};
use app_config::Settings;
use core_types::PortfolioSnapshot;
use engine::Engine;
use ledger::PerformanceLedger;
use serde::Serialize;
use std::path::PathBuf;

use crate::inputs;

async fn open_engine(settings: &Settings, limits: risk::RiskLimits) -> Result<Engine> {
    let ledger = open_ledger(settings).await?;
    Ok(Engine::new(ledger, limits))
}

async fn open_ledger(settings: &Settings) -> Result<PerformanceLedger> {
    ledger::open(&settings.ledger)
        .await
        .with_context(|| format!("Failed to open ledger at {}", settings.ledger.data_dir.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// --- "Ingest" Subcommand Logic ---

pub async fn handle_ingest(
    settings: &Settings,
    input: PathBuf,
    portfolio: Option<PathBuf>,
    limits: Option<PathBuf>,
) -> Result<()> {
    let raw = inputs::read_text(&input)?;
    let portfolio = match portfolio {
        Some(path) => inputs::read_portfolio(&path)?,
        None => PortfolioSnapshot::default(),
    };
    let limits = match limits {
        Some(path) => app_config::load_risk_limits(&path)
            .with_context(|| format!("Failed to load risk limits from {}", path.display()))?,
        None => settings.risk.clone(),
    };

    let engine = open_engine(settings, limits).await?;
    let outcome = engine.process(&raw, &portfolio).await?;

    tracing::info!(
        candidates = outcome.assessments.len(),
        accepted = outcome.accepted_count(),
        "Ingest complete."
    );
    print_json(&outcome)
}

// --- Lifecycle Subcommands ---

pub async fn handle_execute(settings: &Settings, id: &str, executed: bool) -> Result<()> {
    let engine = open_engine(settings, settings.risk.clone()).await?;
    if let Some(record) = engine.mark_executed(id, executed).await? {
        print_json(&record)?;
    }
    Ok(())
}

pub async fn handle_close(settings: &Settings, id: &str, profit: f64) -> Result<()> {
    let engine = open_engine(settings, settings.risk.clone()).await?;
    if let Some(record) = engine.record_result(id, profit).await? {
        print_json(&record)?;
    }
    Ok(())
}

pub async fn handle_expire(settings: &Settings, hours: Option<u64>) -> Result<()> {
    let hours = hours.unwrap_or(settings.ledger.expire_after_hours);
    let max_age = i64::try_from(hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .context("Expiry age is out of range")?;

    let ledger = open_ledger(settings).await?;
    let expired = ledger.expire_stale(max_age).await?;
    tracing::info!(count = expired.len(), hours, "Expiry sweep complete.");
    print_json(&expired)
}

// --- Reporting Subcommands ---

pub async fn handle_metrics(settings: &Settings, start: Option<String>, end: Option<String>) -> Result<()> {
    let ledger = open_ledger(settings).await?;
    let (start, end) = inputs::metrics_range(start.as_deref(), end.as_deref(), ledger.now())?;
    tracing::info!(%start, %end, "Calculating performance metrics.");

    let metrics = ledger.get_metrics(start, end).await?;
    print_json(&metrics)
}

pub async fn handle_history(settings: &Settings, limit: usize) -> Result<()> {
    let ledger = open_ledger(settings).await?;
    let records = ledger.get_recommendation_history(limit).await?;
    print_json(&records)
}

pub fn handle_exposure(positions: PathBuf) -> Result<()> {
    let positions = inputs::read_positions(&positions)?;
    let metrics = risk::compute_portfolio_metrics(&positions);
    print_json(&metrics)
}
