//! src/cli.rs
//!
//! The out-of-core-scope CLI/driver collaborator (spec.md §1): loads an
//! order CSV fixture and a search config JSON file, runs one search, and
//! prints the stable `SearchOutcome` wire shape (spec.md §6) as JSON.

use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::candidate::PathResult;
use crate::config::{SearchConfigFile, DEFAULT_AMOUNT_SCALE};
use crate::errors::{CoreError, CoreResult};
use crate::orders::fees::PercentageFee;
use crate::orders::{AssetPair, Order, OrderBounds, Side};
use crate::search::guards::SearchGuardReport;
use crate::search::{path_search, SearchRequest, SpendConstraints};
use crate::decimal::ExchangeRate;
use crate::telemetry::Metrics;

#[derive(Debug, Parser)]
#[command(name = "flowpath-cli", about = "Best-first conversion path search")]
pub struct Cli {
    /// Path to a search config JSON file (see SearchConfigFile).
    #[arg(long)]
    pub config: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct OrderRecord {
    id: u64,
    side: String,
    base: String,
    quote: String,
    min: String,
    max: String,
    rate: String,
    rate_scale: u32,
    fee_bps: Option<u32>,
}

pub fn load_orders_csv(path: &std::path::Path) -> CoreResult<Vec<Order>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| CoreError::invalid_input(format!("failed to open orders csv: {e}")))?;

    let mut orders = Vec::new();
    for (index, record) in reader.deserialize::<OrderRecord>().enumerate() {
        let record = record.map_err(|e| CoreError::invalid_input(format!("row {index}: {e}")))?;
        let side = match record.side.to_ascii_uppercase().as_str() {
            "BUY" => Side::Buy,
            "SELL" => Side::Sell,
            other => return Err(CoreError::invalid_input(format!("row {index}: unknown side '{other}'"))),
        };
        let min = SearchConfigFile::parse_decimal("min", &record.min)?;
        let max = SearchConfigFile::parse_decimal("max", &record.max)?;
        let rate = SearchConfigFile::parse_decimal("rate", &record.rate)?;

        let fee_policy = record
            .fee_bps
            .filter(|bps| *bps > 0)
            .map(|bps| Arc::new(PercentageFee::new(bps, record.rate_scale)) as Arc<dyn crate::orders::fees::FeePolicy>);

        let effective_rate = ExchangeRate::new(record.base.clone(), record.quote.clone(), rate, record.rate_scale)?;
        orders.push(Order::new(
            record.id,
            side,
            AssetPair::new(record.base, record.quote),
            OrderBounds::new(min, max)?,
            effective_rate,
            fee_policy,
        )?);
    }

    if let Some(dupe) = orders.iter().map(|o| o.id).duplicates().next() {
        return Err(CoreError::invalid_input(format!(
            "duplicate order id {dupe} in orders csv"
        )));
    }

    Ok(orders)
}

#[derive(Debug, Serialize)]
pub struct SearchOutcomeView<'a> {
    pub paths: &'a [PathResult],
    pub guards: &'a SearchGuardReport,
}

pub fn run(cli: Cli, metrics: &Metrics) -> CoreResult<()> {
    let config = SearchConfigFile::load(&cli.config)?;
    info!(config = %cli.config.display(), "loaded search config");

    let orders = load_orders_csv(std::path::Path::new(&config.orders_path))?;
    info!(count = orders.len(), "loaded orders");

    let spend_min = SearchConfigFile::parse_decimal("spend_min", &config.spend_min)?;
    let spend_max = SearchConfigFile::parse_decimal("spend_max", &config.spend_max)?;
    let spend_desired: Option<Decimal> = config
        .spend_desired
        .as_deref()
        .map(|s| SearchConfigFile::parse_decimal("spend_desired", s))
        .transpose()?;
    let spend = SpendConstraints::new(spend_min, spend_max, spend_desired)?;

    let engine_config = config.engine_config()?;
    let amount_scale = config.amount_scale.unwrap_or(DEFAULT_AMOUNT_SCALE);
    let strict = config.strict_guard_mode.unwrap_or(false);

    let request = SearchRequest {
        orders: &orders,
        source: &config.source,
        target: &config.target,
        spend: Some(spend),
        config: engine_config,
        amount_scale,
        acceptance: None,
    };

    let outcome = path_search(request)?;

    metrics.add_paths_found(outcome.paths.len() as u64);
    if outcome.guards.breached.any {
        metrics.inc_guard_breaches();
    }
    for _ in 0..outcome.candidates_rejected_by_predicate {
        metrics.inc_candidates_rejected_by_predicate();
    }

    if strict && outcome.guards.breached.any {
        warn!(expansions = outcome.guards.metrics.expansions, "search guard breached under strict mode");
        return Err(CoreError::guard_limit("search guard breached under strict mode"));
    }

    let view = SearchOutcomeView {
        paths: &outcome.paths,
        guards: &outcome.guards,
    };
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| CoreError::invalid_input(format!("failed to serialise outcome: {e}")))?;
    println!("{json}");

    Ok(())
}
