//! src/config.rs
//!
//! Serde-based configuration loading for the CLI driver, modeled on the
//! teacher's `common::config::Config::load()` (read a JSON file, deserialise,
//! apply defaults via `Option` fields). The core engine never reads this
//! file directly — `EngineConfig`/`SearchRequest` are plain in-memory
//! structs; this module only exists for the CLI collaborator.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{CoreError, CoreResult};
use crate::search::EngineConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfigFile {
    pub source: String,
    pub target: String,
    pub spend_min: String,
    pub spend_max: String,
    pub spend_desired: Option<String>,
    pub max_hops: usize,
    pub tolerance: String,
    pub top_k: usize,
    pub max_expansions: Option<u64>,
    pub max_visited_states: Option<u64>,
    pub time_budget_ms: Option<u64>,
    pub amount_scale: Option<u32>,
    pub orders_path: String,
    pub strict_guard_mode: Option<bool>,
}

impl SearchConfigFile {
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            warn!(path = %path.as_ref().display(), error = %e, "failed to read search config file");
            CoreError::invalid_input(format!("failed to read config {}: {e}", path.as_ref().display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            warn!(path = %path.as_ref().display(), error = %e, "malformed search config json");
            CoreError::invalid_input(format!("malformed config json: {e}"))
        })
    }

    pub fn parse_decimal(field: &str, value: &str) -> CoreResult<Decimal> {
        value
            .parse::<Decimal>()
            .map_err(|e| CoreError::invalid_input(format!("field '{field}' is not a valid decimal: {e}")))
    }

    pub fn engine_config(&self) -> CoreResult<EngineConfig> {
        Ok(EngineConfig {
            max_hops: self.max_hops,
            tolerance: Self::parse_decimal("tolerance", &self.tolerance)?,
            top_k: self.top_k,
            max_expansions: self.max_expansions.unwrap_or(DEFAULT_MAX_EXPANSIONS),
            max_visited_states: self.max_visited_states.unwrap_or(DEFAULT_MAX_VISITED_STATES),
            time_budget_ms: self.time_budget_ms,
        })
    }
}

pub const DEFAULT_MAX_EXPANSIONS: u64 = 50_000;
pub const DEFAULT_MAX_VISITED_STATES: u64 = 50_000;
pub const DEFAULT_AMOUNT_SCALE: u32 = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_numeric_tolerance() {
        assert!(SearchConfigFile::parse_decimal("tolerance", "abc").is_err());
    }

    #[test]
    fn parses_valid_decimal() {
        assert_eq!(
            SearchConfigFile::parse_decimal("tolerance", "0.10").unwrap(),
            Decimal::new(10, 2)
        );
    }
}
