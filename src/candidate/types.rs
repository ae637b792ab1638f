//! src/candidate/types.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::decimal::{Money, MoneyMap};
use crate::search::state::{PathEdge, SpendConstraints};

/// A fully-walked path from the bootstrap state to a target node. Produced
/// only when `hops == path_edges.len()`.
#[derive(Debug, Clone)]
pub struct CandidatePath {
    pub cost: Decimal,
    pub product: Decimal,
    pub hops: usize,
    pub path_edges: Arc<Vec<PathEdge>>,
    pub range: Option<SpendConstraints>,
}

/// One hop of a materialised path. `spent.currency == from`,
/// `received.currency == to`.
#[derive(Debug, Clone, Serialize)]
pub struct PathLeg {
    pub from: String,
    pub to: String,
    pub spent: Money,
    pub received: Money,
    pub fees: MoneyMap,
}

/// A fully-costed path result, the output of the candidate materialiser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    pub total_spent: Money,
    pub total_received: Money,
    pub residual_tolerance: Decimal,
    #[serde(rename = "feeBreakdown")]
    pub fee_breakdown: MoneyMap,
    pub legs: Vec<PathLeg>,
}
