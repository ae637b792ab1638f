//! src/search/engine.rs
//!
//! The best-first engine: spec.md §4.8's bootstrap + main loop. Pops the
//! cheapest frontier state, finalises target-node states as candidates,
//! and expands everything else subject to hop/tolerance/capacity/
//! dominance pruning.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{trace, warn};

use crate::candidate::{materialize, CandidatePath, PathResult};
use crate::decimal::ops;
use crate::errors::{CoreError, CoreResult};
use crate::graph::{build_graph, Graph};
use crate::orders::{Order, Side};
use crate::results::{DefaultPathOrderStrategy, PathOrderKey, TopKCollector};
use crate::search::guards::{GuardLimits, SearchGuardReport, SearchGuards};
use crate::search::heap::{SearchHeap, SearchStatePriority};
use crate::search::registry::DominanceRegistry;
use crate::search::state::{SearchState, SearchStateRecord, SearchStateSignature, SpendConstraints, COST_SCALE};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_hops: usize,
    pub tolerance: Decimal,
    pub top_k: usize,
    pub max_expansions: u64,
    pub max_visited_states: u64,
    pub time_budget_ms: Option<u64>,
}

pub struct SearchRequest<'a> {
    pub orders: &'a [Order],
    pub source: &'a str,
    pub target: &'a str,
    pub spend: Option<SpendConstraints>,
    pub config: EngineConfig,
    /// Scale applied uniformly to all money amounts this search produces.
    /// A single engine invocation does not track a distinct scale per
    /// currency; callers with mixed-precision currencies should run
    /// separate searches.
    pub amount_scale: u32,
    pub acceptance: Option<&'a dyn Fn(&CandidatePath) -> bool>,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub paths: Vec<PathResult>,
    pub guards: SearchGuardReport,
    /// Candidates that reached the target but were rejected by
    /// `SearchRequest::acceptance`. The engine stays metrics-agnostic;
    /// callers that hold a `telemetry::Metrics` apply this count themselves.
    pub candidates_rejected_by_predicate: u64,
}

fn conversion_factor(order: &Order, rate: Decimal, scale: u32) -> CoreResult<Decimal> {
    match order.side {
        Side::Buy => ops::rescale(rate, scale),
        Side::Sell => ops::div_rescale(Decimal::ONE, rate, scale),
    }
}

fn range_signature_segments(range: &Option<SpendConstraints>) -> Vec<(&'static str, String)> {
    match range {
        None => Vec::new(),
        Some(r) => {
            let mut segs = vec![("min", r.min.to_string()), ("max", r.max.to_string())];
            if let Some(d) = r.desired {
                segs.push(("desired", d.to_string()));
            }
            segs
        }
    }
}

/// Runs one best-first path search. Single-threaded and synchronous per
/// spec.md §5; callers wanting concurrency run independent searches on
/// independent inputs.
pub fn path_search(request: SearchRequest) -> CoreResult<SearchOutcome> {
    if request.config.top_k == 0 {
        warn!("rejecting search request: topK must be >= 1");
        return Err(CoreError::invalid_input("topK must be >= 1"));
    }
    if request.config.tolerance < Decimal::ZERO || request.config.tolerance > Decimal::ONE {
        warn!(tolerance = %request.config.tolerance, "rejecting search request: tolerance out of [0, 1]");
        return Err(CoreError::invalid_input("tolerance must lie in [0, 1]"));
    }

    let graph: Graph = build_graph(request.orders, request.amount_scale, request.amount_scale)?;

    let mut guards = SearchGuards::new(GuardLimits {
        max_expansions: request.config.max_expansions,
        max_visited_states: request.config.max_visited_states,
        time_budget_ms: request.config.time_budget_ms,
    });
    let mut registry = DominanceRegistry::new();
    let mut heap = SearchHeap::new();
    let mut collector = TopKCollector::new(request.config.top_k, DefaultPathOrderStrategy);
    let mut best_known_cost: Option<Decimal> = None;
    let mut insertion_order: u64 = 0;
    let mut candidates_rejected_by_predicate: u64 = 0;

    let bootstrap_signature = SearchStateSignature::build(&range_signature_segments(&request.spend))?;
    let bootstrap = SearchState::bootstrap(request.source, request.spend.clone(), bootstrap_signature.clone());
    let (registry0, _) = registry.register(request.source, SearchStateRecord::from_state(&bootstrap));
    registry = registry0;
    heap.push(
        bootstrap,
        SearchStatePriority::new(Decimal::ZERO, 0, &crate::search::state::RouteSignature::empty(), 0),
    );

    let initial_spend = request
        .spend
        .as_ref()
        .map(|s| s.desired.unwrap_or(s.min))
        .unwrap_or(Decimal::ZERO);

    while !heap.is_empty() && guards.can_expand() {
        let state = match heap.pop() {
            Some(s) => s,
            None => break,
        };
        guards.record_expansion();

        if state.current_node == request.target && state.hops >= 1 {
            let candidate = CandidatePath {
                cost: state.cost,
                product: state.product,
                hops: state.hops,
                path_edges: state.path_edges.clone(),
                range: state.range.clone(),
            };
            best_known_cost = Some(match best_known_cost {
                Some(b) => b.min(candidate.cost),
                None => candidate.cost,
            });

            let accepted = request.acceptance.map(|f| f(&candidate)).unwrap_or(true);
            if accepted {
                let route_signature = state.route_signature()?;
                if let Some(result) = materialize(&candidate, request.orders, initial_spend, request.config.tolerance)? {
                    let key = PathOrderKey {
                        cost: candidate.cost,
                        hops: candidate.hops,
                        route_signature: route_signature.as_str().to_string(),
                        insertion_order,
                    };
                    collector.offer(key, result);
                }
            } else {
                candidates_rejected_by_predicate += 1;
                trace!(node = %state.current_node, cost = %candidate.cost, "candidate rejected by acceptance predicate");
            }
            continue;
        }

        if state.hops == request.config.max_hops {
            trace!(node = %state.current_node, hops = state.hops, "pruned: hop limit reached");
            continue;
        }

        for edge in graph.edges_from(&state.current_node) {
            let order = edge.order(request.orders);
            let factor = conversion_factor(order, edge.rate, COST_SCALE)?;
            let new_product = ops::mul_rescale(state.product, factor, COST_SCALE)?;
            let new_cost = ops::div_rescale(Decimal::ONE, new_product, COST_SCALE)?;
            let new_hops = state.hops + 1;

            if let Some(best) = best_known_cost {
                let ceiling = ops::mul_rescale(best, Decimal::ONE + request.config.tolerance, COST_SCALE)?;
                if ops::compare_at(new_cost, ceiling, COST_SCALE)?.is_gt() {
                    trace!(from = %edge.from, to = %edge.to, cost = %new_cost, ceiling = %ceiling, "pruned: exceeds tolerance ceiling");
                    continue;
                }
            }

            let new_range = match &state.range {
                None => None,
                Some(current_range) => {
                    let input_capacity = match order.side {
                        Side::Buy => &edge.base_capacity,
                        Side::Sell => &edge.quote_capacity,
                    };
                    let range_money_lo = crate::decimal::Money::new(edge.from.clone(), current_range.min, request.amount_scale)?;
                    let range_money_hi = crate::decimal::Money::new(edge.from.clone(), current_range.max, request.amount_scale)?;
                    let range_interval = crate::graph::Interval::new(range_money_lo, range_money_hi);
                    let Some(clipped) = input_capacity.intersect(&range_interval)? else {
                        trace!(from = %edge.from, to = %edge.to, "pruned: spend range does not intersect edge capacity");
                        continue;
                    };
                    let desired_clipped = current_range.desired.filter(|d| *d >= clipped.min.amount && *d <= clipped.max.amount);
                    let clipped_constraints = SpendConstraints::new(clipped.min.amount, clipped.max.amount, desired_clipped)?;
                    Some(clipped_constraints.apply_rate(factor, request.amount_scale)?)
                }
            };

            let new_signature = SearchStateSignature::build(&range_signature_segments(&new_range))?;
            let record = SearchStateRecord {
                cost: new_cost,
                hops: new_hops,
                signature: new_signature.clone(),
            };

            if registry.is_dominated(&edge.to, &new_signature, &record) {
                trace!(to = %edge.to, cost = %new_cost, "pruned: dominated by an existing state");
                continue;
            }
            let (updated_registry, delta) = registry.register(&edge.to, record);
            if delta == 1 && !guards.try_admit_visited_state() {
                trace!(to = %edge.to, "pruned: visited-state guard exhausted");
                continue;
            }
            registry = updated_registry;

            let mut edges_vec: Vec<_> = (*state.path_edges).clone();
            edges_vec.push(edge.clone());

            let new_state = SearchState {
                current_node: edge.to.clone(),
                cost: new_cost,
                product: new_product,
                hops: new_hops,
                path_edges: Arc::new(edges_vec),
                range: new_range,
                signature: new_signature,
            };

            insertion_order += 1;
            let route_signature = new_state.route_signature()?;
            let priority = SearchStatePriority::new(new_cost, new_hops, &route_signature, insertion_order);
            heap.push(new_state, priority);
        }
    }

    Ok(SearchOutcome {
        paths: collector.into_results(),
        guards: guards.finalize(),
        candidates_rejected_by_predicate,
    })
}
