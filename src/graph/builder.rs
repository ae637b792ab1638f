//! src/graph/builder.rs
//!
//! Converts a collection of orders into a directed multigraph. Each order
//! becomes exactly one `GraphEdge`; nodes are created lazily as orders
//! reference new currencies. The graph is immutable once built.

use std::sync::Arc;

use ahash::AHashMap;
use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::CoreResult;
use crate::graph::edge::{EdgeSegment, GraphEdge, Interval, Measure};
use crate::graph::segment::prune_and_sort;
use crate::orders::fees::FeeBreakdown;
use crate::orders::{Order, Side};

/// All outgoing edges from one currency, in the canonical order they were
/// inserted (the order the owning orders were supplied in). Edges are
/// `Arc`-wrapped so search states can cheaply share path-edge sequences.
#[derive(Debug, Clone, Default)]
pub struct GraphNode {
    pub currency: String,
    pub edges: Vec<Arc<GraphEdge>>,
}

/// An immutable directed multigraph of conversion edges, keyed by
/// currency. Node iteration order is insertion order (`ahash::AHashMap`
/// does not guarantee this across runs, so callers that need stable
/// iteration over *nodes* should go through `Graph::currencies`, which is
/// sorted; edge order *within* a node is always canonical).
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: AHashMap<String, GraphNode>,
}

impl Graph {
    pub fn node(&self, currency: &str) -> Option<&GraphNode> {
        self.nodes.get(currency)
    }

    pub fn contains_currency(&self, currency: &str) -> bool {
        self.nodes.contains_key(currency)
    }

    pub fn edges_from<'a>(&'a self, currency: &str) -> &'a [Arc<GraphEdge>] {
        self.nodes
            .get(currency)
            .map(|n| n.edges.as_slice())
            .unwrap_or(&[])
    }

    /// Currencies that appear as either a `from` or `to` of some edge,
    /// sorted ascending for deterministic iteration in tests/diagnostics.
    pub fn currencies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.nodes.keys().map(|s| s.as_str()).collect();
        out.sort_unstable();
        out
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.edges.len()).sum()
    }
}

pub fn fee_for(order: &Order, base_amount: Decimal, raw_quote: Decimal) -> CoreResult<FeeBreakdown> {
    match &order.fee_policy {
        Some(policy) => policy.calculate(order.side, base_amount, raw_quote),
        None => Ok(FeeBreakdown::none()),
    }
}

/// Evaluates a fill at `base_amount`, returning `(grossBaseOrNetBase,
/// quoteSideAmount)` per §4.3's BUY/SELL rules.
pub fn evaluate_fill(
    order: &Order,
    base_amount: Decimal,
    quote_scale: u32,
) -> CoreResult<(Decimal, Decimal)> {
    let raw_quote = order.calculate_quote_amount(base_amount, quote_scale)?;
    let fee = fee_for(order, base_amount, raw_quote)?;
    match order.side {
        Side::Buy => {
            let gross_base = base_amount + fee.base_fee_or_zero();
            let quote_received = raw_quote - fee.quote_fee_or_zero();
            Ok((gross_base, quote_received))
        }
        Side::Sell => {
            let quote_spent = raw_quote + fee.quote_fee_or_zero();
            let net_base = base_amount - fee.base_fee_or_zero();
            Ok((net_base, quote_spent))
        }
    }
}

fn money_interval(
    currency: &str,
    a: Decimal,
    b: Decimal,
    scale: u32,
) -> CoreResult<Interval> {
    let ma = Money::new(currency, a, scale)?;
    let mb = Money::new(currency, b, scale)?;
    let lo = ma.min(&mb)?;
    let hi = ma.max(&mb)?;
    Ok(Interval::new(lo, hi))
}

fn build_segments(
    order: &Order,
    base_scale: u32,
    quote_scale: u32,
) -> CoreResult<Vec<EdgeSegment>> {
    let base = order.asset_pair.base.clone();
    let quote = order.asset_pair.quote.clone();
    let min = order.bounds.min;
    let max = order.bounds.max;

    if min.is_zero() && max.is_zero() {
        let zero_base = money_interval(&base, Decimal::ZERO, Decimal::ZERO, base_scale)?;
        let zero_quote = money_interval(&quote, Decimal::ZERO, Decimal::ZERO, quote_scale)?;
        let segments = vec![EdgeSegment {
            is_mandatory: false,
            base_interval: zero_base.clone(),
            quote_interval: zero_quote.clone(),
            gross_base_interval: zero_base,
        }];
        return Ok(prune_and_sort(&segments, Measure::Base));
    }

    let mut segments = Vec::with_capacity(2);

    if !min.is_zero() {
        let (gross_at_min, quote_at_min) = evaluate_fill(order, min, quote_scale)?;
        segments.push(EdgeSegment {
            is_mandatory: true,
            base_interval: money_interval(&base, min, min, base_scale)?,
            quote_interval: money_interval(&quote, quote_at_min, quote_at_min, quote_scale)?,
            gross_base_interval: money_interval(&base, gross_at_min, gross_at_min, base_scale)?,
        });
    }

    let headroom = max - min;
    if headroom.is_zero() {
        // No optional headroom: zero-capacity optional segment.
        let zero_base = money_interval(&base, Decimal::ZERO, Decimal::ZERO, base_scale)?;
        let zero_quote = money_interval(&quote, Decimal::ZERO, Decimal::ZERO, quote_scale)?;
        segments.push(EdgeSegment {
            is_mandatory: false,
            base_interval: zero_base.clone(),
            quote_interval: zero_quote,
            gross_base_interval: zero_base,
        });
    } else {
        let (gross_at_min, quote_at_min) = if min.is_zero() {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            evaluate_fill(order, min, quote_scale)?
        };
        let (gross_at_max, quote_at_max) = evaluate_fill(order, max, quote_scale)?;
        let gross_headroom = gross_at_max - gross_at_min;
        let quote_headroom = quote_at_max - quote_at_min;
        segments.push(EdgeSegment {
            is_mandatory: false,
            base_interval: money_interval(&base, Decimal::ZERO, headroom, base_scale)?,
            quote_interval: money_interval(&quote, Decimal::ZERO, quote_headroom, quote_scale)?,
            gross_base_interval: money_interval(&base, Decimal::ZERO, gross_headroom, base_scale)?,
        });
    }

    Ok(prune_and_sort(&segments, Measure::Base))
}

/// Builds a `Graph` from an ordered slice of orders. `base_scale` and
/// `quote_scale` govern the precision of the materialised capacity
/// intervals; callers typically use the scale of the currencies involved.
pub fn build_graph(orders: &[Order], base_scale: u32, quote_scale: u32) -> CoreResult<Graph> {
    let mut nodes: AHashMap<String, GraphNode> = AHashMap::new();

    for (index, order) in orders.iter().enumerate() {
        let from = order.from_currency().to_string();
        let to = order.to_currency().to_string();
        let min = order.bounds.min;
        let max = order.bounds.max;

        let (gross_at_min, quote_at_min) = evaluate_fill(order, min, quote_scale)?;
        let (gross_at_max, quote_at_max) = evaluate_fill(order, max, quote_scale)?;

        let base_capacity = money_interval(&order.asset_pair.base, min, max, base_scale)?;
        let quote_capacity = money_interval(
            &order.asset_pair.quote,
            quote_at_min,
            quote_at_max,
            quote_scale,
        )?;
        let gross_base_capacity = money_interval(
            &order.asset_pair.base,
            gross_at_min,
            gross_at_max,
            base_scale,
        )?;

        let segments = build_segments(order, base_scale, quote_scale)?;

        let edge = Arc::new(GraphEdge {
            from: from.clone(),
            to: to.clone(),
            order_index: index,
            rate: order.effective_rate.rate,
            rate_scale: order.effective_rate.scale,
            base_capacity,
            quote_capacity,
            gross_base_capacity,
            segments,
        });

        nodes
            .entry(from.clone())
            .or_insert_with(|| GraphNode {
                currency: from,
                edges: Vec::new(),
            })
            .edges
            .push(edge);

        nodes.entry(to.clone()).or_insert_with(|| GraphNode {
            currency: to,
            edges: Vec::new(),
        });
    }

    Ok(Graph { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::ExchangeRate;
    use crate::orders::types::OrderBounds;
    use crate::orders::AssetPair;
    use rust_decimal_macros::dec;

    fn buy_order(id: u64, min: Decimal, max: Decimal, rate: Decimal) -> Order {
        Order::new(
            id,
            Side::Buy,
            AssetPair::new("USD", "EUR"),
            OrderBounds::new(min, max).unwrap(),
            ExchangeRate::new("USD", "EUR", rate, 6).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn graph_nodes_cover_union_of_from_to() {
        let orders = vec![buy_order(1, dec!(50), dec!(150), dec!(0.92))];
        let graph = build_graph(&orders, 2, 2).unwrap();
        assert!(graph.contains_currency("USD"));
        assert!(graph.contains_currency("EUR"));
        assert_eq!(graph.edges_from("USD").len(), 1);
        assert_eq!(graph.edges_from("USD")[0].from, "USD");
    }

    #[test]
    fn segments_have_one_mandatory_and_headroom_optional() {
        let orders = vec![buy_order(1, dec!(50), dec!(150), dec!(0.92))];
        let graph = build_graph(&orders, 2, 2).unwrap();
        let edge = &graph.edges_from("USD")[0];
        assert_eq!(edge.segments.len(), 2);
        assert!(edge.segments[0].is_mandatory);
        assert!(!edge.segments[1].is_mandatory);
        assert_eq!(edge.segments[1].base_interval.max.amount, dec!(100.00));
    }

    #[test]
    fn zero_min_order_has_single_optional_segment() {
        let orders = vec![buy_order(1, dec!(0), dec!(100), dec!(0.92))];
        let graph = build_graph(&orders, 2, 2).unwrap();
        let edge = &graph.edges_from("USD")[0];
        assert_eq!(edge.segments.len(), 1);
        assert!(!edge.segments[0].is_mandatory);
    }

    #[test]
    fn all_zero_order_has_zero_capacity_optional_segment() {
        let orders = vec![buy_order(1, dec!(0), dec!(0), dec!(0.92))];
        let graph = build_graph(&orders, 2, 2).unwrap();
        let edge = &graph.edges_from("USD")[0];
        assert_eq!(edge.segments.len(), 1);
        assert!(edge.segments[0].base_interval.max.is_zero());
    }
}
