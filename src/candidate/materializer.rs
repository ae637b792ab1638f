//! src/candidate/materializer.rs
//!
//! Walks a winning path forward from its initial spend, computing each
//! leg's realised spent/received/fees, per spec.md §4.9. Grounded on the
//! teacher's leg-walking pattern in `src/arbitrage/simulate.rs`, which
//! chains a starting amount through a sequence of pool swaps the same way
//! this chains a spend through a sequence of order fills.

use crate::candidate::types::{CandidatePath, PathLeg, PathResult};
use crate::decimal::ops;
use crate::decimal::{Money, MoneyMap};
use crate::errors::CoreResult;
use crate::graph::{evaluate_fill, fee_for};
use crate::orders::{Order, Side};

/// Materialises `candidate` into a `PathResult`, or `None` if the path has
/// no edges (a trivial self-path) or any leg falls outside its order's
/// fill bounds — a "no candidate" outcome per §4.9's error conditions,
/// not a hard error.
pub fn materialize(
    candidate: &CandidatePath,
    orders: &[Order],
    initial_spend: rust_decimal::Decimal,
    residual_tolerance: rust_decimal::Decimal,
) -> CoreResult<Option<PathResult>> {
    if candidate.path_edges.is_empty() {
        return Ok(None);
    }

    let mut legs = Vec::with_capacity(candidate.path_edges.len());
    let mut fee_breakdown = MoneyMap::new();
    let mut current_spend = initial_spend;

    for edge in candidate.path_edges.iter() {
        let order = edge.order(orders);
        let base_scale = edge.base_capacity.min.scale;
        let quote_scale = edge.quote_capacity.min.scale;

        let base_amount = match order.side {
            Side::Buy => current_spend,
            Side::Sell => ops::div_rescale(current_spend, order.effective_rate.rate, base_scale)?,
        };

        if !order.validate_partial_fill(base_amount) {
            return Ok(None);
        }
        if base_amount.is_sign_negative() {
            return Ok(None);
        }

        let raw_quote = order.calculate_quote_amount(base_amount, quote_scale)?;
        let fee = fee_for(order, base_amount, raw_quote)?;
        let (gross_or_net_base, quote_side) = evaluate_fill(order, base_amount, quote_scale)?;

        let (spent_amount, spent_currency, received_amount, received_currency) = match order.side {
            Side::Buy => (
                gross_or_net_base,
                order.asset_pair.base.clone(),
                quote_side,
                order.asset_pair.quote.clone(),
            ),
            Side::Sell => (
                quote_side,
                order.asset_pair.quote.clone(),
                gross_or_net_base,
                order.asset_pair.base.clone(),
            ),
        };

        if spent_amount.is_sign_negative() || received_amount.is_sign_negative() {
            return Ok(None);
        }

        let spent = Money::new(spent_currency, spent_amount, base_scale.max(quote_scale))?;
        let received = Money::new(received_currency, received_amount, base_scale.max(quote_scale))?;

        let mut leg_fees = MoneyMap::new();
        if let Some(bf) = fee.base_fee {
            leg_fees.add(Money::new(order.asset_pair.base.clone(), bf, base_scale)?)?;
            fee_breakdown.add(Money::new(order.asset_pair.base.clone(), bf, base_scale)?)?;
        }
        if let Some(qf) = fee.quote_fee {
            leg_fees.add(Money::new(order.asset_pair.quote.clone(), qf, quote_scale)?)?;
            fee_breakdown.add(Money::new(order.asset_pair.quote.clone(), qf, quote_scale)?)?;
        }

        current_spend = received.amount;

        legs.push(PathLeg {
            from: edge.from.clone(),
            to: edge.to.clone(),
            spent,
            received,
            fees: leg_fees,
        });
    }

    let total_spent = legs.first().unwrap().spent.clone();
    let total_received = legs.last().unwrap().received.clone();

    Ok(Some(PathResult {
        total_spent,
        total_received,
        residual_tolerance,
        fee_breakdown,
        legs,
    }))
}
