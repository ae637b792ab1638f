//! src/results/ordering.rs
//!
//! The ordering key a candidate path is ranked by, and the strategy
//! abstraction over it (spec.md §9 "Polymorphism": a small, pure,
//! closed-or-registered capability, alongside `FeePolicy`).

use std::cmp::Ordering;
use std::fmt::Debug;

use rust_decimal::Decimal;

use crate::decimal::ops;
use crate::search::state::COST_SCALE;

/// The four-level ranking key from spec.md §4.6/§4.10: cost, hops, route
/// signature, insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathOrderKey {
    pub cost: Decimal,
    pub hops: usize,
    pub route_signature: String,
    pub insertion_order: u64,
}

/// Compares two path-order keys. Implementations must be pure and total.
pub trait PathOrderStrategy: Debug {
    fn compare(&self, a: &PathOrderKey, b: &PathOrderKey) -> Ordering;
}

/// The default strategy named in §4.10: cost ascending at scale 18, then
/// hops ascending, then route signature string order, then insertion
/// order — the last of which makes the order total for otherwise-tied keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPathOrderStrategy;

impl PathOrderStrategy for DefaultPathOrderStrategy {
    fn compare(&self, a: &PathOrderKey, b: &PathOrderKey) -> Ordering {
        let cost_order = ops::compare_at(a.cost, b.cost, COST_SCALE).unwrap_or(Ordering::Equal);
        cost_order
            .then_with(|| a.hops.cmp(&b.hops))
            .then_with(|| a.route_signature.cmp(&b.route_signature))
            .then_with(|| a.insertion_order.cmp(&b.insertion_order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn key(cost: Decimal, hops: usize, sig: &str, order: u64) -> PathOrderKey {
        PathOrderKey {
            cost,
            hops,
            route_signature: sig.to_string(),
            insertion_order: order,
        }
    }

    #[test]
    fn orders_by_cost_first() {
        let s = DefaultPathOrderStrategy;
        let cheap = key(dec!(10), 3, "Z", 5);
        let expensive = key(dec!(20), 1, "A", 0);
        assert_eq!(s.compare(&cheap, &expensive), Ordering::Less);
    }

    #[test]
    fn ties_on_cost_break_by_hops_then_signature_then_insertion() {
        let s = DefaultPathOrderStrategy;
        let a = key(dec!(10), 1, "B", 1);
        let b = key(dec!(10), 1, "A", 0);
        assert_eq!(s.compare(&a, &b), Ordering::Greater, "B > A lexicographically");

        let c = key(dec!(10), 1, "A", 0);
        let d = key(dec!(10), 1, "A", 1);
        assert_eq!(s.compare(&c, &d), Ordering::Less, "lower insertion order wins on full tie");
    }
}
