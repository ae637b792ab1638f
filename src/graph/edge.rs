//! src/graph/edge.rs

use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::orders::Order;

/// A closed interval `[min, max]` of `Money` amounts in one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub min: Money,
    pub max: Money,
}

impl Interval {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    /// Intersects two intervals in the same currency. Returns `None` when
    /// the intersection is empty.
    pub fn intersect(&self, other: &Interval) -> crate::errors::CoreResult<Option<Interval>> {
        let lo = self.min.max(&other.min)?;
        let hi = self.max.min(&other.max)?;
        if lo.compare(&hi)?.is_gt() {
            Ok(None)
        } else {
            Ok(Some(Interval::new(lo, hi)))
        }
    }
}

/// A portion of an edge's capacity. Exactly one mandatory segment (the
/// order's `min`) precedes any number of optional segments (the headroom
/// between `min` and `max`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSegment {
    pub is_mandatory: bool,
    pub base_interval: Interval,
    pub quote_interval: Interval,
    pub gross_base_interval: Interval,
}

/// The measure a segment pruner or capacity check is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Base,
    Quote,
    GrossBase,
}

impl EdgeSegment {
    pub fn interval_for(&self, measure: Measure) -> &Interval {
        match measure {
            Measure::Base => &self.base_interval,
            Measure::Quote => &self.quote_interval,
            Measure::GrossBase => &self.gross_base_interval,
        }
    }
}

/// A directed offer to convert `from` into `to`, derived from a single
/// order. Direction is determined by the order's side.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub order_index: usize,
    pub rate: Decimal,
    pub rate_scale: u32,
    pub base_capacity: Interval,
    pub quote_capacity: Interval,
    pub gross_base_capacity: Interval,
    pub segments: Vec<EdgeSegment>,
}

impl GraphEdge {
    pub fn order<'a>(&self, orders: &'a [Order]) -> &'a Order {
        &orders[self.order_index]
    }

    /// The capacity interval appropriate to the measure the caller is
    /// propagating a spend range through.
    pub fn capacity_for(&self, measure: Measure) -> &Interval {
        match measure {
            Measure::Base => &self.base_capacity,
            Measure::Quote => &self.quote_capacity,
            Measure::GrossBase => &self.gross_base_capacity,
        }
    }
}
