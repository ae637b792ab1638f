//! src/search/state.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::decimal::ops;
use crate::errors::{CoreError, CoreResult};
use crate::graph::GraphEdge;

/// Normalisation scale for `PathCost` and all tolerance/ordering
/// comparisons, per spec.md §3.
pub const COST_SCALE: u32 = 18;

/// A spend window in the source currency, optionally narrowed to a
/// desired amount. `min <= max`; `desired`, if present, lies in
/// `[min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendConstraints {
    pub min: Decimal,
    pub max: Decimal,
    pub desired: Option<Decimal>,
}

impl SpendConstraints {
    pub fn new(min: Decimal, max: Decimal, desired: Option<Decimal>) -> CoreResult<Self> {
        if min > max {
            return Err(CoreError::invalid_input("spend constraints min must be <= max"));
        }
        if let Some(d) = desired {
            if d < min || d > max {
                return Err(CoreError::invalid_input(
                    "desired spend must lie within [min, max]",
                ));
            }
        }
        Ok(Self { min, max, desired })
    }

    /// Projects this range through `rate`, applied to `min`/`max`/`desired`.
    /// Per SPEC_FULL.md's resolution of the open question, the range is
    /// tracked in the *current* intermediate currency and updated at each
    /// hop by applying the edge's effective rate to the incoming bounds.
    pub fn apply_rate(&self, rate: Decimal, scale: u32) -> CoreResult<SpendConstraints> {
        let min = ops::mul_rescale(self.min, rate, scale)?;
        let max = ops::mul_rescale(self.max, rate, scale)?;
        let desired = self
            .desired
            .map(|d| ops::mul_rescale(d, rate, scale))
            .transpose()?;
        SpendConstraints::new(min, max, desired)
    }
}

/// Canonical `a->b->c` sequence of node symbols along a path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RouteSignature(pub String);

impl RouteSignature {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn push(&self, node: &str) -> CoreResult<RouteSignature> {
        let trimmed = node.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_input("route signature node must not be blank"));
        }
        let mut s = self.0.clone();
        if !s.is_empty() {
            s.push_str("->");
        }
        s.push_str(trimmed);
        Ok(RouteSignature(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable fingerprint for dominance keying, distinct from `RouteSignature`.
/// Built from `label:value` segments separated by `|`; neither `|` nor `:`
/// may appear inside a value, and no segment may be blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchStateSignature(pub String);

impl SearchStateSignature {
    pub fn build(segments: &[(&str, String)]) -> CoreResult<Self> {
        let mut parts = Vec::with_capacity(segments.len());
        for (label, value) in segments {
            if label.is_empty() || value.is_empty() {
                return Err(CoreError::invalid_input("signature segment must not be blank"));
            }
            if label.contains('|') || label.contains(':') || value.contains('|') || value.contains(':') {
                return Err(CoreError::invalid_input(
                    "signature segment must not contain '|' or ':'",
                ));
            }
            parts.push(format!("{label}:{value}"));
        }
        Ok(SearchStateSignature(parts.join("|")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One committed hop of a search path: the edge taken, held by `Arc` so
/// states can share the prefix of a path cheaply (SPEC_FULL.md §9
/// "Cyclic or shared state").
pub type PathEdge = Arc<GraphEdge>;

/// A node in the best-first search frontier. Immutable once constructed;
/// transitions produce a new `SearchState`, never mutate in place.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub current_node: String,
    pub cost: Decimal,
    pub product: Decimal,
    pub hops: usize,
    pub path_edges: Arc<Vec<PathEdge>>,
    pub range: Option<SpendConstraints>,
    pub signature: SearchStateSignature,
}

impl SearchState {
    /// The bootstrap state: zero cost, empty path, product of one.
    pub fn bootstrap(
        source: impl Into<String>,
        range: Option<SpendConstraints>,
        signature: SearchStateSignature,
    ) -> Self {
        Self {
            current_node: source.into(),
            cost: Decimal::ZERO,
            product: Decimal::ONE,
            hops: 0,
            path_edges: Arc::new(Vec::new()),
            range,
            signature,
        }
    }

    pub fn route_signature(&self) -> CoreResult<RouteSignature> {
        let mut sig = RouteSignature::empty();
        if let Some(first) = self.path_edges.first() {
            sig = sig.push(&first.from)?;
        } else {
            return sig.push(&self.current_node);
        }
        for edge in self.path_edges.iter() {
            sig = sig.push(&edge.to)?;
        }
        Ok(sig)
    }
}

/// A record of the best costs observed for one (node, signature) pair, used
/// by the dominance registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStateRecord {
    pub cost: Decimal,
    pub hops: usize,
    pub signature: SearchStateSignature,
}

impl SearchStateRecord {
    pub fn from_state(state: &SearchState) -> Self {
        Self {
            cost: state.cost,
            hops: state.hops,
            signature: state.signature.clone(),
        }
    }

    /// `self` dominates `other` iff `self.cost <= other.cost` AND
    /// `self.hops <= other.hops`, with at least one strict.
    pub fn dominates(&self, other: &SearchStateRecord) -> bool {
        let cost_le = self.cost <= other.cost;
        let hops_le = self.hops <= other.hops;
        let strictly_better = self.cost < other.cost || self.hops < other.hops;
        cost_le && hops_le && strictly_better
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn signature_rejects_blank_segments() {
        assert!(SearchStateSignature::build(&[("min", String::new())]).is_err());
    }

    #[test]
    fn signature_rejects_forbidden_characters() {
        assert!(SearchStateSignature::build(&[("min", "1|2".to_string())]).is_err());
        assert!(SearchStateSignature::build(&[("min", "1:2".to_string())]).is_err());
    }

    #[test]
    fn route_signature_joins_with_arrow() {
        let sig = RouteSignature::empty().push("USD").unwrap().push("EUR").unwrap();
        assert_eq!(sig.as_str(), "USD->EUR");
    }

    #[test]
    fn dominance_requires_le_both_and_strict_one() {
        let sig = SearchStateSignature::build(&[("min", "1".into())]).unwrap();
        let a = SearchStateRecord {
            cost: dec!(10),
            hops: 2,
            signature: sig.clone(),
        };
        let b = SearchStateRecord {
            cost: dec!(10),
            hops: 2,
            signature: sig.clone(),
        };
        assert!(!a.dominates(&b), "identical records do not dominate");

        let cheaper = SearchStateRecord {
            cost: dec!(9),
            hops: 2,
            signature: sig,
        };
        assert!(cheaper.dominates(&a));
        assert!(!a.dominates(&cheaper));
    }

    #[test]
    fn spend_constraints_reject_desired_out_of_range() {
        assert!(SpendConstraints::new(dec!(10), dec!(100), Some(dec!(5))).is_err());
        assert!(SpendConstraints::new(dec!(10), dec!(100), Some(dec!(50))).is_ok());
    }
}
