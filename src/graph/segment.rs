//! src/graph/segment.rs
//!
//! Per-edge segment pruning: drops uninteresting optional segments and
//! sorts what remains into a canonical, deterministic order. Pruning is a
//! pure function of its inputs.

use crate::graph::edge::{EdgeSegment, Measure};

/// Prunes and sorts `segments` for the given `measure`.
///
/// - If the total optional headroom under `measure` is zero, all optional
///   segments are dropped.
/// - Otherwise, any optional segment whose `max` under `measure` is zero
///   is dropped.
/// - Remaining segments are sorted mandatory-first, then by descending
///   max capacity, then descending min capacity; ties preserve the
///   relative input order (a stable sort).
pub fn prune_and_sort(segments: &[EdgeSegment], measure: Measure) -> Vec<EdgeSegment> {
    let total_optional_headroom: bool = segments
        .iter()
        .filter(|s| !s.is_mandatory)
        .any(|s| !s.interval_for(measure).max.is_zero());

    let mut kept: Vec<EdgeSegment> = segments
        .iter()
        .filter(|s| {
            if s.is_mandatory {
                true
            } else if !total_optional_headroom {
                false
            } else {
                !s.interval_for(measure).max.is_zero()
            }
        })
        .cloned()
        .collect();

    kept.sort_by(|a, b| {
        match (a.is_mandatory, b.is_mandatory) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => {
                let a_max = &a.interval_for(measure).max.amount;
                let b_max = &b.interval_for(measure).max.amount;
                let a_min = &a.interval_for(measure).min.amount;
                let b_min = &b.interval_for(measure).min.amount;
                b_max.cmp(a_max).then_with(|| b_min.cmp(a_min))
            }
        }
    });

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::graph::edge::Interval;
    use rust_decimal_macros::dec;

    fn seg(is_mandatory: bool, base_min: rust_decimal::Decimal, base_max: rust_decimal::Decimal) -> EdgeSegment {
        let zero = Money::new("USD", dec!(0), 2).unwrap();
        let interval = Interval::new(
            Money::new("USD", base_min, 2).unwrap(),
            Money::new("USD", base_max, 2).unwrap(),
        );
        EdgeSegment {
            is_mandatory,
            base_interval: interval.clone(),
            quote_interval: Interval::new(zero.clone(), zero.clone()),
            gross_base_interval: interval,
        }
    }

    #[test]
    fn drops_all_optional_when_total_headroom_zero() {
        let segments = vec![seg(true, dec!(50), dec!(50)), seg(false, dec!(0), dec!(0))];
        let out = prune_and_sort(&segments, Measure::Base);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_mandatory);
    }

    #[test]
    fn mandatory_precedes_optional_after_sort() {
        let segments = vec![seg(false, dec!(0), dec!(100)), seg(true, dec!(50), dec!(50))];
        let out = prune_and_sort(&segments, Measure::Base);
        assert!(out[0].is_mandatory);
        assert!(!out[1].is_mandatory);
    }

    #[test]
    fn optionals_sort_by_descending_max_then_min() {
        let segments = vec![
            seg(false, dec!(0), dec!(50)),
            seg(false, dec!(10), dec!(100)),
            seg(false, dec!(5), dec!(100)),
        ];
        let out = prune_and_sort(&segments, Measure::Base);
        assert_eq!(out[0].base_interval.min.amount, dec!(10.00));
        assert_eq!(out[1].base_interval.min.amount, dec!(5.00));
        assert_eq!(out[2].base_interval.max.amount, dec!(50.00));
    }
}
