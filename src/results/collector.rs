//! src/results/collector.rs
//!
//! Top-K collector: maintains up to K accepted paths ordered by a
//! `PathOrderStrategy`, evicting the current maximum when a strictly
//! better candidate arrives at capacity (spec.md §4.10).

use crate::candidate::PathResult;
use crate::results::ordering::{PathOrderKey, PathOrderStrategy};

struct Entry {
    key: PathOrderKey,
    result: PathResult,
}

pub struct TopKCollector<S: PathOrderStrategy> {
    k: usize,
    strategy: S,
    entries: Vec<Entry>,
}

impl<S: PathOrderStrategy> TopKCollector<S> {
    pub fn new(k: usize, strategy: S) -> Self {
        Self {
            k,
            strategy,
            entries: Vec::new(),
        }
    }

    fn position_of(&self, key: &PathOrderKey) -> usize {
        self.entries
            .iter()
            .position(|e| self.strategy.compare(key, &e.key).is_lt())
            .unwrap_or(self.entries.len())
    }

    /// Offers a new candidate. Returns `true` if it was admitted (inserted,
    /// possibly evicting the prior maximum).
    pub fn offer(&mut self, key: PathOrderKey, result: PathResult) -> bool {
        if self.entries.len() < self.k {
            let idx = self.position_of(&key);
            self.entries.insert(idx, Entry { key, result });
            return true;
        }
        let Some(max_idx) = self.max_index() else {
            return false;
        };
        if self.strategy.compare(&key, &self.entries[max_idx].key).is_lt() {
            self.entries.remove(max_idx);
            let idx = self.position_of(&key);
            self.entries.insert(idx, Entry { key, result });
            true
        } else {
            false
        }
    }

    fn max_index(&self) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        let mut max_idx = 0;
        for i in 1..self.entries.len() {
            if self
                .strategy
                .compare(&self.entries[i].key, &self.entries[max_idx].key)
                .is_gt()
            {
                max_idx = i;
            }
        }
        Some(max_idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the collector in ascending order.
    pub fn into_results(self) -> Vec<PathResult> {
        self.entries.into_iter().map(|e| e.result).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::decimal::MoneyMap;
    use crate::results::ordering::DefaultPathOrderStrategy;
    use rust_decimal_macros::dec;

    fn key(cost: rust_decimal::Decimal, order: u64) -> PathOrderKey {
        PathOrderKey {
            cost,
            hops: 1,
            route_signature: format!("k{order}"),
            insertion_order: order,
        }
    }

    fn dummy_result() -> PathResult {
        PathResult {
            total_spent: Money::new("USD", dec!(1), 2).unwrap(),
            total_received: Money::new("EUR", dec!(1), 2).unwrap(),
            residual_tolerance: dec!(0),
            fee_breakdown: MoneyMap::new(),
            legs: Vec::new(),
        }
    }

    #[test]
    fn admits_while_under_capacity() {
        let mut collector = TopKCollector::new(2, DefaultPathOrderStrategy);
        assert!(collector.offer(key(dec!(10), 0), dummy_result()));
        assert!(collector.offer(key(dec!(5), 1), dummy_result()));
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn evicts_max_when_strictly_better_arrives_at_capacity() {
        let mut collector = TopKCollector::new(1, DefaultPathOrderStrategy);
        collector.offer(key(dec!(10), 0), dummy_result());
        let admitted = collector.offer(key(dec!(5), 1), dummy_result());
        assert!(admitted);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn drops_candidate_no_better_than_current_max_at_capacity() {
        let mut collector = TopKCollector::new(1, DefaultPathOrderStrategy);
        collector.offer(key(dec!(5), 0), dummy_result());
        let admitted = collector.offer(key(dec!(10), 1), dummy_result());
        assert!(!admitted);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn results_are_emitted_in_ascending_order() {
        let mut collector = TopKCollector::new(3, DefaultPathOrderStrategy);
        collector.offer(key(dec!(30), 0), dummy_result());
        collector.offer(key(dec!(10), 1), dummy_result());
        collector.offer(key(dec!(20), 2), dummy_result());
        let results = collector.into_results();
        assert_eq!(results.len(), 3);
    }
}
