//! src/search/registry.rs
//!
//! The dominance registry: for each `(node, signature)` pair, the set of
//! currently non-dominated `SearchStateRecord`s. Logically immutable —
//! `register` returns a new registry; unaffected `(node, signature)`
//! buckets are `Arc`-shared rather than deep-copied, per SPEC_FULL.md §4.

use std::sync::Arc;

use ahash::AHashMap;

use crate::search::state::{SearchStateRecord, SearchStateSignature};

type Bucket = Arc<Vec<SearchStateRecord>>;

#[derive(Debug, Clone, Default)]
pub struct DominanceRegistry {
    nodes: AHashMap<String, AHashMap<SearchStateSignature, Bucket>>,
}

impl DominanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_signature(&self, node: &str, signature: &SearchStateSignature) -> bool {
        self.nodes
            .get(node)
            .map(|sigs| sigs.contains_key(signature))
            .unwrap_or(false)
    }

    /// Returns true if any record currently registered at
    /// `(node, signature)` dominates `candidate`.
    pub fn is_dominated(
        &self,
        node: &str,
        signature: &SearchStateSignature,
        candidate: &SearchStateRecord,
    ) -> bool {
        self.nodes
            .get(node)
            .and_then(|sigs| sigs.get(signature))
            .map(|bucket| bucket.iter().any(|existing| existing.dominates(candidate)))
            .unwrap_or(false)
    }

    /// Registers `new_record` at `(node, signature)` if it is not
    /// dominated by any currently-admitted record there. Any admitted
    /// record that `new_record` itself dominates is evicted. Returns the
    /// updated registry and `delta = 1` iff `(node, signature)` was newly
    /// populated (it had zero records before this call).
    pub fn register(
        &self,
        node: &str,
        new_record: SearchStateRecord,
    ) -> (DominanceRegistry, u8) {
        let signature = new_record.signature.clone();
        let existing_bucket = self
            .nodes
            .get(node)
            .and_then(|sigs| sigs.get(&signature))
            .cloned();

        let was_new_key = existing_bucket
            .as_ref()
            .map(|b| b.is_empty())
            .unwrap_or(true);

        if let Some(bucket) = &existing_bucket {
            if bucket.iter().any(|existing| existing.dominates(&new_record)) {
                return (self.clone(), 0);
            }
        }

        let mut updated: Vec<SearchStateRecord> = existing_bucket
            .as_ref()
            .map(|b| b.as_ref().clone())
            .unwrap_or_default();
        updated.retain(|existing| !new_record.dominates(existing));
        updated.push(new_record);

        let mut next = self.clone();
        next.nodes
            .entry(node.to_string())
            .or_default()
            .insert(signature, Arc::new(updated));

        let delta = if was_new_key { 1 } else { 0 };
        (next, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sig(v: &str) -> SearchStateSignature {
        SearchStateSignature::build(&[("range", v.to_string())]).unwrap()
    }

    fn record(cost: rust_decimal::Decimal, hops: usize, signature: SearchStateSignature) -> SearchStateRecord {
        SearchStateRecord {
            cost,
            hops,
            signature,
        }
    }

    #[test]
    fn first_register_is_a_new_key() {
        let reg = DominanceRegistry::new();
        let (reg2, delta) = reg.register("USD", record(dec!(10), 1, sig("a")));
        assert_eq!(delta, 1);
        assert!(reg2.has_signature("USD", &sig("a")));
    }

    #[test]
    fn dominated_candidate_is_rejected_with_zero_delta() {
        let reg = DominanceRegistry::new();
        let (reg, _) = reg.register("USD", record(dec!(5), 1, sig("a")));
        let (reg2, delta) = reg.register("USD", record(dec!(10), 2, sig("a")));
        assert_eq!(delta, 0);
        assert!(reg2.is_dominated("USD", &sig("a"), &record(dec!(10), 2, sig("a"))));
    }

    #[test]
    fn admitting_a_dominating_record_evicts_the_old_one() {
        let reg = DominanceRegistry::new();
        let (reg, _) = reg.register("USD", record(dec!(10), 2, sig("a")));
        let (reg2, delta) = reg.register("USD", record(dec!(5), 1, sig("a")));
        assert_eq!(delta, 0, "same key already populated");
        assert!(!reg2.is_dominated("USD", &sig("a"), &record(dec!(5), 1, sig("a"))));
        // Old record evicted: a fresh candidate matching the old cost/hops
        // is now dominated only by the new, cheaper record, not surviving
        // as a separate admitted entry.
        assert!(reg2.is_dominated("USD", &sig("a"), &record(dec!(10), 2, sig("a"))));
    }

    #[test]
    fn equal_signature_different_node_is_independent() {
        let reg = DominanceRegistry::new();
        let (reg, _) = reg.register("USD", record(dec!(5), 1, sig("a")));
        assert!(!reg.has_signature("EUR", &sig("a")));
    }
}
