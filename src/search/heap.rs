//! src/search/heap.rs
//!
//! Min-heap over `(cost, hops, route signature, insertion order)` with a
//! strict total order, built on the `priority-queue` crate (already part
//! of the teacher's dependency graph). `priority-queue::PriorityQueue`
//! pops the *maximum* priority item and de-duplicates by item identity, so
//! two adaptations are made: priorities are wrapped in `Reverse` to turn
//! max-first into min-first, and queue items are identified solely by
//! their (unique, monotonically increasing) insertion order so that two
//! states which happen to be otherwise equal never collapse into one slot.

use std::cmp::Reverse;

use priority_queue::PriorityQueue;
use rust_decimal::Decimal;

use crate::search::state::{RouteSignature, SearchState};

pub type InsertionOrder = u64;

/// The four-level ordering key from spec.md §4.6.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchStatePriority {
    pub cost: Decimal,
    pub hops: usize,
    pub route_signature: String,
    pub insertion_order: InsertionOrder,
}

impl SearchStatePriority {
    pub fn new(cost: Decimal, hops: usize, route_signature: &RouteSignature, insertion_order: InsertionOrder) -> Self {
        Self {
            cost,
            hops,
            route_signature: route_signature.as_str().to_string(),
            insertion_order,
        }
    }
}

#[derive(Debug, Clone)]
struct QueueItem {
    state: SearchState,
    insertion_order: InsertionOrder,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.insertion_order == other.insertion_order
    }
}
impl Eq for QueueItem {}

impl std::hash::Hash for QueueItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.insertion_order.hash(state);
    }
}

/// A min-heap of `SearchState`s ordered by `SearchStatePriority`.
#[derive(Debug, Default)]
pub struct SearchHeap {
    inner: PriorityQueue<QueueItem, Reverse<SearchStatePriority>>,
}

impl SearchHeap {
    pub fn new() -> Self {
        Self {
            inner: PriorityQueue::new(),
        }
    }

    pub fn push(&mut self, state: SearchState, priority: SearchStatePriority) {
        let item = QueueItem {
            insertion_order: priority.insertion_order,
            state,
        };
        self.inner.push(item, Reverse(priority));
    }

    pub fn pop(&mut self) -> Option<SearchState> {
        self.inner.pop().map(|(item, _)| item.state)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}
