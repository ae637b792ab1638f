//! src/search/guards.rs
//!
//! The three guard rails from spec.md §4.7: expansion count, distinct
//! visited-state count, and an optional wall-clock time budget. Checked
//! before every expansion.

use std::time::Instant;

use serde::Serialize;

/// Guard limits supplied by the caller. `max_expansions` and
/// `max_visited_states` are hard counters; `time_budget_ms`, if set, bounds
/// wall-clock elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct GuardLimits {
    pub max_expansions: u64,
    pub max_visited_states: u64,
    pub time_budget_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct GuardLimitsReport {
    pub expansions: u64,
    pub visited_states: u64,
    pub time_budget_ms: Option<u64>,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct GuardMetricsReport {
    pub expansions: u64,
    pub visited_states: u64,
    pub elapsed_ms: f64,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct GuardBreachReport {
    pub expansions: bool,
    pub visited_states: bool,
    pub time_budget: bool,
    pub any: bool,
}

#[derive(Debug, Serialize, Clone, Copy)]
pub struct SearchGuardReport {
    pub limits: GuardLimitsReport,
    pub metrics: GuardMetricsReport,
    pub breached: GuardBreachReport,
}

/// Mutable counters the engine updates as it runs. Not `Clone`: there is
/// exactly one guard instance per search.
#[derive(Debug)]
pub struct SearchGuards {
    limits: GuardLimits,
    expansion_count: u64,
    visited_state_count: u64,
    started_at: Instant,
    /// Set once `visited_state_count` would have exceeded
    /// `max_visited_states` for a genuinely new (node, signature) key.
    visited_guard_reached: bool,
}

impl SearchGuards {
    pub fn new(limits: GuardLimits) -> Self {
        Self {
            limits,
            expansion_count: 0,
            visited_state_count: 0,
            started_at: Instant::now(),
            visited_guard_reached: false,
        }
    }

    fn elapsed_ms(&self) -> u128 {
        self.started_at.elapsed().as_millis()
    }

    /// False if any limit is currently reached.
    pub fn can_expand(&self) -> bool {
        if self.expansion_count >= self.limits.max_expansions {
            return false;
        }
        if self.visited_state_count >= self.limits.max_visited_states {
            return false;
        }
        if let Some(budget) = self.limits.time_budget_ms {
            if self.elapsed_ms() as u64 >= budget {
                return false;
            }
        }
        true
    }

    pub fn record_expansion(&mut self) {
        self.expansion_count += 1;
    }

    /// Attempts to admit one newly visited (node, signature) key. Returns
    /// `true` if admitted; `false` (and sets the breach flag) if doing so
    /// would exceed `max_visited_states`.
    pub fn try_admit_visited_state(&mut self) -> bool {
        if self.visited_state_count >= self.limits.max_visited_states {
            self.visited_guard_reached = true;
            return false;
        }
        self.visited_state_count += 1;
        true
    }

    pub fn expansion_count(&self) -> u64 {
        self.expansion_count
    }

    pub fn finalize(&self) -> SearchGuardReport {
        let elapsed_ms = self.started_at.elapsed().as_secs_f64() * 1000.0;
        let expansions_breached = self.expansion_count >= self.limits.max_expansions;
        let visited_breached = self.visited_state_count >= self.limits.max_visited_states
            || self.visited_guard_reached;
        let time_breached = self
            .limits
            .time_budget_ms
            .map(|budget| elapsed_ms >= budget as f64)
            .unwrap_or(false);
        let any = expansions_breached || visited_breached || time_breached;

        SearchGuardReport {
            limits: GuardLimitsReport {
                expansions: self.limits.max_expansions,
                visited_states: self.limits.max_visited_states,
                time_budget_ms: self.limits.time_budget_ms,
            },
            metrics: GuardMetricsReport {
                expansions: self.expansion_count,
                visited_states: self.visited_state_count,
                elapsed_ms,
            },
            breached: GuardBreachReport {
                expansions: expansions_breached,
                visited_states: visited_breached,
                time_budget: time_breached,
                any,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_expansion_limit_stops_immediately_with_breach() {
        let mut guards = SearchGuards::new(GuardLimits {
            max_expansions: 0,
            max_visited_states: 100,
            time_budget_ms: None,
        });
        assert!(!guards.can_expand());
        guards.record_expansion();
        let report = guards.finalize();
        assert!(report.breached.expansions);
        assert!(report.breached.any);
    }

    #[test]
    fn visited_state_guard_trips_on_exhaustion() {
        let mut guards = SearchGuards::new(GuardLimits {
            max_expansions: 100,
            max_visited_states: 1,
            time_budget_ms: None,
        });
        assert!(guards.try_admit_visited_state());
        assert!(!guards.try_admit_visited_state());
        let report = guards.finalize();
        assert!(report.breached.visited_states);
    }

    #[test]
    fn unset_time_budget_never_breaches() {
        let guards = SearchGuards::new(GuardLimits {
            max_expansions: 10,
            max_visited_states: 10,
            time_budget_ms: None,
        });
        let report = guards.finalize();
        assert!(!report.breached.time_budget);
    }

    #[test]
    fn positive_limits_not_reached_do_not_breach() {
        let mut guards = SearchGuards::new(GuardLimits {
            max_expansions: 5,
            max_visited_states: 5,
            time_budget_ms: None,
        });
        guards.record_expansion();
        let report = guards.finalize();
        assert!(!report.breached.expansions);
        assert!(!report.breached.any);
    }
}
