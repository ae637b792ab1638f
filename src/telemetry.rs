//! src/telemetry.rs
//!
//! Structured logging + process-wide counters, adapted from the teacher's
//! `telemetry::init_telemetry()`/`Metrics` (itself already stripped of its
//! Prometheus exporter in favour of bare `tracing_subscriber`). Counters
//! here track search-level activity rather than trade execution.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug)]
pub struct Metrics {
    pub searches_run: Arc<AtomicU64>,
    pub paths_found: Arc<AtomicU64>,
    pub guard_breaches: Arc<AtomicU64>,
    pub candidates_rejected_by_predicate: Arc<AtomicU64>,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            searches_run: Arc::new(AtomicU64::new(0)),
            paths_found: Arc::new(AtomicU64::new(0)),
            guard_breaches: Arc::new(AtomicU64::new(0)),
            candidates_rejected_by_predicate: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn inc_searches_run(&self) {
        self.searches_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_paths_found(&self, count: u64) {
        self.paths_found.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_guard_breaches(&self) {
        self.guard_breaches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_candidates_rejected_by_predicate(&self) {
        self.candidates_rejected_by_predicate
            .fetch_add(1, Ordering::Relaxed);
    }
}

pub fn init_telemetry() -> Arc<Metrics> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let formatting_layer = fmt::layer().pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
        .init();

    Metrics::new()
}
