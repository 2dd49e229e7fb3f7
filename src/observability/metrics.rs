//! Metrics registry
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Relaxed atomics; exactness across threads is not required

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the DAS server
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    instances_registered: AtomicU64,
    registrations_reused: AtomicU64,
    registrations_rejected: AtomicU64,
    instances_unregistered: AtomicU64,
    not_found: AtomicU64,
    table_calls: AtomicU64,
    executions_started: AtomicU64,
    executions_completed: AtomicU64,
    executions_cancelled: AtomicU64,
    batches_emitted: AtomicU64,
    rows_emitted: AtomicU64,
    mutations_rejected: AtomicU64,
}

impl MetricsRegistry {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Registration

    pub fn increment_registered(&self) {
        self.instances_registered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reused(&self) {
        self.registrations_reused.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.registrations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_unregistered(&self) {
        self.instances_unregistered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    // Table calls

    pub fn increment_table_calls(&self) {
        self.table_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_executions_started(&self) {
        self.executions_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finalized stream
    pub fn record_stream(&self, cancelled: bool, batches: u64, rows: u64) {
        if cancelled {
            self.executions_cancelled.fetch_add(1, Ordering::Relaxed);
        } else {
            self.executions_completed.fetch_add(1, Ordering::Relaxed);
        }
        self.batches_emitted.fetch_add(batches, Ordering::Relaxed);
        self.rows_emitted.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_mutations_rejected(&self) {
        self.mutations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            instances_registered: self.instances_registered.load(Ordering::Relaxed),
            registrations_reused: self.registrations_reused.load(Ordering::Relaxed),
            registrations_rejected: self.registrations_rejected.load(Ordering::Relaxed),
            instances_unregistered: self.instances_unregistered.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            table_calls: self.table_calls.load(Ordering::Relaxed),
            executions_started: self.executions_started.load(Ordering::Relaxed),
            executions_completed: self.executions_completed.load(Ordering::Relaxed),
            executions_cancelled: self.executions_cancelled.load(Ordering::Relaxed),
            batches_emitted: self.batches_emitted.load(Ordering::Relaxed),
            rows_emitted: self.rows_emitted.load(Ordering::Relaxed),
            mutations_rejected: self.mutations_rejected.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub instances_registered: u64,
    pub registrations_reused: u64,
    pub registrations_rejected: u64,
    pub instances_unregistered: u64,
    pub not_found: u64,
    pub table_calls: u64,
    pub executions_started: u64,
    pub executions_completed: u64,
    pub executions_cancelled: u64,
    pub batches_emitted: u64,
    pub rows_emitted: u64,
    pub mutations_rejected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_zeroed() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.instances_registered, 0);
        assert_eq!(snapshot.rows_emitted, 0);
    }

    #[test]
    fn test_record_stream_splits_outcomes() {
        let registry = MetricsRegistry::new();
        registry.record_stream(false, 2, 10);
        registry.record_stream(true, 1, 5);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.executions_completed, 1);
        assert_eq!(snapshot.executions_cancelled, 1);
        assert_eq!(snapshot.batches_emitted, 3);
        assert_eq!(snapshot.rows_emitted, 15);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.increment_registered();
        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["instances_registered"], 1);
    }
}
