//! Metrics registry for csvstore
//!
//! - Counters only
//! - Monotonic increase
//! - One registry per store, reset when the store is opened

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operation counters for one store
///
/// Relaxed atomics: counters are exact once all callers have returned, but
/// are not ordered with respect to the table files.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Tables created
    tables_created: AtomicU64,
    /// Records appended by insert
    records_inserted: AtomicU64,
    /// Records changed by update
    records_updated: AtomicU64,
    /// Records removed by delete
    records_deleted: AtomicU64,
    /// Query, select and sorted-range calls that succeeded
    queries_executed: AtomicU64,
    /// Operations that returned an error
    operations_failed: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment tables created
    pub fn increment_tables_created(&self) {
        self.tables_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment records inserted
    pub fn increment_records_inserted(&self) {
        self.records_inserted.fetch_add(1, Ordering::Relaxed);
    }

    /// Add to records updated
    pub fn add_records_updated(&self, count: u64) {
        self.records_updated.fetch_add(count, Ordering::Relaxed);
    }

    /// Add to records deleted
    pub fn add_records_deleted(&self, count: u64) {
        self.records_deleted.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment queries executed
    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment failed operations
    pub fn increment_operations_failed(&self) {
        self.operations_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tables_created: self.tables_created.load(Ordering::Relaxed),
            records_inserted: self.records_inserted.load(Ordering::Relaxed),
            records_updated: self.records_updated.load(Ordering::Relaxed),
            records_deleted: self.records_deleted.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            operations_failed: self.operations_failed.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub tables_created: u64,
    pub records_inserted: u64,
    pub records_updated: u64,
    pub records_deleted: u64,
    pub queries_executed: u64,
    pub operations_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_tables_created();
        registry.increment_records_inserted();
        registry.increment_records_inserted();
        registry.add_records_updated(3);
        registry.add_records_deleted(0);
        registry.increment_queries_executed();
        registry.increment_operations_failed();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.tables_created, 1);
        assert_eq!(snapshot.records_inserted, 2);
        assert_eq!(snapshot.records_updated, 3);
        assert_eq!(snapshot.records_deleted, 0);
        assert_eq!(snapshot.queries_executed, 1);
        assert_eq!(snapshot.operations_failed, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let registry = MetricsRegistry::new();
        registry.add_records_deleted(4);

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["records_deleted"], 4);
        assert_eq!(json["tables_created"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_records_inserted();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().records_inserted, 1000);
    }
}
