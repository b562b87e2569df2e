//! Result types for queries and mutations

use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// Records returned by query, select, update and delete, with their count
///
/// For update the records are in their post-update state; for delete they
/// are the removed records as they were before removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Records in on-disk order
    pub records: Vec<Record>,
    /// Number of records
    pub count: usize,
}

impl QueryResult {
    /// Creates a result, deriving the count
    pub fn new(records: Vec<Record>) -> Self {
        let count = records.len();
        Self { records, count }
    }

    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no records matched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of results
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns an iterator over the records
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}
