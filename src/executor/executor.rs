//! Query executor for csvstore
//!
//! Runs over a table already loaded in memory. The caller holds whatever
//! lock the operation needs; nothing here touches the file.
//!
//! Execution order:
//! 1. Filter records by conditions (AND)
//! 2. Project columns (select only)
//! 3. Sort and apply limit (sorted range only)

use super::condition::{QueryCondition, SortOrder};
use super::filters::ConditionMatcher;
use super::result::QueryResult;
use super::sorter::ResultSorter;
use crate::storage::{Record, StoreError, StoreResult, TableContents};

/// Executes read operations against one loaded table
pub struct QueryExecutor {
    contents: TableContents,
}

impl QueryExecutor {
    /// Creates a new executor over a loaded table
    pub fn new(contents: TableContents) -> Self {
        Self { contents }
    }

    /// Returns matching records in on-disk order.
    pub fn filter(self, conditions: &[QueryCondition]) -> QueryResult {
        let records: Vec<Record> = self
            .contents
            .records
            .into_iter()
            .filter(|record| ConditionMatcher::matches(record, conditions))
            .collect();

        QueryResult::new(records)
    }

    /// Filters, then projects every record onto `columns`.
    ///
    /// An empty column list keeps every column. Requested columns the
    /// record does not have are left out without error.
    pub fn select<S: AsRef<str>>(self, columns: &[S], conditions: &[QueryCondition]) -> QueryResult {
        let result = self.filter(conditions);
        if columns.is_empty() {
            return result;
        }

        let records = result
            .records
            .iter()
            .map(|record| project(record, columns))
            .collect();

        QueryResult::new(records)
    }

    /// Sorts every record by `column` and returns the first `limit`.
    ///
    /// # Errors
    ///
    /// Returns `CSV_INVALID_ARGUMENT` if `column` is not in the header.
    pub fn sorted_range(self, column: &str, order: SortOrder, limit: usize) -> StoreResult<Vec<Record>> {
        if !self.contents.has_column(column) {
            return Err(StoreError::invalid_argument(format!(
                "sort column '{}' does not exist in table",
                column
            )));
        }

        let mut records = self.contents.records;
        ResultSorter::sort(&mut records, column, order);
        records.truncate(limit);

        Ok(records)
    }
}

/// Restricts a record to the requested columns.
pub fn project<S: AsRef<str>>(record: &Record, columns: &[S]) -> Record {
    record
        .iter()
        .filter(|(key, _)| columns.iter().any(|c| c.as_ref() == key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
