//! Record sorting for sorted-range queries
//!
//! Uses the same numeric-or-lexicographic comparison as the condition
//! matcher.

use super::condition::SortOrder;
use super::filters::compare_values;
use crate::storage::Record;

/// Sorts records by a single column
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts records by `column` in the given order.
    ///
    /// Sort is stable in both directions: records with equal keys keep
    /// their original relative order. A record without the column sorts as
    /// if the value were empty.
    pub fn sort(records: &mut [Record], column: &str, order: SortOrder) {
        records.sort_by(|a, b| {
            let a_val = a.get(column).map(String::as_str).unwrap_or("");
            let b_val = b.get(column).map(String::as_str).unwrap_or("");

            let ordering = compare_values(a_val, b_val);

            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}
