//! Query engine for csvstore
//!
//! Filtering, projection and sorted-range retrieval over a loaded table.
//!
//! # Comparison
//!
//! Range operators and sorting share one rule: compare as numbers when both
//! values parse as `f64`, otherwise compare the text. A parse failure is
//! never reported.

mod condition;
mod executor;
mod filters;
mod result;
mod sorter;

pub use condition::{Operator, QueryCondition, SortOrder};
pub use executor::{project, QueryExecutor};
pub use filters::{compare_values, ConditionMatcher};
pub use result::QueryResult;
pub use sorter::ResultSorter;
