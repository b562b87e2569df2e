//! Condition matching for queries, updates and deletes
//!
//! All conditions must match (AND). A condition on a column the record
//! does not have fails closed, and unsupported operators never match.

use std::cmp::Ordering;

use super::condition::{Operator, QueryCondition};
use crate::storage::Record;

/// Compares two text values.
///
/// Numeric comparison when both sides parse as `f64`, otherwise
/// lexicographic. Unordered numbers (NaN) compare equal. Used for both
/// filtering and sorting.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Evaluates conditions against records
pub struct ConditionMatcher;

impl ConditionMatcher {
    /// Checks if a record matches every condition
    pub fn matches(record: &Record, conditions: &[QueryCondition]) -> bool {
        conditions
            .iter()
            .all(|cond| Self::matches_condition(record, cond))
    }

    /// Checks if a record matches a single condition
    pub fn matches_condition(record: &Record, condition: &QueryCondition) -> bool {
        let actual = match record.get(&condition.column) {
            Some(v) => v.as_str(),
            None => return false,
        };
        let expected = condition.value.as_str();

        match &condition.operator {
            Operator::Eq => actual == expected,
            Operator::NotEq => actual != expected,
            Operator::Gt => compare_values(actual, expected) == Ordering::Greater,
            Operator::Lt => compare_values(actual, expected) == Ordering::Less,
            Operator::Gte => compare_values(actual, expected) != Ordering::Less,
            Operator::Lte => compare_values(actual, expected) != Ordering::Greater,
            Operator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
            Operator::StartsWith => actual.to_lowercase().starts_with(&expected.to_lowercase()),
            Operator::EndsWith => actual.to_lowercase().ends_with(&expected.to_lowercase()),
            Operator::Unsupported(_) => false,
        }
    }
}
