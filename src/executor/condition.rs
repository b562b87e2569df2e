//! Query conditions and sort order

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::StoreError;

/// Comparison operator of a condition
///
/// Tokens that are not recognised parse to `Unsupported` and never match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=` or `==`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
    /// `contains`, case-insensitive
    Contains,
    /// `starts_with`, case-insensitive
    StartsWith,
    /// `ends_with`, case-insensitive
    EndsWith,
    /// Any other token
    Unsupported(String),
}

impl Operator {
    /// Parses an operator token. Never fails.
    pub fn parse(token: &str) -> Self {
        match token {
            "=" | "==" => Operator::Eq,
            "!=" => Operator::NotEq,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Gte,
            "<=" => Operator::Lte,
            "contains" => Operator::Contains,
            "starts_with" => Operator::StartsWith,
            "ends_with" => Operator::EndsWith,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::Unsupported(token) => token.as_str(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Operator::Unsupported(_))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Operator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Operator::parse(&token))
    }
}

/// A single `column operator value` predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCondition {
    /// Column the predicate reads
    pub column: String,
    /// Comparison operator
    pub operator: Operator,
    /// Right-hand operand, always text
    pub value: String,
}

impl QueryCondition {
    /// Creates a condition from an operator token
    pub fn new(column: impl Into<String>, operator: &str, value: impl Into<String>) -> Self {
        Self::with_operator(column, Operator::parse(operator), value)
    }

    pub fn with_operator(
        column: impl Into<String>,
        operator: Operator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Create an equality condition
    pub fn eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_operator(column, Operator::Eq, value)
    }

    /// Create an inequality condition
    pub fn not_eq(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_operator(column, Operator::NotEq, value)
    }

    /// Create a greater-than condition
    pub fn gt(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_operator(column, Operator::Gt, value)
    }

    /// Create a less-than condition
    pub fn lt(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_operator(column, Operator::Lt, value)
    }

    /// Create a substring condition
    pub fn contains(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_operator(column, Operator::Contains, value)
    }
}

impl fmt::Display for QueryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.value)
    }
}

/// Direction of a sorted-range query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    /// Accepts exactly `asc` or `desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(StoreError::invalid_argument(format!(
                "invalid sort order '{}', expected 'asc' or 'desc'",
                other
            ))),
        }
    }
}
