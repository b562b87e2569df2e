//! Record types and header positioning
//!
//! On disk a record is a row of fields in header order. In memory it is a
//! mapping from column name to text. Values are never typed.

use std::collections::BTreeMap;

/// One table row keyed by column name
pub type Record = BTreeMap<String, String>;

/// Builds a row in header order. Absent columns become empty strings and
/// keys not in the header are dropped.
pub fn row_from_record(header: &[String], record: &Record) -> Vec<String> {
    header
        .iter()
        .map(|column| record.get(column).cloned().unwrap_or_default())
        .collect()
}

/// Builds a record from a decoded row.
///
/// Fields past the end of the header are ignored.
pub fn record_from_row(header: &[String], row: Vec<String>) -> Record {
    header.iter().cloned().zip(row).collect()
}

/// Keeps exactly the header columns of `record`, filling the gaps.
pub fn normalize(header: &[String], record: &Record) -> Record {
    record_from_row(header, row_from_record(header, record))
}

/// Header and records of one table, as loaded in a single read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableContents {
    /// Column names in on-disk order
    pub header: Vec<String>,
    /// Records in on-disk order
    pub records: Vec<Record>,
}

impl TableContents {
    pub fn new(header: Vec<String>, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Returns true if the header declares `column`
    pub fn has_column(&self, column: &str) -> bool {
        self.header.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        vec!["id".to_string(), "name".to_string(), "email".to_string()]
    }

    #[test]
    fn test_row_follows_header_order() {
        let mut record = Record::new();
        record.insert("email".into(), "a@example.com".into());
        record.insert("id".into(), "7".into());

        let row = row_from_record(&header(), &record);
        assert_eq!(row, vec!["7", "", "a@example.com"]);
    }

    #[test]
    fn test_extra_keys_dropped() {
        let mut record = Record::new();
        record.insert("name".into(), "Ann".into());
        record.insert("nickname".into(), "annie".into());

        let normalized = normalize(&header(), &record);
        assert_eq!(normalized.len(), 3);
        assert!(!normalized.contains_key("nickname"));
        assert_eq!(normalized["name"], "Ann");
        assert_eq!(normalized["id"], "");
    }

    #[test]
    fn test_record_from_row() {
        let row = vec!["1".to_string(), "Bob".to_string(), "b@example.com".to_string()];
        let record = record_from_row(&header(), row);
        assert_eq!(record["id"], "1");
        assert_eq!(record["name"], "Bob");
        assert_eq!(record["email"], "b@example.com");
    }

    #[test]
    fn test_has_column() {
        let contents = TableContents::new(header(), Vec::new());
        assert!(contents.has_column("email"));
        assert!(!contents.has_column("phone"));
    }
}
