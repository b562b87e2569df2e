//! Mutation engine for csvstore
//!
//! Every mutation is read whole -> modify in memory -> write whole, except
//! insert which appends one row. The caller must hold the store's exclusive
//! lock for the whole call.

use std::path::Path;

use super::autofill::{fill_insert_defaults, touch_updated_at, Stamp};
use crate::executor::{ConditionMatcher, QueryCondition, QueryResult};
use crate::storage::{
    normalize, record_from_row, row_from_record, Record, StoreError, StoreResult, TableReader,
    TableWriter,
};

/// Applies insert, update and delete to table files
pub struct MutationEngine;

impl MutationEngine {
    /// Appends one record and returns it as stored.
    ///
    /// The returned record has exactly the header's columns, including any
    /// auto-filled `id`, `created_at` and `updated_at`.
    pub fn insert(table: &str, path: &Path, record: &Record) -> StoreResult<Record> {
        let header = TableReader::header(table, path)?;

        let mut record = record.clone();
        fill_insert_defaults(&header, &mut record, &Stamp::now());

        let row = row_from_record(&header, &record);
        TableWriter::append(table, path, &row)?;

        Ok(record_from_row(&header, row))
    }

    /// Merges `updates` into every matching record.
    ///
    /// The table is rewritten only when at least one record matched.
    pub fn update(
        table: &str,
        path: &Path,
        updates: &Record,
        conditions: &[QueryCondition],
    ) -> StoreResult<QueryResult> {
        let contents = TableReader::load(table, path)?;
        let header = Self::require_header(table, contents.header)?;
        let mut records = contents.records;

        let updated = apply_update(&header, &mut records, updates, conditions, &Stamp::now());
        if !updated.is_empty() {
            TableWriter::save_all(table, path, &header, &records)?;
        }

        Ok(QueryResult::new(updated))
    }

    /// Removes every matching record and returns them.
    ///
    /// The table is rewritten only when at least one record matched.
    pub fn delete(
        table: &str,
        path: &Path,
        conditions: &[QueryCondition],
    ) -> StoreResult<QueryResult> {
        let contents = TableReader::load(table, path)?;
        let header = Self::require_header(table, contents.header)?;

        let (kept, deleted) = partition_matches(contents.records, conditions);
        if !deleted.is_empty() {
            TableWriter::save_all(table, path, &header, &kept)?;
        }

        Ok(QueryResult::new(deleted))
    }

    fn require_header(table: &str, header: Vec<String>) -> StoreResult<Vec<String>> {
        if header.is_empty() {
            return Err(StoreError::data_corruption(table, "table file has no header row"));
        }
        Ok(header)
    }
}

/// Updates matching records in place and returns copies of them.
///
/// Only header columns are taken from `updates`. `updated_at` is refreshed
/// from `stamp` whenever the header declares it, even if `updates` sets it.
pub fn apply_update(
    header: &[String],
    records: &mut [Record],
    updates: &Record,
    conditions: &[QueryCondition],
    stamp: &Stamp,
) -> Vec<Record> {
    let updates = normalize_updates(header, updates);
    let mut updated = Vec::new();

    for record in records.iter_mut() {
        if !ConditionMatcher::matches(record, conditions) {
            continue;
        }
        for (column, value) in &updates {
            record.insert(column.clone(), value.clone());
        }
        touch_updated_at(header, record, stamp);
        updated.push(record.clone());
    }

    updated
}

/// Splits records into (kept, matched), both in original order.
pub fn partition_matches(
    records: Vec<Record>,
    conditions: &[QueryCondition],
) -> (Vec<Record>, Vec<Record>) {
    let (matched, kept): (Vec<Record>, Vec<Record>) = records
        .into_iter()
        .partition(|record| ConditionMatcher::matches(record, conditions));
    (kept, matched)
}

fn normalize_updates(header: &[String], updates: &Record) -> Record {
    let mut normalized = normalize(header, updates);
    normalized.retain(|column, _| updates.contains_key(column));
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn header() -> Vec<String> {
        ["id", "name", "age", "updated_at"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn record(id: &str, name: &str, age: &str) -> Record {
        let mut r = Record::new();
        r.insert("id".into(), id.into());
        r.insert("name".into(), name.into());
        r.insert("age".into(), age.into());
        r.insert("updated_at".into(), "before".into());
        r
    }

    fn stamp() -> Stamp {
        Stamp::at(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_apply_update_merges_and_touches() {
        let mut records = vec![record("1", "Ann", "30"), record("2", "Bob", "40")];
        let mut updates = Record::new();
        updates.insert("age".into(), "41".into());
        updates.insert("nickname".into(), "bobby".into());

        let updated = apply_update(
            &header(),
            &mut records,
            &updates,
            &[QueryCondition::eq("name", "Bob")],
            &stamp(),
        );

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["age"], "41");
        assert_eq!(updated[0]["name"], "Bob");
        assert_eq!(updated[0]["updated_at"], "2030-01-01T00:00:00.000000000Z");
        assert!(!updated[0].contains_key("nickname"));
        assert_eq!(records[1], updated[0]);
        assert_eq!(records[0]["updated_at"], "before");
    }

    #[test]
    fn test_apply_update_overrides_supplied_updated_at() {
        let mut records = vec![record("1", "Ann", "30")];
        let mut updates = Record::new();
        updates.insert("updated_at".into(), "caller value".into());

        let updated = apply_update(&header(), &mut records, &updates, &[], &stamp());
        assert_eq!(updated[0]["updated_at"], "2030-01-01T00:00:00.000000000Z");
    }

    #[test]
    fn test_apply_update_no_match() {
        let mut records = vec![record("1", "Ann", "30")];
        let before = records.clone();

        let updated = apply_update(
            &header(),
            &mut records,
            &Record::new(),
            &[QueryCondition::eq("id", "9")],
            &stamp(),
        );
        assert!(updated.is_empty());
        assert_eq!(records, before);
    }

    #[test]
    fn test_partition_keeps_order() {
        let records = vec![
            record("1", "Ann", "30"),
            record("2", "Bob", "40"),
            record("3", "Cid", "50"),
        ];

        let (kept, deleted) = partition_matches(records, &[QueryCondition::gt("age", "35")]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["id"], "1");
        assert_eq!(deleted.len(), 2);
        assert_eq!(deleted[0]["id"], "2");
        assert_eq!(deleted[1]["id"], "3");
    }
}
