//! The table store facade
//!
//! Owns the base directory and the single reader/writer lock that guards
//! every table file under it.
//!
//! # Locking
//!
//! - `query`, `select`, `query_sorted_range`, `header`, `list_tables`:
//!   shared lock, readers of all tables run concurrently
//! - `create_table`, `insert`, `update`, `delete`: exclusive lock, so all
//!   mutations of all tables are serialized and no two read-modify-write
//!   sequences interleave
//!
//! The lock guards no in-memory data. A poisoned lock is taken over as is.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::config::StoreConfig;
use crate::executor::{QueryCondition, QueryExecutor, QueryResult, SortOrder};
use crate::mutation::MutationEngine;
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::storage::{Record, StoreError, StoreResult, TableReader, TableWriter};

/// File extension of table files
pub const TABLE_EXTENSION: &str = "csv";

/// A directory of CSV tables behind one reader/writer lock
///
/// Share between threads with `Arc<TableStore>`.
#[derive(Debug)]
pub struct TableStore {
    base_path: PathBuf,
    lock: RwLock<()>,
    metrics: MetricsRegistry,
}

impl TableStore {
    /// Opens a store on `base_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `CSV_IO_FAILURE` if the directory cannot be created.
    pub fn open(base_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).map_err(|e| {
            StoreError::io_failure(
                format!("failed to create storage directory: {}", base_path.display()),
                e,
            )
        })?;

        log_event_with_fields(
            Event::StoreOpened,
            &[("base_path", &base_path.display().to_string())],
        );

        Ok(Self {
            base_path,
            lock: RwLock::new(()),
            metrics: MetricsRegistry::new(),
        })
    }

    /// Applies the log level and opens the configured data directory.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        Logger::set_min_severity(config.severity()?);
        Self::open(&config.data_dir)
    }

    /// Directory holding the table files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of a table's file. Does no I/O and does not check the name.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.base_path.join(format!("{}.{}", table, TABLE_EXTENSION))
    }

    /// Path of a table's file, refusing names that leave the base directory.
    fn table_file(&self, table: &str) -> StoreResult<PathBuf> {
        validate_table_name(table)?;
        Ok(self.table_path(table))
    }

    /// Operation counters since the store was opened
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logs the outcome of an operation and counts failures.
    fn observe<T>(&self, event: Event, result: StoreResult<T>, fields: &[(&str, &str)]) -> StoreResult<T> {
        match &result {
            Ok(_) => log_event_with_fields(event, fields),
            Err(err) => {
                self.metrics.increment_operations_failed();
                let mut failure = vec![
                    ("operation", event.as_str()),
                    ("code", err.code().code()),
                    ("error", err.message()),
                ];
                failure.extend_from_slice(fields);
                log_event_with_fields(Event::OperationFailed, &failure);
            }
        }
        result
    }

    /// Creates a table with the given column names.
    ///
    /// # Errors
    ///
    /// - `CSV_TABLE_ALREADY_EXISTS` if the table exists
    /// - `CSV_INVALID_ARGUMENT` for an empty or duplicated header, or a
    ///   table name that is empty or contains a path separator
    pub fn create_table<I, S>(&self, table: &str, headers: I) -> StoreResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header: Vec<String> = headers.into_iter().map(Into::into).collect();

        let result = self.table_file(table).and_then(|path| {
            validate_header(&header)?;
            let _guard = self.write_lock();
            TableWriter::create(table, &path, &header)
        });
        if result.is_ok() {
            self.metrics.increment_tables_created();
        }

        let columns = header.len().to_string();
        self.observe(
            Event::TableCreated,
            result,
            &[("table", table), ("columns", &columns)],
        )
    }

    /// Returns the table's column names in on-disk order.
    pub fn header(&self, table: &str) -> StoreResult<Vec<String>> {
        let path = self.table_file(table)?;
        let _guard = self.read_lock();
        TableReader::header(table, &path)
    }

    /// Appends a record and returns it as stored, auto-filled columns
    /// included.
    pub fn insert(&self, table: &str, record: &Record) -> StoreResult<Record> {
        let result = self.table_file(table).and_then(|path| {
            let _guard = self.write_lock();
            MutationEngine::insert(table, &path, record)
        });
        if result.is_ok() {
            self.metrics.increment_records_inserted();
        }

        self.observe(Event::RecordInserted, result, &[("table", table)])
    }

    /// Returns every record matching all conditions, in on-disk order.
    pub fn query(&self, table: &str, conditions: &[QueryCondition]) -> StoreResult<QueryResult> {
        let result = self.table_file(table).and_then(|path| {
            let _guard = self.read_lock();
            TableReader::load(table, &path)
                .map(|contents| QueryExecutor::new(contents).filter(conditions))
        });
        self.observe_query(Event::QueryExecuted, table, result)
    }

    /// Like `query`, with each record restricted to `columns`.
    ///
    /// An empty column list returns whole records.
    pub fn select<S: AsRef<str>>(
        &self,
        table: &str,
        columns: &[S],
        conditions: &[QueryCondition],
    ) -> StoreResult<QueryResult> {
        let result = self.table_file(table).and_then(|path| {
            let _guard = self.read_lock();
            TableReader::load(table, &path)
                .map(|contents| QueryExecutor::new(contents).select(columns, conditions))
        });
        self.observe_query(Event::QueryExecuted, table, result)
    }

    fn observe_query(
        &self,
        event: Event,
        table: &str,
        result: StoreResult<QueryResult>,
    ) -> StoreResult<QueryResult> {
        if result.is_ok() {
            self.metrics.increment_queries_executed();
        }
        let count = result.as_ref().map_or(0, |r| r.count).to_string();
        self.observe(event, result, &[("table", table), ("count", &count)])
    }

    /// Merges `updates` into every matching record and returns the records
    /// in their new state. Zero matches is not an error.
    pub fn update(
        &self,
        table: &str,
        updates: &Record,
        conditions: &[QueryCondition],
    ) -> StoreResult<QueryResult> {
        let result = self.table_file(table).and_then(|path| {
            let _guard = self.write_lock();
            MutationEngine::update(table, &path, updates, conditions)
        });
        if let Ok(ref updated) = result {
            self.metrics.add_records_updated(updated.count as u64);
        }

        let count = result.as_ref().map_or(0, |r| r.count).to_string();
        self.observe(Event::RecordsUpdated, result, &[("table", table), ("count", &count)])
    }

    /// Removes every matching record and returns them. Zero matches is not
    /// an error.
    pub fn delete(&self, table: &str, conditions: &[QueryCondition]) -> StoreResult<QueryResult> {
        let result = self.table_file(table).and_then(|path| {
            let _guard = self.write_lock();
            MutationEngine::delete(table, &path, conditions)
        });
        if let Ok(ref deleted) = result {
            self.metrics.add_records_deleted(deleted.count as u64);
        }

        let count = result.as_ref().map_or(0, |r| r.count).to_string();
        self.observe(Event::RecordsDeleted, result, &[("table", table), ("count", &count)])
    }

    /// Sorts the whole table by `column` and returns the first `limit`
    /// records. Stored order is not changed.
    ///
    /// # Errors
    ///
    /// - `CSV_TABLE_NOT_FOUND` if the table does not exist
    /// - `CSV_INVALID_ARGUMENT` if `order` is not exactly `asc` or `desc`,
    ///   or `column` is not in the header
    pub fn query_sorted_range(
        &self,
        table: &str,
        column: &str,
        order: &str,
        limit: usize,
    ) -> StoreResult<Vec<Record>> {
        let result = self.table_file(table).and_then(|path| {
            let _guard = self.read_lock();
            let contents = TableReader::load(table, &path)?;
            let order: SortOrder = order.parse()?;
            QueryExecutor::new(contents).sorted_range(column, order, limit)
        });
        if result.is_ok() {
            self.metrics.increment_queries_executed();
        }

        let count = result.as_ref().map_or(0, Vec::len).to_string();
        self.observe(
            Event::SortedRangeExecuted,
            result,
            &[("table", table), ("column", column), ("order", order), ("count", &count)],
        )
    }

    /// Names of all tables, sorted.
    ///
    /// Only regular files with the table extension count.
    pub fn list_tables(&self) -> StoreResult<Vec<String>> {
        let result = {
            let _guard = self.read_lock();
            self.scan_tables()
        };

        let count = result.as_ref().map_or(0, Vec::len).to_string();
        self.observe(Event::TablesListed, result, &[("count", &count)])
    }

    fn scan_tables(&self) -> StoreResult<Vec<String>> {
        let read_failed = |e| {
            StoreError::io_failure(
                format!("failed to read directory: {}", self.base_path.display()),
                e,
            )
        };

        let mut tables = Vec::new();
        for entry in fs::read_dir(&self.base_path).map_err(read_failed)? {
            let entry = entry.map_err(read_failed)?;
            if !entry.file_type().map_err(read_failed)?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                tables.push(name.to_string());
            }
        }

        tables.sort();
        Ok(tables)
    }
}

fn validate_table_name(table: &str) -> StoreResult<()> {
    if table.is_empty() || table == "." || table == ".." {
        return Err(StoreError::invalid_argument(format!(
            "invalid table name '{}'",
            table
        )));
    }
    if table.contains('/') || table.contains('\\') {
        return Err(StoreError::invalid_argument(format!(
            "table name '{}' must not contain a path separator",
            table
        )));
    }
    Ok(())
}

fn validate_header(header: &[String]) -> StoreResult<()> {
    if header.is_empty() {
        return Err(StoreError::invalid_argument("a table needs at least one column"));
    }
    let mut seen = HashSet::new();
    for column in header {
        if !seen.insert(column.as_str()) {
            return Err(StoreError::invalid_argument(format!(
                "duplicate column name '{}'",
                column
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("nested").join("tables");

        let store = TableStore::open(&base).unwrap();
        assert!(base.is_dir());
        assert_eq!(store.base_path(), base.as_path());
    }

    #[test]
    fn test_open_fails_on_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let err = TableStore::open(&file).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::IoFailure);
    }

    #[test]
    fn test_table_path() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::open(temp.path()).unwrap();
        assert_eq!(store.table_path("users"), temp.path().join("users.csv"));
        assert!(!store.table_path("users").exists());
    }

    #[test]
    fn test_create_table_validation() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::open(temp.path()).unwrap();
        let no_columns: Vec<String> = Vec::new();

        for (name, columns) in [
            ("", vec!["id"]),
            ("..", vec!["id"]),
            ("a/b", vec!["id"]),
            ("dup", vec!["id", "id"]),
        ] {
            let err = store.create_table(name, columns).unwrap_err();
            assert_eq!(err.code(), StoreErrorCode::InvalidArgument, "table {:?}", name);
        }
        let err = store.create_table("empty", no_columns).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::InvalidArgument);

        assert_eq!(store.metrics().snapshot().operations_failed, 5);
        assert!(store.list_tables().unwrap().is_empty());
    }

    #[test]
    fn test_every_operation_rejects_escaping_names() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::open(temp.path().join("base")).unwrap();
        let outside = temp.path().join("outside.csv");
        fs::write(&outside, "id,v\n1,a\n").unwrap();

        let mut record = Record::new();
        record.insert("v".into(), "b".into());
        let no_columns: [&str; 0] = [];

        let table = "../outside";
        let errors = [
            store.header(table).unwrap_err(),
            store.insert(table, &record).unwrap_err(),
            store.query(table, &[]).unwrap_err(),
            store.select(table, &no_columns, &[]).unwrap_err(),
            store.update(table, &record, &[]).unwrap_err(),
            store.delete(table, &[]).unwrap_err(),
            store.query_sorted_range(table, "id", "asc", 1).unwrap_err(),
        ];
        for err in &errors {
            assert_eq!(err.code(), StoreErrorCode::InvalidArgument);
        }

        assert_eq!(fs::read_to_string(&outside).unwrap(), "id,v\n1,a\n");
    }

    #[test]
    fn test_list_tables_filters_entries() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::open(temp.path()).unwrap();
        store.create_table("users", ["id"]).unwrap();
        store.create_table("orders", ["id"]).unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("dir.csv")).unwrap();

        assert_eq!(store.list_tables().unwrap(), vec!["orders", "users"]);
    }

    #[test]
    fn test_metrics_count_operations() {
        let temp = TempDir::new().unwrap();
        let store = TableStore::open(temp.path()).unwrap();
        store.create_table("t", ["id", "v"]).unwrap();

        let mut record = Record::new();
        record.insert("v".into(), "1".into());
        store.insert("t", &record).unwrap();
        store.insert("t", &record).unwrap();
        store.query("t", &[]).unwrap();
        store.update("t", &record, &[]).unwrap();
        store.delete("t", &[QueryCondition::eq("v", "1")]).unwrap();
        assert!(store.query("missing", &[]).is_err());

        let snapshot = store.metrics().snapshot();
        assert_eq!(snapshot.tables_created, 1);
        assert_eq!(snapshot.records_inserted, 2);
        assert_eq!(snapshot.records_updated, 2);
        assert_eq!(snapshot.records_deleted, 2);
        assert_eq!(snapshot.queries_executed, 1);
        assert_eq!(snapshot.operations_failed, 1);
    }
}
