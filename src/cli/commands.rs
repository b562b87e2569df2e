//! CLI command implementations
//!
//! `run` resolves the configuration, opens the store, executes one command
//! and prints its JSON response.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::executor::QueryCondition;
use crate::observability::{log_event_with_fields, Event};
use crate::storage::Record;
use crate::store::{StoreConfig, TableStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Data directory used when neither a config file nor `--data-dir` is given
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Main CLI entry point
///
/// Parses arguments, runs the command and prints the response. On failure
/// the error response is printed before the error is returned.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let outcome = resolve_config(cli.config.as_deref(), cli.data_dir.as_deref())
        .and_then(|config| TableStore::from_config(&config).map_err(CliError::from))
        .and_then(|store| execute(&store, cli.command));

    match outcome {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Builds the effective configuration.
///
/// `--data-dir` wins over the file's `data_dir`.
pub fn resolve_config(config: Option<&Path>, data_dir: Option<&Path>) -> CliResult<StoreConfig> {
    let mut resolved = match config {
        Some(path) => StoreConfig::load(path).map_err(|e| CliError::config_error(e.message()))?,
        None => StoreConfig::new(DEFAULT_DATA_DIR),
    };
    if let Some(dir) = data_dir {
        resolved.data_dir = dir.to_path_buf();
    }
    resolved
        .validate()
        .map_err(|e| CliError::config_error(e.message()))?;

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", &resolved.data_dir.display().to_string()),
            ("log_level", &resolved.log_level),
        ],
    );
    Ok(resolved)
}

/// Runs one command against an open store and returns the response data.
pub fn execute(store: &TableStore, command: Command) -> CliResult<Value> {
    match command {
        Command::CreateTable { table, columns } => {
            store.create_table(&table, columns.iter().map(String::as_str))?;
            Ok(json!({ "table": table, "columns": columns }))
        }
        Command::Insert { table, values } => {
            let record = parse_assignments(&values)?;
            let stored = store.insert(&table, &record)?;
            Ok(serde_json::to_value(stored)?)
        }
        Command::Query { table, conditions } => {
            let conditions = parse_conditions(&conditions)?;
            Ok(serde_json::to_value(store.query(&table, &conditions)?)?)
        }
        Command::Select {
            table,
            columns,
            conditions,
        } => {
            let conditions = parse_conditions(&conditions)?;
            Ok(serde_json::to_value(store.select(&table, columns.as_slice(), &conditions)?)?)
        }
        Command::Update {
            table,
            values,
            conditions,
        } => {
            let updates = parse_assignments(&values)?;
            let conditions = parse_conditions(&conditions)?;
            Ok(serde_json::to_value(store.update(&table, &updates, &conditions)?)?)
        }
        Command::Delete { table, conditions } => {
            let conditions = parse_conditions(&conditions)?;
            Ok(serde_json::to_value(store.delete(&table, &conditions)?)?)
        }
        Command::Range {
            table,
            column,
            order,
            limit,
        } => {
            let records = store.query_sorted_range(&table, &column, &order, limit)?;
            Ok(json!({ "count": records.len(), "records": records }))
        }
        Command::ListTables => Ok(json!({ "tables": store.list_tables()? })),
        Command::Path { table } => {
            let path: PathBuf = store.table_path(&table);
            Ok(json!({ "table": table, "path": path.display().to_string() }))
        }
    }
}

/// Parses `"<column> <operator> <value>"`.
///
/// The value is everything after the operator and may contain spaces or be
/// empty. Unknown operators are accepted and match nothing.
pub fn parse_condition(text: &str) -> CliResult<QueryCondition> {
    let malformed = || {
        CliError::usage_error(format!(
            "invalid condition '{}', expected \"<column> <operator> <value>\"",
            text
        ))
    };

    let (column, rest) = text
        .trim_start()
        .split_once(char::is_whitespace)
        .ok_or_else(malformed)?;
    let rest = rest.trim_start();
    let (operator, value) = match rest.split_once(char::is_whitespace) {
        Some((operator, value)) => (operator, value.trim_start()),
        None => (rest, ""),
    };
    if operator.is_empty() {
        return Err(malformed());
    }

    Ok(QueryCondition::new(column, operator, value))
}

/// Parses `col=value`. Only the first `=` separates.
pub fn parse_assignment(text: &str) -> CliResult<(String, String)> {
    match text.split_once('=') {
        Some((column, value)) if !column.is_empty() => Ok((column.to_string(), value.to_string())),
        _ => Err(CliError::usage_error(format!(
            "invalid assignment '{}', expected col=value",
            text
        ))),
    }
}

fn parse_conditions(texts: &[String]) -> CliResult<Vec<QueryCondition>> {
    texts.iter().map(|t| parse_condition(t)).collect()
}

fn parse_assignments(texts: &[String]) -> CliResult<Record> {
    texts.iter().map(|t| parse_assignment(t)).collect()
}
