//! Observable events in csvstore
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Store opened on a base directory
    StoreOpened,

    // Mutations
    /// Table file created
    TableCreated,
    /// Record appended
    RecordInserted,
    /// Update finished (possibly with zero matches)
    RecordsUpdated,
    /// Delete finished (possibly with zero matches)
    RecordsDeleted,

    // Reads
    /// Query or select finished
    QueryExecuted,
    /// Sorted-range query finished
    SortedRangeExecuted,
    /// Tables listed
    TablesListed,

    /// Any operation returned an error
    OperationFailed,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::TableCreated => "TABLE_CREATED",
            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordsUpdated => "RECORDS_UPDATED",
            Event::RecordsDeleted => "RECORDS_DELETED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::SortedRangeExecuted => "SORTED_RANGE_EXECUTED",
            Event::TablesListed => "TABLES_LISTED",
            Event::OperationFailed => "OPERATION_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryExecuted | Event::SortedRangeExecuted | Event::TablesListed => {
                Severity::Trace
            }
            Event::OperationFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
