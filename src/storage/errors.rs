//! Store error types
//!
//! Error codes:
//! - CSV_TABLE_NOT_FOUND (ERROR severity)
//! - CSV_TABLE_ALREADY_EXISTS (ERROR severity)
//! - CSV_DATA_CORRUPTION (FATAL severity)
//! - CSV_INVALID_ARGUMENT (ERROR severity)
//! - CSV_IO_FAILURE (ERROR severity)
//!
//! Zero-match updates and deletes, unknown operators and conditions on
//! missing columns are not errors and never produce one of these.

use std::fmt;
use std::io;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the store stays usable
    Error,
    /// The table content cannot be trusted and must not be rewritten
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Error kinds surfaced by every store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Table file missing or unreadable
    TableNotFound,
    /// Create on a table that already exists
    TableAlreadyExists,
    /// Malformed row content during decode
    DataCorruption,
    /// Bad sort order, unknown sort column, bad table definition
    InvalidArgument,
    /// Directory creation, file open or write failures
    IoFailure,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::TableNotFound => "CSV_TABLE_NOT_FOUND",
            StoreErrorCode::TableAlreadyExists => "CSV_TABLE_ALREADY_EXISTS",
            StoreErrorCode::DataCorruption => "CSV_DATA_CORRUPTION",
            StoreErrorCode::InvalidArgument => "CSV_INVALID_ARGUMENT",
            StoreErrorCode::IoFailure => "CSV_IO_FAILURE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with enough context to tell the kinds apart
#[derive(Debug)]
pub struct StoreError {
    /// Error code
    code: StoreErrorCode,
    /// Human-readable message
    message: String,
    /// Optional context (table name, line number)
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Table file is absent or could not be read
    pub fn table_not_found(table: &str, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(
                StoreErrorCode::TableNotFound,
                format!("table {} not found", table),
            )
        }
    }

    /// Table file already exists
    pub fn table_already_exists(table: &str) -> Self {
        Self::new(
            StoreErrorCode::TableAlreadyExists,
            format!("table {} already exists", table),
        )
    }

    /// Malformed content in a table file
    pub fn data_corruption(table: &str, reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::DataCorruption, reason).with_details(format!("table: {}", table))
    }

    /// Caller supplied an argument the store cannot act on
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidArgument, reason)
    }

    /// Any other I/O failure
    pub fn io_failure(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(StoreErrorCode::IoFailure, message)
        }
    }

    /// Attach context details
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the table content is untrustworthy
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::TableNotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
