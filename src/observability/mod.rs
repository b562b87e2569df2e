//! Observability subsystem for csvstore
//!
//! This module provides:
//! - Structured logging (JSON lines on stderr)
//! - Per-store operation counters
//! - Typed lifecycle and operation events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use csvstore::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TableCreated, &[("table", "users")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
