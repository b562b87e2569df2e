//! Table store for csvstore
//!
//! Public entry point: a directory of CSV tables, one file per table,
//! behind a single reader/writer lock.

mod config;
mod store;

pub use config::StoreConfig;
pub use store::{TableStore, TABLE_EXTENSION};
