//! Table file storage for csvstore
//!
//! Each table is one CSV file: a header row with the column names in
//! creation order, then one row per record with fields positioned by the
//! header. There is no other metadata.
//!
//! # Design Principles
//!
//! - Whole-file reads; every operation scans the full table
//! - Mutations rewrite the whole file, except insert which appends one row
//! - The header never changes after creation
//! - Malformed content is reported, never skipped

mod codec;
mod errors;
mod reader;
mod record;
mod writer;

pub use codec::{decode_rows, encode_row, DecodeError, RowDecoder};
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use reader::TableReader;
pub use record::{normalize, record_from_row, row_from_record, Record, TableContents};
pub use writer::TableWriter;
