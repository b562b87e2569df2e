//! Table file reader
//!
//! Every read loads the whole file. A file that is absent or cannot be
//! opened is reported as a missing table; a file that opens but does not
//! decode is reported as corruption.

use std::fs;
use std::path::Path;

use super::codec::{decode_rows, DecodeError, RowDecoder};
use super::errors::{StoreError, StoreResult};
use super::record::{record_from_row, Record, TableContents};

/// Reads table files
pub struct TableReader;

impl TableReader {
    /// Reads the raw file text.
    fn read_text(table: &str, path: &Path) -> StoreResult<String> {
        let bytes = fs::read(path).map_err(|e| StoreError::table_not_found(table, e))?;
        String::from_utf8(bytes).map_err(|e| {
            StoreError::data_corruption(table, format!("table file is not valid UTF-8: {}", e))
        })
    }

    fn corruption(table: &str, err: DecodeError) -> StoreError {
        StoreError::data_corruption(table, err.to_string())
            .with_details(format!("table: {}, line: {}", table, err.line()))
    }

    /// Loads header and records in one read.
    ///
    /// A completely empty file yields an empty header and no records.
    pub fn load(table: &str, path: &Path) -> StoreResult<TableContents> {
        let text = Self::read_text(table, path)?;
        let mut rows = decode_rows(&text)
            .map_err(|e| Self::corruption(table, e))?
            .into_iter();

        let header = match rows.next() {
            Some(header) => header,
            None => return Ok(TableContents::default()),
        };
        let records = rows.map(|row| record_from_row(&header, row)).collect();

        Ok(TableContents::new(header, records))
    }

    /// Loads every record in on-disk order.
    pub fn load_all(table: &str, path: &Path) -> StoreResult<Vec<Record>> {
        Ok(Self::load(table, path)?.records)
    }

    /// Reads only the header row.
    pub fn header(table: &str, path: &Path) -> StoreResult<Vec<String>> {
        let text = Self::read_text(table, path)?;
        match RowDecoder::new(&text).next() {
            Some(Ok(header)) => Ok(header),
            Some(Err(e)) => Err(Self::corruption(table, e)),
            None => Err(StoreError::data_corruption(table, "table file has no header row")),
        }
    }
}
