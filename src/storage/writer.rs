//! Table file writer
//!
//! - `create` writes the header of a new table and refuses existing files
//! - `save_all` is a destructive full rewrite with one write call
//! - `append` adds one row without touching earlier content, terminating
//!   an unterminated last row first
//!
//! No fsync and no temp-file rename: a crash during `save_all` can leave a
//! truncated file behind.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::codec::{encode_row, encode_row_into};
use super::errors::{StoreError, StoreResult};
use super::record::{row_from_record, Record};

/// Writes table files
pub struct TableWriter;

impl TableWriter {
    /// Creates a new table file holding only the header row.
    ///
    /// # Errors
    ///
    /// Returns `CSV_TABLE_ALREADY_EXISTS` if the file is already present.
    pub fn create(table: &str, path: &Path, header: &[String]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    StoreError::table_already_exists(table)
                } else {
                    StoreError::io_failure(
                        format!("failed to create table file: {}", path.display()),
                        e,
                    )
                }
            })?;

        file.write_all(encode_row(header).as_bytes()).map_err(|e| {
            StoreError::io_failure(format!("failed to write header of table {}", table), e)
        })
    }

    /// Overwrites the table with `header` followed by `records`.
    ///
    /// Records are positioned by header order; missing fields are written
    /// empty and keys outside the header are dropped.
    pub fn save_all(
        table: &str,
        path: &Path,
        header: &[String],
        records: &[Record],
    ) -> StoreResult<()> {
        let mut content = encode_row(header);
        for record in records {
            encode_row_into(&mut content, &row_from_record(header, record));
        }

        fs::write(path, content.as_bytes()).map_err(|e| {
            StoreError::io_failure(format!("failed to rewrite table {}", table), e)
        })
    }

    /// Appends a single row to an existing table.
    ///
    /// A file whose last row has no trailing `\n` gets one before the new
    /// row, so the two rows never merge.
    pub fn append(table: &str, path: &Path, row: &[String]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    StoreError::table_not_found(table, e)
                } else {
                    StoreError::io_failure(
                        format!("failed to open table file: {}", path.display()),
                        e,
                    )
                }
            })?;

        let append_failed =
            |e| StoreError::io_failure(format!("failed to append record to table {}", table), e);

        let mut content = String::new();
        if !Self::ends_with_newline(&mut file).map_err(append_failed)? {
            content.push('\n');
        }
        encode_row_into(&mut content, row);

        file.write_all(content.as_bytes()).map_err(append_failed)
    }

    /// True for an empty file or one whose last byte is `\n`.
    fn ends_with_newline(file: &mut File) -> io::Result<bool> {
        if file.metadata()?.len() == 0 {
            return Ok(true);
        }
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }
}
