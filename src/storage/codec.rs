//! Delimited-text row codec
//!
//! Rows are comma separated and terminated by `\n`. A field is quoted when
//! it contains the delimiter, a double quote, CR or LF, or starts with a
//! space or tab; quotes inside a quoted field are doubled.
//!
//! The decoder accepts `\r\n` line endings, skips blank lines and requires
//! every row to have as many fields as the first one.

use std::iter::Peekable;
use std::str::Chars;

use thiserror::Error;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Row decoding failures. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("bare \" in non-quoted field on line {line}")]
    BareQuote { line: usize },

    #[error("extraneous {found:?} after quoted field on line {line}")]
    TrailingAfterQuote { line: usize, found: char },

    #[error("quoted field starting on line {line} is never closed")]
    UnterminatedQuote { line: usize },

    #[error("wrong number of fields on line {line}: expected {expected}, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl DecodeError {
    /// Line the failure was detected on
    pub fn line(&self) -> usize {
        match self {
            DecodeError::BareQuote { line }
            | DecodeError::TrailingAfterQuote { line, .. }
            | DecodeError::UnterminatedQuote { line }
            | DecodeError::FieldCount { line, .. } => *line,
        }
    }
}

/// Encodes one row, including the trailing newline.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    encode_row_into(&mut out, fields);
    out
}

/// Appends one encoded row to `out`.
pub fn encode_row_into<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        let field = field.as_ref();
        // a lone empty field would otherwise encode as a blank line
        if needs_quotes(field) || (fields.len() == 1 && field.is_empty()) {
            out.push(QUOTE);
            for c in field.chars() {
                if c == QUOTE {
                    out.push(QUOTE);
                }
                out.push(c);
            }
            out.push(QUOTE);
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

fn needs_quotes(field: &str) -> bool {
    if field.starts_with(' ') || field.starts_with('\t') {
        return true;
    }
    field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\r' || c == '\n')
}

/// Streaming row decoder over an in-memory table file.
///
/// Yields raw rows without checking field counts; see [`decode_rows`].
pub struct RowDecoder<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    failed: bool,
}

impl<'a> RowDecoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            failed: false,
        }
    }

    /// Current line number
    pub fn line(&self) -> usize {
        self.line
    }

    /// Consumes a line terminator if one is next. `\r` alone is data.
    fn eat_newline(&mut self) -> bool {
        match self.chars.peek() {
            Some('\n') => {
                self.chars.next();
                self.line += 1;
                true
            }
            Some('\r') => {
                let mut ahead = self.chars.clone();
                ahead.next();
                if ahead.peek() == Some(&'\n') {
                    self.chars.next();
                    self.chars.next();
                    self.line += 1;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    fn read_quoted(&mut self, start_line: usize) -> Result<String, DecodeError> {
        let mut field = String::new();
        loop {
            match self.chars.next() {
                None => return Err(DecodeError::UnterminatedQuote { line: start_line }),
                Some(QUOTE) => {
                    if self.chars.peek() == Some(&QUOTE) {
                        self.chars.next();
                        field.push(QUOTE);
                    } else {
                        return Ok(field);
                    }
                }
                Some('\r') if self.chars.peek() == Some(&'\n') => {}
                Some('\n') => {
                    self.line += 1;
                    field.push('\n');
                }
                Some(c) => field.push(c),
            }
        }
    }

    /// Reads one row. The caller has checked that input remains.
    fn read_row(&mut self) -> Result<Vec<String>, DecodeError> {
        let mut fields = Vec::new();
        loop {
            if self.chars.peek() == Some(&QUOTE) {
                let start_line = self.line;
                self.chars.next();
                fields.push(self.read_quoted(start_line)?);

                if self.eat_newline() {
                    return Ok(fields);
                }
                match self.chars.next() {
                    None => return Ok(fields),
                    Some(DELIMITER) => continue,
                    Some(found) => {
                        return Err(DecodeError::TrailingAfterQuote {
                            line: self.line,
                            found,
                        })
                    }
                }
            }

            let mut field = String::new();
            loop {
                if self.eat_newline() {
                    fields.push(field);
                    return Ok(fields);
                }
                match self.chars.next() {
                    None => {
                        fields.push(field);
                        return Ok(fields);
                    }
                    Some(DELIMITER) => {
                        fields.push(field);
                        break;
                    }
                    Some(QUOTE) => return Err(DecodeError::BareQuote { line: self.line }),
                    Some(c) => field.push(c),
                }
            }
        }
    }
}

impl<'a> Iterator for RowDecoder<'a> {
    type Item = Result<Vec<String>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while self.eat_newline() {}
        self.chars.peek()?;

        let row = self.read_row();
        if row.is_err() {
            self.failed = true;
        }
        Some(row)
    }
}

/// Decodes a whole table file into rows.
///
/// All rows must have the same number of fields as the first row.
pub fn decode_rows(input: &str) -> Result<Vec<Vec<String>>, DecodeError> {
    let mut decoder = RowDecoder::new(input);
    let mut rows: Vec<Vec<String>> = Vec::new();

    loop {
        while decoder.eat_newline() {}
        let line = decoder.line();
        let row = match decoder.next() {
            Some(row) => row?,
            None => break,
        };
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(DecodeError::FieldCount {
                    line,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    Ok(rows)
}
