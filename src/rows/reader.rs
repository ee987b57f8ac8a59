//! Row Reader.
//!
//! Lazily reads the input CSV one line at a time. Lines are trimmed, blank
//! lines are skipped and the rest are split on commas without any quoting
//! rules. Bytes that are not valid UTF-8 are replaced rather than rejected.
//! Rows with the wrong number of fields come out as recoverable `FieldCount`
//! errors; an I/O failure is fatal and ends the sequence.

use crate::common::{Result, SimBatchError};
use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

/// One non-blank input line split into raw fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputRow {
    /// One-based line number in the input file.
    pub line: usize,
    pub fields: Vec<String>,
}

impl InputRow {
    /// Parses a raw line, returning `None` when it is blank.
    pub fn parse(line: usize, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            line,
            fields: text.split(',').map(str::to_string).collect(),
        })
    }

    /// The row as it appeared in the input, minus surrounding whitespace.
    pub fn text(&self) -> String {
        self.fields.join(",")
    }
}

/// Single-pass iterator over the rows of an input file.
#[derive(Debug)]
pub struct RowReader<R> {
    lines: Split<R>,
    path: PathBuf,
    expected_fields: usize,
    line_no: usize,
    finished: bool,
}

impl RowReader<BufReader<File>> {
    /// Opens `path` for reading rows of `expected_fields` fields.
    pub fn open(path: &Path, expected_fields: usize) -> Result<Self> {
        let file = File::open(path).map_err(|source| SimBatchError::OpenInput {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), path, expected_fields))
    }
}

impl<R: BufRead> RowReader<R> {
    pub fn new(reader: R, path: &Path, expected_fields: usize) -> Self {
        Self {
            lines: reader.split(b'\n'),
            path: path.to_path_buf(),
            expected_fields,
            line_no: 0,
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for RowReader<R> {
    type Item = Result<InputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let bytes = match self.lines.next()? {
                Ok(bytes) => bytes,
                Err(source) => {
                    self.finished = true;
                    return Some(Err(SimBatchError::InputRead {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            self.line_no += 1;

            let text = String::from_utf8_lossy(&bytes);
            let text = text.strip_suffix('\r').unwrap_or(&text);
            let Some(row) = InputRow::parse(self.line_no, text) else {
                continue;
            };
            if row.fields.len() != self.expected_fields {
                return Some(Err(SimBatchError::FieldCount {
                    line: row.line,
                    expected: self.expected_fields,
                    found: row.fields.len(),
                }));
            }
            return Some(Ok(row));
        }
    }
}
