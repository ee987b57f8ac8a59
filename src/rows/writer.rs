//! Row Writer.
//!
//! Buffered CSV output, opened once per batch and appended to row by row.

use crate::common::{Result, SimBatchError};
use crate::config::ModeFlags;
use crate::decode::OutputRow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Builds the header line for `output_count` resolved outputs.
///
/// ML mode names one probability column per output plus the class column;
/// benchmark mode appends the latency column. With neither mode the header
/// is an empty line.
pub fn header_line(output_count: usize, modes: ModeFlags) -> String {
    let mut header = String::new();
    if modes.ml {
        for i in 0..output_count {
            header.push_str(&format!("probability_{},", i));
        }
        header.push_str("classification");
    }
    if modes.benchcore {
        header.push_str(",latency_cycles");
    }
    header
}

/// Appends decoded rows to the output file.
#[derive(Debug)]
pub struct RowWriter<W: Write> {
    out: BufWriter<W>,
    path: PathBuf,
}

impl RowWriter<File> {
    /// Creates (or truncates) the output file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| SimBatchError::CreateOutput {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file, path))
    }
}

impl<W: Write> RowWriter<W> {
    pub fn new(inner: W, path: &Path) -> Self {
        Self {
            out: BufWriter::new(inner),
            path: path.to_path_buf(),
        }
    }

    pub fn write_header(&mut self, output_count: usize, modes: ModeFlags) -> Result<()> {
        let header = header_line(output_count, modes);
        self.write_line(&header)
    }

    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        self.write_line(&row.to_string())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(|source| self.write_error(source))
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let path = self.path;
        self.out
            .into_inner()
            .map_err(|e| SimBatchError::OutputWrite {
                path,
                source: e.into_error(),
            })
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line).map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> SimBatchError {
        SimBatchError::OutputWrite {
            path: self.path.clone(),
            source,
        }
    }
}
