//! Batch statistics collection and reporting.
//!
//! Tracks how many input rows were read, simulated and skipped, and how long
//! the batch took on the host.

use crate::common::{Result, SimBatchError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Counters for one batch run.
#[derive(Debug)]
pub struct BatchStats {
    start_time: Instant,
    pub rows_read: u64,
    pub rows_simulated: u64,
    pub rows_skipped: u64,
}

/// Serializable snapshot of [`BatchStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub rows_read: u64,
    pub rows_simulated: u64,
    pub rows_skipped: u64,
    pub host_seconds: f64,
}

impl Default for BatchStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            rows_read: 0,
            rows_simulated: 0,
            rows_skipped: 0,
        }
    }
}

impl BatchStats {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            rows_read: self.rows_read,
            rows_simulated: self.rows_simulated,
            rows_skipped: self.rows_skipped,
            host_seconds: self.start_time.elapsed().as_secs_f64(),
        }
    }

    /// Prints a formatted summary of the batch.
    pub fn print(&self) {
        let summary = self.summary();
        let per_row = if summary.rows_simulated > 0 {
            summary.host_seconds / summary.rows_simulated as f64
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("SIMBATCH STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", summary.host_seconds);
        println!("rows.read                {}", summary.rows_read);
        println!("rows.simulated           {}", summary.rows_simulated);
        println!("rows.skipped             {}", summary.rows_skipped);
        println!("seconds_per_row          {:.4} s", per_row);
        println!("==========================================================");
    }

    /// Writes the summary as pretty-printed JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let write_error = |source: std::io::Error| SimBatchError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(&self.summary())
            .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        fs::write(path, json).map_err(write_error)
    }
}
