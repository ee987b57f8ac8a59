//! Error taxonomy for the batch driver.
//!
//! Errors split into two classes. Fatal errors abort the whole batch and map
//! to a process exit code; the only recoverable error is a malformed input row,
//! which is reported and skipped.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for setup and I/O failures.
pub const EXIT_SETUP: i32 = 1;

/// Exit code for failures while talking to the simulator tools.
pub const EXIT_SIMULATOR: i32 = 2;

/// Errors raised while driving a batch.
#[derive(Debug, Error)]
pub enum SimBatchError {
    #[error("metadata unavailable from `{query}`: {reason}")]
    MetadataUnavailable { query: String, reason: String },

    #[error("tool `{tool}` not found on PATH")]
    ToolNotFound { tool: String },

    #[error("invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("cannot open input file {path}: {source}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output file {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error reading input file {path}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: the input file has an invalid number of columns (expected {expected}, found {found})")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("error preparing simbox command: {command}\n{detail}")]
    Directive { command: String, detail: String },

    #[error("error running simulation: {command}\n{detail}")]
    Simulation { command: String, detail: String },
}

impl SimBatchError {
    /// Returns the process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SimBatchError::Directive { .. } | SimBatchError::Simulation { .. } => EXIT_SIMULATOR,
            _ => EXIT_SETUP,
        }
    }

    /// Whether the batch may continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimBatchError::FieldCount { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimBatchError>;
