//! Common types shared across the batch driver.
//!
//! This module provides the error taxonomy and the signal maps resolved from
//! the design metadata.

/// Error types and exit codes.
pub mod error;

/// Signal maps for design inputs and outputs.
pub mod signal;

pub use error::{Result, SimBatchError, EXIT_SETUP, EXIT_SIMULATOR};
pub use signal::SignalMap;
