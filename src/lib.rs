//! BondMachine Batch Simulation Driver.
//!
//! This crate drives an external hardware simulator over a CSV file of input
//! vectors. Each row is compiled into a sequence of scratch directives, run
//! through the simulator once, and the simulator's result line is decoded
//! back into a CSV output row.
//!
//! # Architecture
//!
//! * **Metadata**: input/output signal maps and the numeric prefix, resolved once.
//! * **Sequence**: phase-typed compilation of display stages, input assignments
//!   and output captures.
//! * **Invoker**: scoped scratch state plus one blocking simulator run per row.
//! * **Decoder**: plain, ML (probabilities + class) and benchmark (latency) rows.
//!
//! # Modules
//!
//! * `batch`: Per-row pipeline and batch entry point.
//! * `common`: Error taxonomy and signal maps.
//! * `config`: Run configuration and tool configuration file.
//! * `decode`: Result line decoding.
//! * `rows`: CSV row reader and writer.
//! * `sim`: Simulator collaborator plumbing.
//! * `stats`: Batch statistics.

/// Batch orchestration over a resolved design.
pub mod batch;

/// Shared error types and signal maps.
pub mod common;

/// Run configuration and the optional TOML tool configuration.
pub mod config;

/// Decoding of simulator result lines into output rows.
pub mod decode;

/// CSV input row reading and output row writing.
pub mod rows;

/// Metadata resolution, sequence compilation and simulator invocation.
///
/// All contact with the external tools goes through the `SimBackend` trait so
/// the pipeline can be exercised without the real simulator.
pub mod sim;

/// Batch statistics collection and reporting.
pub mod stats;
