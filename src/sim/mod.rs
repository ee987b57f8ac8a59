//! Simulator collaborator plumbing.
//!
//! Resolves design metadata, compiles each row into scratch directives and
//! drives the external simulator through the [`backend::SimBackend`] seam.

/// External tool interface and its process-based implementation.
pub mod backend;

/// Simulation invocation for one compiled row.
pub mod invoker;

/// Design metadata resolution.
pub mod metadata;

/// Stage sequence compilation.
pub mod sequence;

/// Scoped scratch file handling.
pub mod simbox;

pub use backend::{ProcessBackend, SignalKind, SimBackend, SimulationRequest};
pub use metadata::DesignMetadata;
pub use sequence::{CommandSequence, Directive, DisplayStage};
