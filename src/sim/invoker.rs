//! Simulation Invoker.
//!
//! Replays a compiled [`CommandSequence`] into a freshly reset scratch file and
//! runs the simulator once against it.

use crate::common::Result;
use crate::sim::backend::{SimBackend, SimulationRequest};
use crate::sim::sequence::CommandSequence;
use crate::sim::simbox::Scratch;
use std::path::Path;
use tracing::trace;

/// Submits `sequence` and returns the simulator's raw result text.
///
/// The scratch file is reset before the first directive and discarded when
/// this returns, whether it succeeds or not. Any failed submission or
/// simulation is returned as-is; nothing is retried.
pub fn simulate_row<B: SimBackend + ?Sized>(
    backend: &mut B,
    scratch_file: &Path,
    sequence: &CommandSequence,
    steps: u32,
) -> Result<String> {
    let scratch = Scratch::acquire(scratch_file)?;

    for directive in sequence.directives() {
        trace!(%directive, "submitting");
        directive.submit(backend, scratch.path())?;
    }

    backend.simulate(&SimulationRequest {
        scratch_file: scratch.path().to_path_buf(),
        stop_on_valid_of: sequence.stop_on_valid_of(),
        steps,
    })
}
