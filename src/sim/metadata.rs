//! Design Metadata Resolution.
//!
//! Queries the design once, before any row is processed, for its input and
//! output ports and for the prefix the simulator puts in front of numeric
//! literals of the configured data type. Any failure here aborts the batch.

use crate::common::{Result, SignalMap, SimBatchError};
use crate::sim::backend::{SignalKind, SimBackend};
use tracing::{debug, info, warn};

/// Everything the batch needs to know about the compiled design.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesignMetadata {
    /// Input signals keyed by zero-based position.
    pub inputs: SignalMap,
    /// Output signals keyed by logical name.
    pub outputs: SignalMap,
    /// Numeric-literal prefix for the configured data type.
    pub prefix: String,
}

/// Resolves inputs, outputs and prefix through `backend`.
///
/// # Errors
///
/// `MetadataUnavailable` when a query fails or when the input positions are
/// not exactly `0..N`. An empty output listing is accepted.
pub fn resolve<B: SimBackend + ?Sized>(backend: &mut B, data_type: &str) -> Result<DesignMetadata> {
    let inputs = SignalMap::from_listing(&backend.list_signals(SignalKind::Inputs)?);
    if inputs.positional_names().is_none() {
        return Err(SimBatchError::MetadataUnavailable {
            query: SignalKind::Inputs.flag().to_string(),
            reason: "input positions are not numbered 0..N".to_string(),
        });
    }

    let outputs = SignalMap::from_listing(&backend.list_signals(SignalKind::Outputs)?);
    if outputs.is_empty() {
        warn!("design lists no outputs; the simulator will not stop on a valid signal");
    }

    let prefix = backend.get_prefix(data_type)?;

    info!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        prefix = %prefix,
        "resolved design metadata"
    );
    debug!(?inputs, ?outputs, "signal maps");

    Ok(DesignMetadata {
        inputs,
        outputs,
        prefix,
    })
}
