//! Stage Sequence Builder.
//!
//! Compiles one input row into the ordered list of scratch directives that
//! configure a single simulation run. Directives are kept as typed values and
//! only rendered to the scratch tool's textual grammar at submission time.
//!
//! # Ordering
//!
//! The builder moves through three phases, each a distinct type, so the
//! required order cannot be violated at a call site:
//!
//! 1. [`StagePhase`]: the five display stages, each followed by its suspend index.
//! 2. [`InputPhase`]: one assignment per input field, in position order.
//! 3. [`OutputPhase`]: one on-exit capture per output signal.

use crate::common::{Result, SignalMap, SimBatchError};
use crate::config::RunConfig;
use crate::rows::InputRow;
use crate::sim::backend::SimBackend;
use crate::sim::metadata::DesignMetadata;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Type tag used when capturing the benchmark latency counter.
pub const LATENCY_TYPE: &str = "unsigned";

/// Simulator display toggles enabled before every run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayStage {
    IoPre,
    IoPost,
    Ticks,
    Pc,
    Disasm,
}

impl DisplayStage {
    /// All stages, in submission order.
    pub const ALL: [DisplayStage; 5] = [
        DisplayStage::IoPre,
        DisplayStage::IoPost,
        DisplayStage::Ticks,
        DisplayStage::Pc,
        DisplayStage::Disasm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DisplayStage::IoPre => "show_io_pre",
            DisplayStage::IoPost => "show_io_post",
            DisplayStage::Ticks => "show_ticks",
            DisplayStage::Pc => "show_pc",
            DisplayStage::Disasm => "show_disasm",
        }
    }

    /// Suspend index that follows this stage.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// How an output signal is rendered when the run exits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureKind {
    /// Rendered in the configured data type.
    Data(String),
    /// Rendered as an unsigned cycle counter.
    Latency,
}

impl CaptureKind {
    fn type_tag(&self) -> &str {
        match self {
            CaptureKind::Data(data_type) => data_type,
            CaptureKind::Latency => LATENCY_TYPE,
        }
    }
}

/// One scratch directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Display(DisplayStage),
    Suspend(u8),
    /// Sets `signal` to `value` at tick 0.
    Assign { signal: String, value: String },
    /// Shows `signal` on exit.
    Capture { signal: String, kind: CaptureKind },
}

impl Directive {
    /// Submits the directive to the scratch file through `backend`.
    pub fn submit<B: SimBackend + ?Sized>(&self, backend: &mut B, scratch_file: &Path) -> Result<()> {
        match self {
            Directive::Suspend(index) => backend.simbox_suspend(scratch_file, *index),
            other => backend.simbox_add(scratch_file, &other.to_string()),
        }
    }
}

impl fmt::Display for Directive {
    /// Formats the directive in the scratch tool's grammar.
    ///
    /// Suspend markers are not `-add` directives; they render as
    /// `suspend:<index>` for logging only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Display(stage) => write!(f, "config:{}", stage.name()),
            Directive::Suspend(index) => write!(f, "suspend:{}", index),
            Directive::Assign { signal, value } => write!(f, "absolute:0:set:{}:{}", signal, value),
            Directive::Capture { signal, kind } => {
                write!(f, "onexit:show:{}:{}", signal, kind.type_tag())
            }
        }
    }
}

/// The complete plan for simulating one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSequence {
    directives: Vec<Directive>,
    stop_on_valid_of: i64,
}

impl CommandSequence {
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Output index whose valid signal ends the run; `-1` when the design
    /// has no outputs.
    pub fn stop_on_valid_of(&self) -> i64 {
        self.stop_on_valid_of
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// Phase marker: display stages not yet added.
#[derive(Debug)]
pub struct StagePhase;

/// Phase marker: inputs not yet assigned.
#[derive(Debug)]
pub struct InputPhase;

/// Phase marker: outputs not yet captured.
#[derive(Debug)]
pub struct OutputPhase;

/// Phase-typed builder for a [`CommandSequence`].
#[derive(Debug)]
pub struct SequenceBuilder<P> {
    directives: Vec<Directive>,
    _phase: PhantomData<P>,
}

impl<P> SequenceBuilder<P> {
    fn advance<Q>(self) -> SequenceBuilder<Q> {
        SequenceBuilder {
            directives: self.directives,
            _phase: PhantomData,
        }
    }
}

impl Default for SequenceBuilder<StagePhase> {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceBuilder<StagePhase> {
    pub fn new() -> Self {
        Self {
            directives: Vec::new(),
            _phase: PhantomData,
        }
    }

    /// Adds the five display stages, each followed by its suspend index.
    pub fn display_stages(mut self) -> SequenceBuilder<InputPhase> {
        for stage in DisplayStage::ALL {
            self.directives.push(Directive::Display(stage));
            self.directives.push(Directive::Suspend(stage.ordinal()));
        }
        self.advance()
    }
}

impl SequenceBuilder<InputPhase> {
    /// Binds each row field to the input signal at the same position.
    ///
    /// # Errors
    ///
    /// `FieldCount` when the row does not have one field per input.
    pub fn assign_inputs(
        mut self,
        row: &InputRow,
        inputs: &SignalMap,
    ) -> Result<SequenceBuilder<OutputPhase>> {
        let field_count_error = || SimBatchError::FieldCount {
            line: row.line,
            expected: inputs.len(),
            found: row.fields.len(),
        };
        if row.fields.len() != inputs.len() {
            return Err(field_count_error());
        }
        let names = inputs.positional_names().ok_or_else(field_count_error)?;
        for (signal, value) in names.into_iter().zip(&row.fields) {
            self.directives.push(Directive::Assign {
                signal: signal.to_string(),
                value: value.clone(),
            });
        }
        Ok(self.advance())
    }
}

impl SequenceBuilder<OutputPhase> {
    /// Captures every output on exit and finishes the sequence.
    ///
    /// In benchmark mode the output named `o<N-1>` is the latency counter
    /// and is captured as unsigned instead of `data_type`.
    pub fn capture_outputs(
        mut self,
        outputs: &SignalMap,
        data_type: &str,
        benchcore: bool,
    ) -> CommandSequence {
        let last = outputs.len() as i64 - 1;
        let latency_signal = format!("o{}", last);
        for (_, signal) in outputs.iter_ordered() {
            let kind = if benchcore && signal == latency_signal {
                CaptureKind::Latency
            } else {
                CaptureKind::Data(data_type.to_string())
            };
            self.directives.push(Directive::Capture {
                signal: signal.to_string(),
                kind,
            });
        }
        CommandSequence {
            directives: self.directives,
            stop_on_valid_of: last,
        }
    }
}

/// Compiles the full sequence for one row.
pub fn compile(row: &InputRow, meta: &DesignMetadata, config: &RunConfig) -> Result<CommandSequence> {
    Ok(SequenceBuilder::new()
        .display_stages()
        .assign_inputs(row, &meta.inputs)?
        .capture_outputs(&meta.outputs, &config.data_type, config.modes.benchcore))
}
