//! Batch orchestration.
//!
//! Resolves the design metadata once, then pushes every input row through
//! compile, simulate, decode and write, strictly one row at a time. A
//! malformed row is reported and skipped; any other error stops the batch
//! after the rows written so far have been flushed.

use crate::common::Result;
use crate::config::RunConfig;
use crate::decode::decode;
use crate::rows::{InputRow, RowReader, RowWriter};
use crate::sim::backend::SimBackend;
use crate::sim::invoker::simulate_row;
use crate::sim::metadata::{self, DesignMetadata};
use crate::sim::sequence;
use crate::stats::BatchStats;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Runs a whole batch as described by `config`.
///
/// The returned config carries the resolved prefix.
pub fn run<B: SimBackend + ?Sized>(
    config: RunConfig,
    backend: &mut B,
) -> Result<(RunConfig, BatchStats)> {
    let meta = metadata::resolve(&mut *backend, &config.data_type)?;
    let config = config.with_prefix(meta.prefix.clone());

    let reader = RowReader::open(&config.input_file, meta.inputs.len())?;
    let mut writer = RowWriter::create(&config.output_file)?;
    info!(
        input = %config.input_file.display(),
        output = %config.output_file.display(),
        "starting batch"
    );

    let mut stats = BatchStats::default();
    BatchRunner::new(&config, &meta, backend).run(reader, &mut writer, &mut stats)?;
    Ok((config, stats))
}

/// Per-row pipeline over a resolved design.
pub struct BatchRunner<'a, B: SimBackend + ?Sized> {
    config: &'a RunConfig,
    meta: &'a DesignMetadata,
    backend: &'a mut B,
}

impl<'a, B: SimBackend + ?Sized> BatchRunner<'a, B> {
    pub fn new(config: &'a RunConfig, meta: &'a DesignMetadata, backend: &'a mut B) -> Self {
        Self {
            config,
            meta,
            backend,
        }
    }

    /// Processes every row from `reader` into `writer`.
    ///
    /// The writer is flushed on success and on failure alike.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        reader: RowReader<R>,
        writer: &mut RowWriter<W>,
        stats: &mut BatchStats,
    ) -> Result<()> {
        let result = self.process_all(reader, writer, stats);
        let flushed = writer.flush();
        result.and(flushed)
    }

    fn process_all<R: BufRead, W: Write>(
        &mut self,
        reader: RowReader<R>,
        writer: &mut RowWriter<W>,
        stats: &mut BatchStats,
    ) -> Result<()> {
        if self.config.modes.header {
            writer.write_header(self.meta.outputs.len(), self.config.modes)?;
        }

        for item in reader {
            stats.rows_read += 1;
            match item.and_then(|row| self.process_row(&row, writer)) {
                Ok(()) => stats.rows_simulated += 1,
                Err(e) if e.is_recoverable() => {
                    warn!("{}", e);
                    stats.rows_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn process_row<W: Write>(&mut self, row: &InputRow, writer: &mut RowWriter<W>) -> Result<()> {
        let sequence = sequence::compile(row, self.meta, self.config)?;
        println!("[SimBatch] Running simulation with inputs: {}", row.text());

        let raw = simulate_row(
            &mut *self.backend,
            &self.config.scratch_file(),
            &sequence,
            self.config.simulation_steps,
        )?;
        let decoded = decode(&raw, &self.config.prefix, self.config.modes);
        writer.write_row(&decoded)
    }
}
