//! Collaborator Backend.
//!
//! The driver never simulates anything itself. Every interaction with the
//! design goes through the [`SimBackend`] trait: metadata queries, scratch
//! directives and the simulation run. [`ProcessBackend`] implements it by
//! spawning the external tools, one blocking invocation per call.

use crate::common::{Result, SimBatchError};
use crate::config::RunConfig;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Which side of the design a metadata query lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Inputs,
    Outputs,
}

impl SignalKind {
    /// Returns the metadata tool flag selecting this listing.
    pub fn flag(self) -> &'static str {
        match self {
            SignalKind::Inputs => "-list-inputs",
            SignalKind::Outputs => "-list-outputs",
        }
    }
}

/// Parameters of one simulator invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationRequest {
    /// Scratch file holding the compiled directives.
    pub scratch_file: PathBuf,
    /// Output index whose valid signal ends the run, `-1` for none.
    pub stop_on_valid_of: i64,
    /// Upper bound on simulation interactions.
    pub steps: u32,
}

/// Interface to the external simulator tools.
///
/// Each method corresponds to exactly one external invocation and is
/// attempted once; there is no retry.
pub trait SimBackend {
    /// Returns the raw `key value` listing of the design inputs or outputs.
    fn list_signals(&mut self, kind: SignalKind) -> Result<String>;

    /// Returns the numeric-literal prefix for `data_type`.
    fn get_prefix(&mut self, data_type: &str) -> Result<String>;

    /// Appends a directive to the scratch file.
    fn simbox_add(&mut self, scratch_file: &Path, directive: &str) -> Result<()>;

    /// Appends a suspend marker with the given index to the scratch file.
    fn simbox_suspend(&mut self, scratch_file: &Path, index: u8) -> Result<()>;

    /// Runs the simulation and returns its result text.
    fn simulate(&mut self, request: &SimulationRequest) -> Result<String>;
}

/// Backend spawning the real tools as child processes.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    bondmachine: String,
    bmnumbers: String,
    simbox: String,
    design_file: PathBuf,
    range_args: Vec<String>,
    delay_args: Vec<String>,
}

impl ProcessBackend {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            bondmachine: config.tools.bondmachine.clone(),
            bmnumbers: config.tools.bmnumbers.clone(),
            simbox: config.tools.simbox.clone(),
            design_file: config.design_file(),
            range_args: config.range_args(),
            delay_args: config.delay_args(),
        }
    }

    fn design_args(&self) -> Vec<String> {
        vec![
            "-bondmachine-file".to_string(),
            self.design_file.to_string_lossy().into_owned(),
        ]
    }

    fn simbox_args(&self, scratch_file: &Path) -> Vec<String> {
        vec![
            "-simbox-file".to_string(),
            scratch_file.to_string_lossy().into_owned(),
        ]
    }
}

impl SimBackend for ProcessBackend {
    fn list_signals(&mut self, kind: SignalKind) -> Result<String> {
        let mut args = self.design_args();
        args.push(kind.flag().to_string());
        args.extend(self.range_args.iter().cloned());
        run_tool(&self.bondmachine, &args).map_err(|failure| SimBatchError::MetadataUnavailable {
            query: failure.command,
            reason: failure.detail,
        })
    }

    fn get_prefix(&mut self, data_type: &str) -> Result<String> {
        let mut args = vec!["-get-prefix".to_string(), data_type.to_string()];
        args.extend(self.range_args.iter().cloned());
        let out = run_tool(&self.bmnumbers, &args).map_err(|failure| {
            SimBatchError::MetadataUnavailable {
                query: failure.command,
                reason: failure.detail,
            }
        })?;
        Ok(out.trim().to_string())
    }

    fn simbox_add(&mut self, scratch_file: &Path, directive: &str) -> Result<()> {
        let mut args = self.simbox_args(scratch_file);
        args.push("-add".to_string());
        args.push(directive.to_string());
        run_tool(&self.simbox, &args).map_err(ToolFailure::into_directive)?;
        Ok(())
    }

    fn simbox_suspend(&mut self, scratch_file: &Path, index: u8) -> Result<()> {
        let mut args = self.simbox_args(scratch_file);
        args.push("-suspend".to_string());
        args.push(index.to_string());
        run_tool(&self.simbox, &args).map_err(ToolFailure::into_directive)?;
        Ok(())
    }

    fn simulate(&mut self, request: &SimulationRequest) -> Result<String> {
        let mut args = self.design_args();
        args.extend(self.delay_args.iter().cloned());
        args.extend(self.simbox_args(&request.scratch_file));
        args.push("-sim-stop-on-valid-of".to_string());
        args.push(request.stop_on_valid_of.to_string());
        args.push("-sim".to_string());
        args.push("-sim-interactions".to_string());
        args.push(request.steps.to_string());
        args.extend(self.range_args.iter().cloned());
        run_tool(&self.bondmachine, &args).map_err(|failure| SimBatchError::Simulation {
            command: failure.command,
            detail: failure.detail,
        })
    }
}

/// A failed invocation, with the command rendered for manual reproduction.
#[derive(Debug)]
struct ToolFailure {
    command: String,
    detail: String,
}

impl ToolFailure {
    fn into_directive(self) -> SimBatchError {
        SimBatchError::Directive {
            command: self.command,
            detail: self.detail,
        }
    }
}

/// Renders a command line the way a user would type it in a shell.
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == ':' || c == '"') {
            line.push('"');
            line.push_str(&arg.replace('"', "\\\""));
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// Runs `program` to completion and returns its stdout.
fn run_tool(program: &str, args: &[String]) -> std::result::Result<String, ToolFailure> {
    let command = render_command(program, args);
    debug!(%command, "invoking tool");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ToolFailure {
            command: command.clone(),
            detail: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ToolFailure {
            command,
            detail: format!("{}, output: {}{}", output.status, stdout, stderr),
        });
    }
    if !stderr.trim().is_empty() {
        debug!(%command, stderr = %stderr.trim(), "tool wrote to stderr");
    }
    Ok(stdout)
}
