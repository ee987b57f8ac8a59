use crate::common::{Result, SimBatchError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_WORKING_DIR: &str = "working_dir";
pub const DEFAULT_INPUT_FILE: &str = "simbatch_input.csv";
pub const DEFAULT_OUTPUT_NAME: &str = "simbatch_output.csv";
pub const DEFAULT_SIMULATION_STEPS: u32 = 200;
pub const DEFAULT_DATA_TYPE: &str = "float32";

const DESIGN_FILE: &str = "bondmachine.json";
const SCRATCH_FILE: &str = "simboxtemp.json";

/// Optional TOML file naming the external tools.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub scratch: ScratchConfig,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SimBatchError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&content).map_err(|reason| SimBatchError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_bondmachine")]
    pub bondmachine: String,

    #[serde(default = "default_bmnumbers")]
    pub bmnumbers: String,

    #[serde(default = "default_simbox")]
    pub simbox: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            bondmachine: default_bondmachine(),
            bmnumbers: default_bmnumbers(),
            simbox: default_simbox(),
        }
    }
}

impl ToolsConfig {
    /// Resolves every tool on `PATH`, failing on the first one missing.
    pub fn resolve(&self) -> Result<ToolsConfig> {
        let find = |tool: &str| {
            which::which(tool)
                .map(|p| p.to_string_lossy().into_owned())
                .map_err(|_| SimBatchError::ToolNotFound {
                    tool: tool.to_string(),
                })
        };
        Ok(ToolsConfig {
            bondmachine: find(&self.bondmachine)?,
            bmnumbers: find(&self.bmnumbers)?,
            simbox: find(&self.simbox)?,
        })
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScratchConfig {
    #[serde(default = "default_scratch_file")]
    pub file_name: String,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            file_name: default_scratch_file(),
        }
    }
}

fn default_bondmachine() -> String {
    "bondmachine".to_string()
}

fn default_bmnumbers() -> String {
    "bmnumbers".to_string()
}

fn default_simbox() -> String {
    "simbox".to_string()
}

fn default_scratch_file() -> String {
    SCRATCH_FILE.to_string()
}

/// Output mode switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub ml: bool,
    pub benchcore: bool,
    pub header: bool,
    pub omit_prefix: bool,
}

/// Settings for one batch run. Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub working_dir: PathBuf,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub simulation_steps: u32,
    pub modes: ModeFlags,
    pub data_type: String,
    pub linear_data_range: Option<String>,
    pub delays_file: Option<PathBuf>,
    pub prefix: String,
    pub tools: ToolsConfig,
    pub scratch: ScratchConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let working_dir = PathBuf::from(DEFAULT_WORKING_DIR);
        Self {
            output_file: working_dir.join(DEFAULT_OUTPUT_NAME),
            working_dir,
            input_file: PathBuf::from(DEFAULT_INPUT_FILE),
            simulation_steps: DEFAULT_SIMULATION_STEPS,
            modes: ModeFlags {
                omit_prefix: true,
                ..ModeFlags::default()
            },
            data_type: DEFAULT_DATA_TYPE.to_string(),
            linear_data_range: None,
            delays_file: None,
            prefix: String::new(),
            tools: ToolsConfig::default(),
            scratch: ScratchConfig::default(),
        }
    }
}

impl RunConfig {
    /// Returns the config with the resolved numeric prefix filled in.
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..self
        }
    }

    /// Path of the compiled design inside the working directory.
    pub fn design_file(&self) -> PathBuf {
        self.working_dir.join(DESIGN_FILE)
    }

    /// Path of the scratch file shared by every row of the batch.
    pub fn scratch_file(&self) -> PathBuf {
        self.working_dir.join(&self.scratch.file_name)
    }

    /// Arguments forwarding the linear data range, empty when unset.
    pub fn range_args(&self) -> Vec<String> {
        match &self.linear_data_range {
            Some(range) => vec!["-linear-data-range".to_string(), range.clone()],
            None => Vec::new(),
        }
    }

    /// Arguments forwarding the per-step delays file, empty when unset.
    pub fn delay_args(&self) -> Vec<String> {
        match &self.delays_file {
            Some(file) => vec![
                "-sim-delays-file".to_string(),
                file.to_string_lossy().into_owned(),
            ],
            None => Vec::new(),
        }
    }
}
