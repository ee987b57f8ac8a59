//! SimBatch CLI.
//!
//! Runs batch simulations of a BondMachine design using a CSV input file and
//! producing a CSV output file. The design must already be compiled in the
//! working directory as `bondmachine.json`.
//!
//! # Usage
//!
//! ```text
//! simbatch -w working_dir -i input.csv -o out.csv -s 200
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

extern crate simbatch;

use simbatch::batch;
use simbatch::common::{Result, SimBatchError};
use simbatch::config::{
    FileConfig, ModeFlags, RunConfig, ScratchConfig, ToolsConfig, DEFAULT_DATA_TYPE,
    DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_NAME, DEFAULT_SIMULATION_STEPS, DEFAULT_WORKING_DIR,
};
use simbatch::sim::ProcessBackend;

/// Command-line arguments for the batch driver.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "SimBatch: a batch simulator for BondMachine designs"
)]
struct Args {
    /// Working directory containing bondmachine.json.
    #[arg(short = 'w', long, default_value = DEFAULT_WORKING_DIR)]
    working_dir: PathBuf,

    /// Input CSV file.
    #[arg(short = 'i', long, default_value = DEFAULT_INPUT_FILE)]
    input_file: PathBuf,

    /// Output CSV file [default: <working_dir>/simbatch_output.csv].
    #[arg(short = 'o', long)]
    output_file: Option<PathBuf>,

    /// Number of simulation steps.
    #[arg(short = 's', long, default_value_t = DEFAULT_SIMULATION_STEPS)]
    simulation_steps: u32,

    /// Enable ML output formatting (probabilities + classification).
    #[arg(short = 'm', long)]
    ml: bool,

    /// Enable benchcore mode (last output is a latency counter).
    #[arg(short = 'b', long)]
    benchcore: bool,

    /// Include a header row in the output CSV.
    #[arg(short = 'H', long)]
    header: bool,

    /// Keep the data type prefix in the output CSV.
    #[arg(short = 'P', long)]
    prefix: bool,

    /// Data type of the outputs.
    #[arg(short = 'd', long, default_value = DEFAULT_DATA_TYPE)]
    data_type: String,

    /// Linear data range passed to bondmachine and bmnumbers.
    #[arg(short = 'l', long)]
    linear_data_range: Option<String>,

    /// Ignored: always derived from the number of outputs.
    #[arg(short = 'v', long, allow_negative_numbers = true)]
    stop_on_valid_of: Option<i64>,

    /// Per-step delays file passed to the simulator.
    #[arg(short = 'y', long)]
    delays_file: Option<PathBuf>,

    /// TOML file naming the external tools.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the batch statistics as JSON to this file.
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(short = 'q', long)]
    quiet: bool,
}

/// Builds the run configuration from the command line and the tool config.
fn build_config(args: &Args) -> Result<RunConfig> {
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let tools: ToolsConfig = file.tools.resolve()?;
    let scratch: ScratchConfig = file.scratch;

    if let Some(requested) = args.stop_on_valid_of {
        debug!(requested, "stop-on-valid-of is derived from the output count");
    }

    let output_file = args
        .output_file
        .clone()
        .unwrap_or_else(|| args.working_dir.join(DEFAULT_OUTPUT_NAME));

    Ok(RunConfig {
        working_dir: args.working_dir.clone(),
        input_file: args.input_file.clone(),
        output_file,
        simulation_steps: args.simulation_steps,
        modes: ModeFlags {
            ml: args.ml,
            benchcore: args.benchcore,
            header: args.header,
            omit_prefix: !args.prefix,
        },
        data_type: args.data_type.clone(),
        linear_data_range: args.linear_data_range.clone(),
        delays_file: args.delays_file.clone(),
        prefix: String::new(),
        tools,
        scratch,
    })
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(err: SimBatchError) -> ! {
    eprintln!("\n[!] FATAL: {}", err);
    process::exit(err.exit_code());
}

/// Main entry point for the batch driver.
///
/// # Behavior
///
/// 1. **Configuration**: Parses flags, loads the optional tool config and
///    resolves the tools on `PATH`.
/// 2. **Metadata**: Lists the design inputs and outputs and fetches the prefix.
/// 3. **Batch**: Simulates every input row in order and writes the output CSV.
/// 4. **Teardown**: Prints batch statistics. Fatal errors exit with 1 (setup,
///    I/O) or 2 (simulator interaction).
fn main() {
    let args = Args::parse();
    init_logging(args.quiet);

    let config = build_config(&args).unwrap_or_else(|e| fail(e));

    println!("SimBatch Configuration");
    println!("----------------------");
    println!("  Working Dir:        {}", config.working_dir.display());
    println!("  Input File:         {}", config.input_file.display());
    println!("  Output File:        {}", config.output_file.display());
    println!("  Simulation Steps:   {}", config.simulation_steps);
    println!("  Data Type:          {}", config.data_type);
    println!(
        "  Modes:              ml={} benchcore={} header={} prefix={}",
        config.modes.ml, config.modes.benchcore, config.modes.header, !config.modes.omit_prefix
    );
    println!("----------------------");

    let mut backend = ProcessBackend::new(&config);
    let (_, stats) = batch::run(config, &mut backend).unwrap_or_else(|e| fail(e));

    stats.print();
    if let Some(path) = &args.summary_json {
        stats.write_json(path).unwrap_or_else(|e| fail(e));
    }
}
