//! Integration tests for the process backend against scripted tools.
#![cfg(unix)]

use simbatch::batch;
use simbatch::common::SimBatchError;
use simbatch::config::{ModeFlags, RunConfig, ToolsConfig};
use simbatch::sim::{ProcessBackend, SignalKind, SimBackend};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tempfile::tempdir;

/// Serializes script installation and spawning; writing an executable while
/// another thread forks can fail with ETXTBSY.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

const BONDMACHINE: &str = r#"#!/bin/sh
echo "bondmachine $*" >> "$(dirname "$0")/calls.log"
case "$*" in
  *-list-inputs*) printf '0 i0\n1 i1\nnot a pair line\n' ;;
  *-list-outputs*) printf 'o0 o0\no1 o1\n' ;;
  *-sim-stop-on-valid-of*) echo "0f5.0 0f6.0" ;;
  *) exit 3 ;;
esac
"#;

const BMNUMBERS: &str = r#"#!/bin/sh
echo "bmnumbers $*" >> "$(dirname "$0")/calls.log"
echo 0f
"#;

const SIMBOX: &str = r#"#!/bin/sh
printf '%s\n' "$4" >> "$2"
printf '%s %s\n' "$3" "$4" >> "$(dirname "$2")/simbox.log"
"#;

fn install(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

fn scripted_config(dir: &Path) -> RunConfig {
    let bin = dir.join("bin");
    fs::create_dir(&bin).unwrap();
    let input_file = dir.join("simbatch_input.csv");
    fs::write(&input_file, "1,2\n3,4\n").unwrap();
    RunConfig {
        working_dir: dir.to_path_buf(),
        input_file,
        output_file: dir.join("simbatch_output.csv"),
        modes: ModeFlags {
            header: true,
            omit_prefix: true,
            ..ModeFlags::default()
        },
        tools: ToolsConfig {
            bondmachine: install(&bin, "bondmachine", BONDMACHINE),
            bmnumbers: install(&bin, "bmnumbers", BMNUMBERS),
            simbox: install(&bin, "simbox", SIMBOX),
        },
        ..RunConfig::default()
    }
}

/// Tests a full batch against scripted collaborators.
#[test]
fn test_scripted_batch() {
    let _guard = spawn_lock();
    let dir = tempdir().unwrap();
    let config = scripted_config(dir.path());
    let mut backend = ProcessBackend::new(&config);

    let (config, stats) = batch::run(config, &mut backend).unwrap();

    assert_eq!(
        fs::read_to_string(&config.output_file).unwrap(),
        "\n5.0,6.0\n5.0,6.0\n"
    );
    assert_eq!(stats.rows_simulated, 2);
    assert!(!config.scratch_file().exists());

    let log = fs::read_to_string(dir.path().join("simbox.log")).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 28);
    assert_eq!(lines[0], "-add config:show_io_pre");
    assert_eq!(lines[1], "-suspend 0");
    assert_eq!(lines[10], "-add absolute:0:set:i0:1");
    assert_eq!(lines[13], "-add onexit:show:o1:float32");
    assert_eq!(lines[24], "-add absolute:0:set:i0:3");
}

fn calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("bin").join("calls.log"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Tests the exact argument vectors passed to the metadata and simulator tools.
#[test]
fn test_tool_argument_order() {
    let _guard = spawn_lock();
    let dir = tempdir().unwrap();
    let config = RunConfig {
        linear_data_range: Some("ranges.json".into()),
        delays_file: Some("delays.json".into()),
        ..scripted_config(dir.path())
    };
    let mut backend = ProcessBackend::new(&config);

    batch::run(config, &mut backend).unwrap();

    let wd = dir.path().display();
    let simulate = format!(
        "bondmachine -bondmachine-file {wd}/bondmachine.json -sim-delays-file delays.json \
         -simbox-file {wd}/simboxtemp.json -sim-stop-on-valid-of 1 -sim -sim-interactions 200 \
         -linear-data-range ranges.json"
    );
    assert_eq!(
        calls(dir.path()),
        vec![
            format!("bondmachine -bondmachine-file {wd}/bondmachine.json -list-inputs -linear-data-range ranges.json"),
            format!("bondmachine -bondmachine-file {wd}/bondmachine.json -list-outputs -linear-data-range ranges.json"),
            "bmnumbers -get-prefix float32 -linear-data-range ranges.json".to_string(),
            simulate.clone(),
            simulate,
        ]
    );
}

/// Tests that a design listing no outputs is simulated with stop index -1.
#[test]
fn test_no_outputs_passes_negative_stop_index() {
    let _guard = spawn_lock();
    let dir = tempdir().unwrap();
    let mut config = scripted_config(dir.path());
    let no_outputs = BONDMACHINE.replace("printf 'o0 o0\\no1 o1\\n'", "true");
    config.tools.bondmachine = install(&dir.path().join("bin"), "bondmachine-bare", &no_outputs);
    let mut backend = ProcessBackend::new(&config);

    let (_, stats) = batch::run(config, &mut backend).unwrap();

    assert_eq!(stats.rows_simulated, 2);
    let simulations: Vec<String> = calls(dir.path())
        .into_iter()
        .filter(|c| c.contains(" -sim "))
        .collect();
    assert_eq!(simulations.len(), 2);
    assert!(simulations
        .iter()
        .all(|c| c.contains("-sim-stop-on-valid-of -1 -sim ")));
}

/// Tests raw metadata listing and prefix through the process backend.
#[test]
fn test_listing_through_process() {
    let _guard = spawn_lock();
    let dir = tempdir().unwrap();
    let config = scripted_config(dir.path());
    let mut backend = ProcessBackend::new(&config);

    let listing = backend.list_signals(SignalKind::Inputs).unwrap();
    assert!(listing.contains("not a pair line"));
    assert_eq!(backend.get_prefix("float32").unwrap(), "0f");
}

/// Tests that a failing simbox call surfaces as a directive error.
#[test]
fn test_failing_simbox_is_directive_error() {
    let _guard = spawn_lock();
    let dir = tempdir().unwrap();
    let mut config = scripted_config(dir.path());
    config.tools.simbox = install(&dir.path().join("bin"), "simbox-broken", "#!/bin/sh\nexit 1\n");
    let mut backend = ProcessBackend::new(&config);

    let err = batch::run(config, &mut backend).unwrap_err();

    match &err {
        SimBatchError::Directive { command, .. } => {
            assert!(command.contains("-add \"config:show_io_pre\""));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 2);
}

/// Tests that unresolvable tools are reported before anything runs.
#[test]
fn test_missing_tool_is_reported() {
    let tools = ToolsConfig {
        simbox: "simbatch-definitely-not-installed".into(),
        ..ToolsConfig::default()
    };
    match tools.resolve() {
        Err(SimBatchError::ToolNotFound { .. }) => {}
        other => panic!("expected ToolNotFound, got {other:?}"),
    }
}
