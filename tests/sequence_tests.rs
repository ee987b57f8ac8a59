//! Integration tests for stage sequence compilation.

use simbatch::common::SignalMap;
use simbatch::config::{ModeFlags, RunConfig};
use simbatch::rows::InputRow;
use simbatch::sim::sequence::{compile, CaptureKind, Directive, DisplayStage};
use simbatch::sim::DesignMetadata;

fn metadata(inputs: usize, outputs: usize) -> DesignMetadata {
    DesignMetadata {
        inputs: (0..inputs)
            .map(|i| (i.to_string(), format!("i{}", i)))
            .collect(),
        outputs: (0..outputs)
            .map(|i| (format!("o{}", i), format!("o{}", i)))
            .collect(),
        prefix: "0f".into(),
    }
}

fn row_of(n: usize) -> InputRow {
    InputRow {
        line: 1,
        fields: (0..n).map(|i| format!("{}.5", i)).collect(),
    }
}

/// Tests the fixed display prologue for several design shapes.
#[test]
fn test_display_prologue_is_fixed() {
    let config = RunConfig::default();
    for (inputs, outputs) in [(0, 1), (1, 1), (3, 2), (8, 10)] {
        let seq = compile(&row_of(inputs), &metadata(inputs, outputs), &config).unwrap();
        let prologue = &seq.directives()[..10];
        for (i, stage) in DisplayStage::ALL.iter().enumerate() {
            assert_eq!(prologue[2 * i], Directive::Display(*stage));
            assert_eq!(prologue[2 * i + 1], Directive::Suspend(i as u8));
        }
        assert_eq!(seq.len(), 10 + inputs + outputs);
    }
}

/// Tests one assignment per input, in position order.
#[test]
fn test_input_assignments_follow_positions() {
    let config = RunConfig::default();
    let seq = compile(&row_of(3), &metadata(3, 1), &config).unwrap();

    let assigns: Vec<&Directive> = seq
        .directives()
        .iter()
        .filter(|d| matches!(d, Directive::Assign { .. }))
        .collect();
    assert_eq!(assigns.len(), 3);
    assert_eq!(assigns[0].to_string(), "absolute:0:set:i0:0.5");
    assert_eq!(assigns[2].to_string(), "absolute:0:set:i2:2.5");
}

/// Tests that outputs use the configured data type unless benchmarking.
#[test]
fn test_capture_kinds() {
    let mut config = RunConfig {
        data_type: "fixed16".into(),
        ..RunConfig::default()
    };
    let meta = metadata(1, 3);

    let plain = compile(&row_of(1), &meta, &config).unwrap();
    assert!(plain.directives().iter().all(|d| match d {
        Directive::Capture { kind, .. } => *kind == CaptureKind::Data("fixed16".into()),
        _ => true,
    }));

    config.modes = ModeFlags {
        benchcore: true,
        ..config.modes
    };
    let bench = compile(&row_of(1), &meta, &config).unwrap();
    let last = bench.directives().last().unwrap();
    assert_eq!(
        *last,
        Directive::Capture {
            signal: "o2".into(),
            kind: CaptureKind::Latency,
        }
    );
    assert_eq!(bench.stop_on_valid_of(), 2);
}

/// Tests that a row without one field per input does not compile.
#[test]
fn test_compile_rejects_short_row() {
    let err = compile(&row_of(1), &metadata(2, 1), &RunConfig::default()).unwrap_err();
    assert!(err.is_recoverable());
}

/// Tests the signal map used by a single-output design.
#[test]
fn test_single_output_stops_on_zero() {
    let meta = DesignMetadata {
        inputs: SignalMap::new(),
        outputs: [("o0", "o0")].into_iter().collect(),
        prefix: String::new(),
    };
    let seq = compile(&row_of(0), &meta, &RunConfig::default()).unwrap();
    assert_eq!(seq.stop_on_valid_of(), 0);
}
