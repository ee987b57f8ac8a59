//! Result Decoder.
//!
//! Turns the simulator's whitespace-separated result line into one CSV row.
//! The layout depends on the output modes:
//!
//! * plain: the output values, comma separated.
//! * ML: the values read as class probabilities, followed by the index of the
//!   largest one.
//! * benchmark: the last token is a latency counter, moved to the end of the
//!   row after any ML column.
//!
//! Decoding never fails. Tokens that do not parse as numbers count as zero
//! when picking the ML class.

use crate::config::ModeFlags;
use std::fmt;

/// Classification written when there are no probabilities to compare.
pub const NO_CLASS: i64 = -1;

/// A decoded result row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    /// Comma-separated values, including the ML class column when enabled.
    pub values: String,
    /// Latency token split off in benchmark mode.
    pub latency: Option<String>,
}

impl fmt::Display for OutputRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values)?;
        if let Some(latency) = &self.latency {
            write!(f, ",{}", latency)?;
        }
        Ok(())
    }
}

/// Decodes one raw simulator result.
pub fn decode(raw: &str, prefix: &str, modes: ModeFlags) -> OutputRow {
    let mut line = raw.trim().to_string();

    if modes.omit_prefix && !prefix.is_empty() {
        line = line.replace(prefix, "");
    }

    let (line, latency) = if modes.benchcore {
        split_latency(&line)
    } else {
        (line, None)
    };

    let values = if modes.ml {
        let class = argmax(&line);
        format!("{},{}", line.replace(' ', ","), class)
    } else {
        line.trim_matches(',').replace(' ', ",")
    };

    OutputRow { values, latency }
}

/// Splits off the last token, rejoining the rest with single spaces.
fn split_latency(line: &str) -> (String, Option<String>) {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let last = tokens.pop().unwrap_or_default().to_string();
    (tokens.join(" "), Some(last))
}

/// Index of the largest probability in `line`; ties keep the lowest index.
fn argmax(line: &str) -> i64 {
    let mut best: Option<(usize, f32)> = None;
    for (i, token) in line.split_whitespace().enumerate() {
        let value = token.parse::<f32>().unwrap_or(0.0);
        match best {
            Some((_, max)) if !(value > max) => {}
            _ => best = Some((i, value)),
        }
    }
    best.map_or(NO_CLASS, |(i, _)| i as i64)
}
