//! Scoped scratch state.
//!
//! The scratch tool accumulates directives in a file keyed by working
//! directory, not by row. A [`Scratch`] owns that file for the duration of one
//! row: acquiring it discards whatever a previous row left behind, and
//! dropping it discards the file again on every exit path.

use crate::common::{Result, SimBatchError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive handle on the scratch file for one row.
#[derive(Debug)]
pub struct Scratch {
    path: PathBuf,
}

impl Scratch {
    /// Resets the scratch file at `path` and takes ownership of it.
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        discard(&path).map_err(|e| SimBatchError::Directive {
            command: format!("reset {}", path.display()),
            detail: e.to_string(),
        })?;
        debug!(path = %path.display(), "scratch reset");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if let Err(e) = discard(&self.path) {
            warn!(path = %self.path.display(), error = %e, "could not discard scratch file");
        }
    }
}

fn discard(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn acquire_clears_and_drop_discards() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("simboxtemp.json");
        fs::write(&path, "stale").unwrap();

        let scratch = Scratch::acquire(&path).unwrap();
        assert!(!path.exists());

        fs::write(scratch.path(), "fresh").unwrap();
        drop(scratch);
        assert!(!path.exists());
    }

    #[test]
    fn acquire_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        assert!(Scratch::acquire(dir.path().join("absent.json")).is_ok());
    }
}
