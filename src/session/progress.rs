//! Persisted progression counter.

use crate::{GemmazeError, GemmazeResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File-backed progression state: a single non-negative integer selecting
/// the currently active map configuration across process runs.
///
/// A missing or unparsable file reads as 0, so a fresh session silently
/// starts at the first map. Writes replace the whole file through a
/// temporary file and an atomic rename; a concurrent reader never observes
/// a torn value. Two concurrent writers still race last-writer-wins.
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Creates a store backed by the given file path. The file itself is
    /// only touched by [`write`](Self::write).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted index, defaulting to 0 when the backing file is
    /// absent, unreadable, or unparsable. Never escalates to an error.
    pub fn read(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(text) => match text.trim().parse() {
                Ok(value) => value,
                Err(err) => {
                    log::warn!(
                        "progress file {} is unparsable ({err}), starting at 0",
                        self.path.display()
                    );
                    0
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!(
                        "progress file {} is unreadable ({err}), starting at 0",
                        self.path.display()
                    );
                }
                0
            }
        }
    }

    /// Overwrites the persisted index. Idempotent full replace.
    pub fn write(&self, level: u32) -> GemmazeResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        write!(tmp, "{level}")?;
        tmp.persist(&self.path)
            .map_err(|err| GemmazeError::Io(err.error))?;
        Ok(())
    }

    /// Increments the persisted index by one, returning the new value.
    pub fn advance(&self) -> GemmazeResult<u32> {
        let next = self.read() + 1;
        self.write(next)?;
        Ok(next)
    }
}
