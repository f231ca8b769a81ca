//! Scoped storage for an uploaded PDF.
//!
//! An upload is written to a uniquely named `temp_*.pdf` file so the parser
//! can read it from disk. Staging a new upload removes the previous file
//! first, and the file is removed when the session is released or dropped.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, TempPath};

use crate::error::Result;

/// Holds at most one uploaded file on disk.
#[derive(Debug)]
pub struct UploadSession {
    dir: PathBuf,
    current: Option<TempPath>,
}

impl UploadSession {
    /// Session storing uploads in the system temp directory.
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    /// Session storing uploads in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            current: None,
        }
    }

    /// Directory uploads are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an upload to disk, replacing the previous one.
    pub fn stage(&mut self, data: &[u8]) -> Result<&Path> {
        self.release();

        let mut file = Builder::new()
            .prefix("temp_")
            .suffix(".pdf")
            .tempfile_in(&self.dir)?;
        file.write_all(data)?;
        file.flush()?;

        let path = file.into_temp_path();
        log::debug!("Staged {} bytes at {}", data.len(), path.display());
        let staged: &Path = self.current.insert(path);
        Ok(staged)
    }

    /// Path of the staged upload, if any.
    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Remove the staged upload. Safe to call repeatedly.
    ///
    /// Removal failures are logged, never returned.
    pub fn release(&mut self) {
        let Some(path) = self.current.take() else {
            return;
        };

        let display = path.display().to_string();
        match path.close() {
            Ok(()) => log::debug!("Removed {}", display),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} was already removed", display)
            }
            Err(e) => log::warn!("Could not delete temporary file {}: {}", display, e),
        }
    }
}

impl Default for UploadSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        self.release();
    }
}
