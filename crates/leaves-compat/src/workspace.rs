//! Per-case working directories.

use crate::compare::{compare_matrices, ComparisonSummary, Tolerance};
use crate::error::CaseError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::warn;

/// Prefix of ephemeral workspace directories.
pub const EPHEMERAL_PREFIX: &str = "matrixtest";

/// Directory a case writes its programs and outputs into.
///
/// An ephemeral workspace is removed when the value is released or dropped,
/// whichever comes first. A caller-supplied directory is never removed.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    ephemeral: Option<TempDir>,
}

impl Workspace {
    /// Use `dirname` (created if missing) or a fresh temporary directory.
    pub fn prepare(dirname: Option<&Path>) -> std::io::Result<Self> {
        match dirname {
            Some(dir) => {
                let dir = std::path::absolute(dir)?;
                std::fs::create_dir_all(&dir)?;
                Ok(Self {
                    dir,
                    ephemeral: None,
                })
            }
            None => {
                let tmp = tempfile::Builder::new()
                    .prefix(EPHEMERAL_PREFIX)
                    .tempdir()?;
                Ok(Self {
                    dir: tmp.path().to_path_buf(),
                    ephemeral: Some(tmp),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Whether the directory is deleted on release.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral.is_some()
    }

    /// Path of `name` inside the workspace.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write `contents` to `name` inside the workspace.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<PathBuf, CaseError> {
        let path = self.file(name);
        std::fs::write(&path, contents).map_err(|source| CaseError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Compare two matrix files named relative to the workspace.
    pub fn compare_matrices(
        &self,
        file1: &str,
        file2: &str,
        tolerance: &Tolerance,
    ) -> Result<ComparisonSummary, CaseError> {
        compare_matrices(&self.file(file1), &self.file(file2), tolerance)
    }

    /// Delete an ephemeral workspace now, logging rather than failing on errors.
    pub fn release(self) {
        if let Some(tmp) = self.ephemeral {
            if let Err(e) = tmp.close() {
                warn!(dir = ?self.dir, error = %e, "Failed to remove workspace");
            }
        }
    }
}
