//! Per-fetch scratch directory.

use crate::core::config;
use crate::download::error::FetchError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Exclusively owned directory holding one fetch's output.
///
/// Removed when dropped, so every exit path of the owning scope (early `?`
/// return, cancellation dropping the future, unwinding) cleans up.
#[derive(Debug)]
pub struct TempWorkspace {
    dir: TempDir,
}

impl TempWorkspace {
    /// Create a uniquely named workspace under `root`.
    pub fn create_in(root: &Path) -> Result<Self, FetchError> {
        std::fs::create_dir_all(root).map_err(|e| FetchError::io(root, e))?;
        let dir = tempfile::Builder::new()
            .prefix(config::download::WORKSPACE_PREFIX)
            .tempdir_in(root)
            .map_err(|e| FetchError::io(root, e))?;
        log::debug!("Temporary directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `stem.ext` inside the workspace.
    pub fn file_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.dir.path().join(format!("{}.{}", stem, extension))
    }

    /// Remove the workspace now, reporting failures instead of swallowing them.
    pub fn close(self) -> Result<(), FetchError> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| FetchError::io(&path, e))?;
        log::debug!("Removed temporary directory: {}", path.display());
        Ok(())
    }
}
