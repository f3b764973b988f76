use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// A uniquely named temporary directory that is deleted recursively when
/// dropped, whether the owning operation succeeded or failed.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a scratch directory under `root`.
    pub fn in_dir(root: impl AsRef<Path>) -> Result<Self> {
        let path = root
            .as_ref()
            .join(format!("urihook-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).map_err(|e| Error::Write {
            path: path.clone(),
            source: e,
        })?;
        Ok(Self { path })
    }

    /// Create a scratch directory under the system temp dir.
    pub fn new() -> Result<Self> {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let full_path = self.file_path(name);
        std::fs::write(&full_path, content).map_err(|e| Error::Write {
            path: full_path.clone(),
            source: e,
        })?;
        Ok(full_path)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
