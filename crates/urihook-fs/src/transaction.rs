use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// An advisory exclusive lock on a file, held for the lifetime of the value.
///
/// Used to serialize read-modify-write cycles between cooperating processes.
/// The lock is released on drop.
pub struct Transaction {
    file: File,
    path: PathBuf,
}

impl Transaction {
    fn open(path: impl AsRef<Path>) -> Result<File> {
        File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| Error::Lock {
                path: path.as_ref().to_path_buf(),
                source: e,
            })
    }

    pub fn open_locked(path: impl AsRef<Path>) -> Result<Self> {
        let file = Self::open(path.as_ref())?;

        let path = path.as_ref().to_path_buf();
        file.lock_exclusive().map_err(|e| Error::Lock {
            path: path.clone(),
            source: e,
        })?;

        Ok(Self { file, path })
    }

    pub fn try_open_locked(path: impl AsRef<Path>) -> Result<Self> {
        let file = Self::open(path.as_ref())?;

        let path = path.as_ref().to_path_buf();
        file.try_lock_exclusive().map_err(|e| Error::Lock {
            path: path.clone(),
            source: e,
        })?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.list");
        {
            let tx = Transaction::open_locked(&path).unwrap();
            assert_eq!(tx.path(), path);
            assert!(Transaction::try_open_locked(&path).is_err());
        }
        assert!(Transaction::try_open_locked(&path).is_ok());
    }

    #[test]
    fn test_lock_creates_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.list");
        let _tx = Transaction::open_locked(&path).unwrap();
        assert!(path.exists());
    }
}
