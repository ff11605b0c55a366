//! Filesystem-backed artifact store
//!
//! Keys map to paths under a root directory (`{root}/{project}/image.png`).
//! Writes go through a temp file in the target directory followed by a
//! rename, so readers never observe a partially written artifact.

use std::path::{Path, PathBuf};

use relief_core::Result;

use crate::store::ArtifactStore;

/// Artifact store rooted at a local directory
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root` (created on first write)
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for part in key.split('/') {
            path.push(part);
        }
        path
    }
}

impl ArtifactStore for FsStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key).is_file())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4()));
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
