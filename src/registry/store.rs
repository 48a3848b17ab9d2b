//! On-disk bundle cache with atomic replacement.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ModelBundle, RegistryError};

/// Result of reading the cache file.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(ModelBundle),
    Missing,
    /// File exists but cannot be used; callers retrain.
    Rejected(RegistryError),
}

/// One bundle file. Writes go to a sibling temp file and are renamed into place, so
/// readers see either the old bundle or the new one.
#[derive(Debug, Clone)]
pub struct BundleStore {
    path: PathBuf,
}

impl BundleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Blocking read; never fails, classifies the file instead.
    pub fn load(&self) -> LoadOutcome {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
            Err(e) => {
                return LoadOutcome::Rejected(RegistryError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        match ModelBundle::from_bytes(&bytes) {
            Ok(bundle) => {
                debug!(path = ?self.path, bundle_id = %bundle.bundle_id, "Bundle read from disk");
                LoadOutcome::Loaded(bundle)
            }
            Err(e) => LoadOutcome::Rejected(e),
        }
    }

    /// Blocking atomic write.
    pub fn persist(&self, bundle: &ModelBundle) -> Result<(), RegistryError> {
        let bytes = bundle.to_bytes()?;
        let io_err = |source: std::io::Error| RegistryError::Io {
            path: self.path.clone(),
            source,
        };

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(io_err)?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(io_err)?;
        temp.write_all(&bytes).map_err(io_err)?;
        temp.as_file().sync_all().map_err(io_err)?;
        temp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(path = ?self.path, bytes = bytes.len(), "Bundle persisted");
        Ok(())
    }
}
