//! Digest-keyed cache for materialized compose artifacts.
//!
//! Each artifact is written once under the hex of its manifest digest, so a
//! warm cache answers without touching the registry's layer blobs.

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::digest;
use crate::{Error, Result};

/// Directory name used under the user cache directory.
const CACHE_DIR_NAME: &str = "docker-compose";

/// Cache of materialized compose artifacts.
///
/// Default location: `$XDG_CACHE_HOME/docker-compose/`, falling back to the
/// platform cache directory.
///
/// Structure:
/// ```text
/// ~/.cache/docker-compose/
/// └── 4f1b2c...          # hex of the manifest digest
///     ├── compose.yaml   # primary compose file
///     ├── base.yaml      # extends/include fragments
///     └── .env           # env files
/// ```
#[derive(Debug, Clone)]
pub struct ComposeCache {
    root: PathBuf,
}

impl Default for ComposeCache {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(CACHE_DIR_NAME);
        Self::new(cache_dir)
    }
}

impl ComposeCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Locate the cache root from the environment.
    ///
    /// `XDG_CACHE_HOME` wins on every platform when set.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var_os("XDG_CACHE_HOME") {
            Some(xdg) if !xdg.is_empty() => Self::new(PathBuf::from(xdg).join(CACHE_DIR_NAME)),
            _ => Self::default(),
        }
    }

    /// Get the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the directory an artifact is materialized into.
    ///
    /// `digest` must be `<algorithm>:<hex>`; anything else is rejected rather
    /// than joined onto the root.
    pub fn artifact_dir(&self, digest: &str) -> Result<PathBuf> {
        Ok(self.root.join(digest::encoded(digest)?))
    }

    /// Check if an artifact has been materialized.
    ///
    /// Failing to inspect the directory is an error, not a miss.
    pub fn has_artifact(&self, digest: &str) -> Result<bool> {
        let dir = self.artifact_dir(digest)?;
        let exists = dir.try_exists().map_err(|e| Error::io(e, &dir, "stat"))?;
        trace!(digest, exists, "Checked artifact cache");
        Ok(exists)
    }

    /// Ensure the cache root exists, readable by the owner only.
    pub fn ensure_root(&self) -> Result<()> {
        create_private_dir_all(&self.root).map_err(|source| Error::CacheInit {
            source,
            path: self.root.clone(),
        })?;
        debug!(root = ?self.root, "Cache root ready");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir_all(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
}

#[cfg(not(unix))]
fn create_private_dir_all(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}
