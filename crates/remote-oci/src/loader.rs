//! The `oci://` resource loader.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use crate::config::{OCI_REMOTE_ENABLED, oci_remote_enabled};
use crate::reference::parse_oci_path;
use crate::{
    COMPOSE_FILE, ComposeCache, Error, Manifest, OCI_PREFIX, Resolver, Result, pull_compose_files,
};

/// A plugin resolving remote resource paths to local files.
///
/// The configuration loader asks each registered loader in turn whether it
/// accepts a path, then loads it through the first one that does.
#[async_trait]
pub trait ResourceLoader: Send {
    /// Whether this loader handles `path`.
    fn accept(&self, path: &str) -> bool;

    /// Resolve `path` to a local file.
    ///
    /// `Ok(None)` means the resource is unavailable right now and the caller
    /// should carry on without it.
    async fn load(&mut self, path: &str) -> Result<Option<PathBuf>>;

    /// Local directory a previously loaded `path` resolved into.
    fn dir(&self, path: &str) -> Option<&Path>;
}

/// Loads compose projects published as OCI artifacts.
///
/// Every reference loaded is remembered for the lifetime of the loader, and
/// the files are cached on disk by manifest digest. `load` takes `&mut self`;
/// share a loader between tasks behind a mutex.
pub struct OciRemoteLoader {
    resolver: Arc<dyn Resolver>,
    cache: ComposeCache,
    offline: bool,
    known: HashMap<String, PathBuf>,
}

impl OciRemoteLoader {
    /// Create a loader.
    ///
    /// An offline loader accepts `oci://` paths but never loads them.
    #[must_use]
    pub fn new(resolver: Arc<dyn Resolver>, cache: ComposeCache, offline: bool) -> Self {
        Self {
            resolver,
            cache,
            offline,
            known: HashMap::new(),
        }
    }

    /// The on-disk cache this loader writes into.
    #[must_use]
    pub fn cache(&self) -> &ComposeCache {
        &self.cache
    }

    /// Resolve a path the loader has not seen yet and make sure its files exist.
    async fn fetch(&self, path: &str) -> Result<PathBuf> {
        let reference = parse_oci_path(path)?;
        let resolved = self.resolver.resolve(&reference).await?;

        let local = self.cache.artifact_dir(&resolved.descriptor.digest)?;
        self.cache.ensure_root()?;
        if self.cache.has_artifact(&resolved.descriptor.digest)? {
            debug!(%reference, ?local, "Compose artifact already cached");
            return Ok(local);
        }

        info!(%reference, digest = %resolved.descriptor.digest, "Pulling compose artifact");
        let manifest = Manifest::from_slice(&resolved.content)?;
        if let Err(err) =
            pull_compose_files(&local, &manifest, &reference, self.resolver.as_ref()).await
        {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&local).await {
                trace!(?local, error = %cleanup, "Nothing to clean up after failed pull");
            }
            warn!(%reference, error = %err, "Failed to pull compose artifact");
            return Err(err);
        }

        debug!(%reference, ?local, layers = manifest.layers.len(), "Pulled compose artifact");
        Ok(local)
    }
}

#[async_trait]
impl ResourceLoader for OciRemoteLoader {
    fn accept(&self, path: &str) -> bool {
        path.starts_with(OCI_PREFIX)
    }

    async fn load(&mut self, path: &str) -> Result<Option<PathBuf>> {
        let enabled = oci_remote_enabled()?;
        if self.offline {
            debug!(%path, "Offline, skipping OCI remote resource");
            return Ok(None);
        }
        if !enabled {
            return Err(Error::disabled(OCI_REMOTE_ENABLED));
        }

        let local = if let Some(local) = self.known.get(path) {
            trace!(%path, ?local, "OCI reference already loaded");
            local.clone()
        } else {
            let local = self.fetch(path).await?;
            self.known.insert(path.to_string(), local.clone());
            local
        };

        Ok(Some(local.join(COMPOSE_FILE)))
    }

    fn dir(&self, path: &str) -> Option<&Path> {
        self.known.get(path).map(PathBuf::as_path)
    }
}
