//! Registry access used by the loader.

use async_trait::async_trait;

use crate::{Descriptor, Reference, Result};

/// A fetched manifest and the descriptor it was served under.
#[derive(Debug, Clone)]
pub struct Resolved {
    /// Raw manifest bytes.
    pub content: Vec<u8>,
    /// Descriptor of the manifest; its digest keys the local cache.
    pub descriptor: Descriptor,
}

/// Fetches artifact content from a registry.
///
/// Dropping a returned future cancels the request.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Fetch the manifest a reference points at.
    async fn resolve(&self, reference: &Reference) -> Result<Resolved>;

    /// Fetch the blob of one layer, addressed by a digest-qualified reference.
    async fn fetch_blob(&self, reference: &Reference, layer: &Descriptor) -> Result<Vec<u8>>;
}
