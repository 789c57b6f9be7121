//! OCI registry client for resolving compose artifacts.
//!
//! Uses `oci-distribution` for registry operations.

use async_trait::async_trait;
use oci_distribution::Client;
use oci_distribution::client::{ClientConfig, ClientProtocol};
use oci_distribution::manifest::OciDescriptor;
use oci_distribution::secrets::RegistryAuth;
use tracing::{debug, info};

use crate::manifest::{declared_media_type, media_types};
use crate::{Descriptor, Error, Reference, Resolved, Resolver, Result};

/// Manifest media types accepted from the registry.
const ACCEPTED_MANIFESTS: &[&str] = &[media_types::OCI_MANIFEST, media_types::DOCKER_MANIFEST_V2];

/// [`Resolver`] backed by a live OCI registry.
pub struct RegistryResolver {
    client: Client,
    auth: RegistryAuth,
}

impl Default for RegistryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryResolver {
    /// Create a resolver talking HTTPS with anonymous auth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_protocol(ClientProtocol::Https)
    }

    /// Create a resolver with an explicit protocol, e.g. for local registries.
    #[must_use]
    pub fn with_protocol(protocol: ClientProtocol) -> Self {
        let config = ClientConfig {
            protocol,
            ..Default::default()
        };
        Self {
            client: Client::new(config),
            auth: RegistryAuth::Anonymous,
        }
    }

    /// Use the given credentials for every request.
    #[must_use]
    pub fn with_auth(mut self, auth: RegistryAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Use basic credentials for every request.
    #[must_use]
    pub fn with_basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.with_auth(RegistryAuth::Basic(username.into(), password.into()))
    }

    fn is_anonymous(&self) -> bool {
        matches!(self.auth, RegistryAuth::Anonymous)
    }
}

#[async_trait]
impl Resolver for RegistryResolver {
    async fn resolve(&self, reference: &Reference) -> Result<Resolved> {
        info!(%reference, anonymous = self.is_anonymous(), "Resolving OCI artifact");

        let (content, digest) = self
            .client
            .pull_manifest_raw(reference, &self.auth, ACCEPTED_MANIFESTS)
            .await
            .map_err(|e| Error::resolution(reference.to_string(), e.to_string()))?;

        let descriptor = Descriptor {
            media_type: declared_media_type(&content),
            digest,
            size: u64::try_from(content.len()).unwrap_or(u64::MAX),
            annotations: None,
        };

        debug!(
            %reference,
            digest = %descriptor.digest,
            media_type = %descriptor.media_type,
            "Resolved OCI artifact"
        );

        Ok(Resolved {
            content,
            descriptor,
        })
    }

    async fn fetch_blob(&self, reference: &Reference, layer: &Descriptor) -> Result<Vec<u8>> {
        debug!(%reference, digest = %layer.digest, "Pulling blob");

        let descriptor = OciDescriptor {
            media_type: layer.media_type.clone(),
            digest: layer.digest.clone(),
            size: i64::try_from(layer.size).unwrap_or(i64::MAX),
            ..Default::default()
        };

        let mut content = Vec::new();
        self.client
            .pull_blob(reference, &descriptor, &mut content)
            .await
            .map_err(|e| Error::blob_pull_failed(&layer.digest, e.to_string()))?;

        debug!(digest = %layer.digest, size = content.len(), "Pulled blob");
        Ok(content)
    }
}
