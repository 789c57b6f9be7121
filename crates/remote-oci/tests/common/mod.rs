//! In-memory registry shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use compose_remote_oci::{
    Descriptor, Error, Manifest, Reference, Resolved, Resolver, Result, media_types,
    sha256_digest,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Registry double that serves published artifacts from memory.
#[derive(Default)]
pub struct FakeRegistry {
    manifests: Mutex<HashMap<String, Vec<u8>>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    unavailable: Mutex<HashSet<String>>,
    resolves: AtomicUsize,
    blob_fetches: AtomicUsize,
}

impl FakeRegistry {
    /// Publish an artifact under `reference` (e.g. "docker.io/acme/stack:1.0").
    ///
    /// Returns the manifest digest.
    pub fn publish(&self, reference: &str, artifact: Artifact) -> String {
        let content = serde_json::to_vec(&artifact.manifest).unwrap();
        let digest = sha256_digest(&content);
        self.blobs.lock().unwrap().extend(artifact.blobs);
        self.manifests
            .lock()
            .unwrap()
            .insert(reference.to_string(), content);
        digest
    }

    /// Make a blob fail to download until [`FakeRegistry::restore`] is called.
    pub fn break_blob(&self, digest: &str) {
        self.unavailable.lock().unwrap().insert(digest.to_string());
    }

    pub fn restore(&self, digest: &str) {
        self.unavailable.lock().unwrap().remove(digest);
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn blob_fetches(&self) -> usize {
        self.blob_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for FakeRegistry {
    async fn resolve(&self, reference: &Reference) -> Result<Resolved> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        let key = reference.to_string();
        let content = self
            .manifests
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::resolution(&key, "manifest unknown"))?;
        let descriptor = Descriptor {
            media_type: media_types::OCI_MANIFEST.to_string(),
            digest: sha256_digest(&content),
            size: content.len() as u64,
            annotations: None,
        };
        Ok(Resolved {
            content,
            descriptor,
        })
    }

    async fn fetch_blob(&self, reference: &Reference, layer: &Descriptor) -> Result<Vec<u8>> {
        self.blob_fetches.fetch_add(1, Ordering::SeqCst);
        assert_eq!(reference.digest(), Some(layer.digest.as_str()));
        if self.unavailable.lock().unwrap().contains(&layer.digest) {
            return Err(Error::blob_pull_failed(&layer.digest, "connection reset"));
        }
        self.blobs
            .lock()
            .unwrap()
            .get(&layer.digest)
            .cloned()
            .ok_or_else(|| Error::blob_pull_failed(&layer.digest, "blob unknown"))
    }
}

/// A compose artifact under construction.
pub struct Artifact {
    pub manifest: Manifest,
    blobs: HashMap<String, Vec<u8>>,
}

impl Artifact {
    /// A compose project artifact with no layers yet.
    pub fn compose() -> Self {
        Self::with_artifact_type(Some(media_types::COMPOSE_PROJECT_ARTIFACT))
    }

    pub fn with_artifact_type(artifact_type: Option<&str>) -> Self {
        Self {
            manifest: Manifest {
                schema_version: 2,
                media_type: Some(media_types::OCI_MANIFEST.to_string()),
                artifact_type: artifact_type.map(str::to_string),
                config: Descriptor {
                    media_type: "application/vnd.oci.empty.v1+json".to_string(),
                    digest: sha256_digest(b"{}"),
                    size: 2,
                    annotations: None,
                },
                ..Manifest::default()
            },
            blobs: HashMap::new(),
        }
    }

    /// Append a layer; returns its digest.
    pub fn layer(&mut self, media_type: &str, content: &str, notes: &[(&str, &str)]) -> String {
        let digest = sha256_digest(content.as_bytes());
        self.blobs
            .insert(digest.clone(), content.as_bytes().to_vec());
        let annotations: BTreeMap<String, String> = notes
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.manifest.layers.push(Descriptor {
            media_type: media_type.to_string(),
            digest: digest.clone(),
            size: content.len() as u64,
            annotations: (!annotations.is_empty()).then_some(annotations),
        });
        digest
    }
}
