//! Compose project manifest types and validation.
//!
//! A compose project is pushed as an OCI artifact whose layers are the
//! project's files. Layer media types say what each file is; annotations
//! carry the file name it was pushed from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Error, Reference, Result};

/// Media types understood by the loader.
pub mod media_types {
    /// Artifact type of a compose project.
    pub const COMPOSE_PROJECT_ARTIFACT: &str = "application/vnd.docker.compose.project";
    /// A compose YAML document.
    pub const COMPOSE_YAML: &str = "application/vnd.docker.compose.file+yaml";
    /// A dotenv file referenced by the project.
    pub const COMPOSE_ENV_FILE: &str = "application/vnd.docker.compose.envfile";
    /// Config media type of compose artifacts pushed before artifact types existed.
    pub const COMPOSE_EMPTY_CONFIG: &str = "application/vnd.docker.compose.config.empty.v1+json";

    /// OCI image manifest.
    pub const OCI_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
    /// Docker manifest v2.
    pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
}

/// Layer annotation keys.
pub mod annotations {
    /// File name the layer was pushed from.
    pub const FILE: &str = "com.docker.compose.file";
    /// Present when the layer is a separate file rather than part of `compose.yaml`.
    pub const EXTENDS: &str = "com.docker.compose.extends";
    /// File name of an env file layer.
    pub const ENV_FILE: &str = "com.docker.compose.envfile";
}

/// OCI content descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Media type of the content
    #[serde(default)]
    pub media_type: String,

    /// Content digest (e.g., "sha256:abc123...")
    #[serde(default)]
    pub digest: String,

    /// Size in bytes
    #[serde(default)]
    pub size: u64,

    /// Optional annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Descriptor {
    /// Look up an annotation value.
    #[must_use]
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations
            .as_ref()
            .and_then(|annotations| annotations.get(key))
            .map(String::as_str)
    }

    /// Check whether an annotation key is present, whatever its value.
    #[must_use]
    pub fn has_annotation(&self, key: &str) -> bool {
        self.annotation(key).is_some()
    }

    /// Classify this descriptor by media type.
    #[must_use]
    pub fn kind(&self) -> LayerKind<'_> {
        LayerKind::from_media_type(&self.media_type)
    }
}

/// What a layer holds, as far as the loader cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind<'a> {
    /// A compose YAML document.
    ComposeYaml,
    /// An env file.
    ComposeEnvFile,
    /// Placeholder layer of legacy artifacts.
    EmptyConfig,
    /// Anything else; skipped.
    Other(&'a str),
}

impl<'a> LayerKind<'a> {
    /// Classify a media type.
    #[must_use]
    pub fn from_media_type(media_type: &'a str) -> Self {
        match media_type {
            media_types::COMPOSE_YAML => Self::ComposeYaml,
            media_types::COMPOSE_ENV_FILE => Self::ComposeEnvFile,
            media_types::COMPOSE_EMPTY_CONFIG => Self::EmptyConfig,
            other => Self::Other(other),
        }
    }
}

/// OCI image manifest, as pushed for a compose project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Schema version (should be 2)
    #[serde(default)]
    pub schema_version: u32,

    /// Media type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Artifact type; absent on artifacts pushed before it was introduced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,

    /// Config blob descriptor
    #[serde(default)]
    pub config: Descriptor,

    /// Layer descriptors, in push order
    #[serde(default)]
    pub layers: Vec<Descriptor>,

    /// Optional annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Manifest {
    /// Parse a manifest from JSON bytes.
    pub fn from_slice(content: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(content)?)
    }

    /// Artifact type, empty when absent.
    #[must_use]
    pub fn artifact_type(&self) -> &str {
        self.artifact_type.as_deref().unwrap_or_default()
    }

    /// Check the manifest describes a compose project.
    ///
    /// Artifacts pushed before artifact types existed have none, and are
    /// recognized by their empty config media type instead.
    pub fn validate(&self, reference: &Reference) -> Result<()> {
        let artifact_type = self.artifact_type();
        let valid = if artifact_type.is_empty() {
            self.config.media_type == media_types::COMPOSE_EMPTY_CONFIG
        } else {
            artifact_type == media_types::COMPOSE_PROJECT_ARTIFACT
        };

        if valid {
            Ok(())
        } else {
            Err(Error::not_compose_artifact(
                reference.to_string(),
                artifact_type,
            ))
        }
    }
}

/// Media type declared inside a manifest document.
///
/// Falls back to the OCI manifest type when the document does not say.
pub(crate) fn declared_media_type(content: &[u8]) -> String {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Probe {
        #[serde(default)]
        media_type: Option<String>,
    }

    serde_json::from_slice::<Probe>(content)
        .ok()
        .and_then(|probe| probe.media_type)
        .unwrap_or_else(|| media_types::OCI_MANIFEST.to_string())
}
