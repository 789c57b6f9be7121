//! Error types for OCI remote loading.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for OCI remote loading.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving and materializing an OCI artifact.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The feature flag holds something that is not a boolean.
    #[error("{message}")]
    #[diagnostic(
        code(compose_remote::oci::configuration),
        help("Use one of 1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False")
    )]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// OCI remote resources were turned off through the environment.
    #[error("OCI remote resource is disabled by {variable:?}")]
    #[diagnostic(code(compose_remote::oci::disabled))]
    Disabled {
        /// The environment variable that disabled the loader
        variable: String,
    },

    /// Failed to parse an artifact reference.
    #[error("Invalid reference '{reference}': {message}")]
    #[diagnostic(code(compose_remote::oci::invalid_reference))]
    InvalidReference {
        /// The reference as supplied
        reference: String,
        /// Parser diagnostic
        message: String,
    },

    /// The registry could not resolve the reference.
    #[error("Failed to resolve {reference}: {message}")]
    #[diagnostic(
        code(compose_remote::oci::resolution),
        help("Check the reference exists and that you are allowed to pull it")
    )]
    Resolution {
        /// The reference being resolved
        reference: String,
        /// Registry or transport error message
        message: String,
    },

    /// Failed to pull a layer blob from the registry.
    #[error("Failed to pull blob {digest}: {message}")]
    #[diagnostic(code(compose_remote::oci::blob_pull))]
    BlobPullFailed {
        /// The blob digest
        digest: String,
        /// Error message
        message: String,
    },

    /// Pulled content does not hash to its declared digest.
    #[error("Digest mismatch for blob: expected {expected}, got {actual}")]
    #[diagnostic(code(compose_remote::oci::digest_mismatch))]
    DigestMismatch {
        /// The expected digest
        expected: String,
        /// The computed digest
        actual: String,
    },

    /// A registry returned a digest that cannot name a cache directory.
    #[error("Invalid digest {digest:?}: {message}")]
    #[diagnostic(code(compose_remote::oci::invalid_digest))]
    InvalidDigest {
        /// The digest as returned by the registry
        digest: String,
        /// What is wrong with it
        message: String,
    },

    /// Manifest JSON could not be decoded.
    #[error("Invalid manifest: {0}")]
    #[diagnostic(code(compose_remote::oci::manifest))]
    Json(#[from] serde_json::Error),

    /// The artifact is an OCI artifact of some other kind.
    #[error("{reference} is not a compose project OCI artifact, but {artifact_type}")]
    #[diagnostic(code(compose_remote::oci::not_compose))]
    NotComposeArtifact {
        /// The reference that was fetched
        reference: String,
        /// The artifact type declared by the manifest
        artifact_type: String,
    },

    /// A layer lacks an annotation its media type requires.
    #[error("missing annotation {annotation} in layer {digest:?}")]
    #[diagnostic(code(compose_remote::oci::missing_annotation))]
    MissingAnnotation {
        /// The annotation key
        annotation: String,
        /// Digest of the offending layer
        digest: String,
    },

    /// A layer annotation names a file outside the artifact directory.
    #[error("layer {digest:?} targets {target:?}, which escapes the artifact directory")]
    #[diagnostic(code(compose_remote::oci::unsafe_path))]
    UnsafePath {
        /// The annotated file name
        target: String,
        /// Digest of the offending layer
        digest: String,
    },

    /// The cache root could not be provisioned.
    #[error("initializing remote resource cache at {}: {source}", path.display())]
    #[diagnostic(
        code(compose_remote::oci::cache),
        help("Set XDG_CACHE_HOME to a writable directory")
    )]
    CacheInit {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The cache root
        path: PathBuf,
    },

    /// I/O error while writing artifact files
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(compose_remote::oci::io),
        help("Check file permissions and available disk space")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "create", "write")
        operation: String,
    },
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a disabled error naming the variable responsible.
    #[must_use]
    pub fn disabled(variable: impl Into<String>) -> Self {
        Self::Disabled {
            variable: variable.into(),
        }
    }

    /// Create an invalid reference error.
    #[must_use]
    pub fn invalid_reference(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a resolution error.
    #[must_use]
    pub fn resolution(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a blob pull failed error.
    #[must_use]
    pub fn blob_pull_failed(digest: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BlobPullFailed {
            digest: digest.into(),
            message: message.into(),
        }
    }

    /// Create a digest mismatch error.
    #[must_use]
    pub fn digest_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::DigestMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid digest error.
    #[must_use]
    pub fn invalid_digest(digest: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDigest {
            digest: digest.into(),
            message: message.into(),
        }
    }

    /// Create an error for an artifact that is not a compose project.
    #[must_use]
    pub fn not_compose_artifact(
        reference: impl Into<String>,
        artifact_type: impl Into<String>,
    ) -> Self {
        Self::NotComposeArtifact {
            reference: reference.into(),
            artifact_type: artifact_type.into(),
        }
    }

    /// Create a missing annotation error.
    #[must_use]
    pub fn missing_annotation(annotation: impl Into<String>, digest: impl Into<String>) -> Self {
        Self::MissingAnnotation {
            annotation: annotation.into(),
            digest: digest.into(),
        }
    }

    /// Create an unsafe path error.
    #[must_use]
    pub fn unsafe_path(target: impl Into<String>, digest: impl Into<String>) -> Self {
        Self::UnsafePath {
            target: target.into(),
            digest: digest.into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }
}
