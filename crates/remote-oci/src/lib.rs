//! OCI remote resource loader for compose projects.
//!
//! This crate resolves `oci://` references to compose project artifacts and
//! materializes them as local files:
//! - Parse the reference and fetch its manifest from the registry
//! - Check the manifest declares a compose project artifact
//! - Write each layer to `compose.yaml`, an included fragment or an env file
//! - Cache the result by manifest digest so repeated loads are free
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use compose_remote_oci::{ComposeCache, OciRemoteLoader, RegistryResolver, ResourceLoader};
//!
//! let mut loader = OciRemoteLoader::new(
//!     Arc::new(RegistryResolver::new()),
//!     ComposeCache::from_env(),
//!     false,
//! );
//!
//! if loader.accept("oci://docker.io/acme/stack:1.0") {
//!     let compose_file = loader.load("oci://docker.io/acme/stack:1.0").await?;
//! }
//! ```

#![warn(missing_docs)]
// TODO(errors-doc): Add # Errors sections to the remaining fallible public functions
#![allow(clippy::missing_errors_doc)]

mod cache;
mod config;
mod digest;
mod error;
mod loader;
mod manifest;
mod materialize;
mod reference;
mod registry;
mod resolver;

pub use cache::ComposeCache;
pub use config::{OCI_REMOTE_ENABLED, oci_remote_enabled, parse_bool};
pub use digest::sha256_digest;
pub use error::{Error, Result};
pub use loader::{OciRemoteLoader, ResourceLoader};
pub use manifest::{Descriptor, LayerKind, Manifest, annotations, media_types};
pub use materialize::pull_compose_files;
pub use reference::{layer_reference, parse_oci_path};
pub use registry::RegistryResolver;
pub use resolver::{Resolved, Resolver};

pub use oci_distribution::Reference;
pub use oci_distribution::client::ClientProtocol;
pub use oci_distribution::secrets::RegistryAuth;

/// URI scheme prefix claimed by the OCI remote loader.
pub const OCI_PREFIX: &str = "oci://";

/// Name of the primary compose file inside a materialized artifact directory.
pub const COMPOSE_FILE: &str = "compose.yaml";
