//! `oci://` path parsing.

use crate::{Error, OCI_PREFIX, Reference, Result};

/// Parse an `oci://` path into a fully qualified reference.
///
/// Short names are normalized the way the Docker CLI does
/// (`stack:1.0` becomes `docker.io/library/stack:1.0`).
pub fn parse_oci_path(path: &str) -> Result<Reference> {
    let image = path
        .strip_prefix(OCI_PREFIX)
        .ok_or_else(|| Error::invalid_reference(path, format!("missing {OCI_PREFIX} prefix")))?;
    image
        .parse()
        .map_err(|e: oci_distribution::ParseError| Error::invalid_reference(image, e.to_string()))
}

/// Address one layer of an artifact by digest.
#[must_use]
pub fn layer_reference(reference: &Reference, digest: &str) -> Reference {
    Reference::with_digest(
        reference.registry().to_string(),
        reference.repository().to_string(),
        digest.to_string(),
    )
}
