//! Environment configuration for the OCI remote loader.

use std::env::VarError;
use tracing::trace;

use crate::{Error, Result};

/// Environment variable toggling OCI remote resources.
///
/// Unset or empty means enabled.
pub const OCI_REMOTE_ENABLED: &str = "COMPOSE_EXPERIMENTAL_OCI_REMOTE";

/// Read the feature flag from the environment.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the variable holds something other
/// than a boolean.
pub fn oci_remote_enabled() -> Result<bool> {
    match std::env::var(OCI_REMOTE_ENABLED) {
        Ok(value) if value.is_empty() => Ok(true),
        Ok(value) => {
            let enabled = parse_bool(&value).ok_or_else(|| invalid_flag(&value))?;
            trace!(variable = OCI_REMOTE_ENABLED, enabled, "Read feature flag");
            Ok(enabled)
        }
        Err(VarError::NotPresent) => Ok(true),
        Err(VarError::NotUnicode(raw)) => Err(invalid_flag(&raw.to_string_lossy())),
    }
}

/// Parse the boolean spellings accepted for feature flags.
#[must_use]
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn invalid_flag(value: &str) -> Error {
    Error::configuration(format!(
        "{OCI_REMOTE_ENABLED} environment variable expects boolean value: parsing {value:?}: invalid syntax"
    ))
}
