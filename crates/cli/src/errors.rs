//! CLI-specific errors.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("'{reference}' is not an OCI reference")]
    #[diagnostic(
        code(compose_oci::cli::not_oci),
        help("References start with oci://, e.g. oci://docker.io/acme/stack:1.0")
    )]
    NotOciReference { reference: String },

    #[error("Failed to write output")]
    #[diagnostic(code(compose_oci::cli::output))]
    Output {
        #[source]
        source: std::io::Error,
    },
}
