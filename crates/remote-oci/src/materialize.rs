//! Layer materialization: writing a compose artifact's layers to disk.
//!
//! Layers are processed strictly in manifest order. Compose YAML layers
//! without the extends annotation are appended to `compose.yaml` as a
//! multi-document stream; the others become sibling files named by their
//! annotations.

use std::path::{Component, Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::manifest::annotations;
use crate::reference::layer_reference;
use crate::{COMPOSE_FILE, Descriptor, Error, LayerKind, Manifest, Reference, Resolver, Result};

/// Written between compose documents sharing `compose.yaml`.
const DOCUMENT_SEPARATOR: &[u8] = b"\n---\n";

/// Materialize a compose artifact into `local`.
///
/// The manifest is validated before anything is created. On error the
/// directory may be left partially written; removing it is up to the caller.
pub async fn pull_compose_files(
    local: &Path,
    manifest: &Manifest,
    reference: &Reference,
    resolver: &dyn Resolver,
) -> Result<()> {
    manifest.validate(reference)?;

    create_private_dir(local).await?;
    let compose_path = local.join(COMPOSE_FILE);
    let mut compose = create_new(&compose_path).await?;

    for (index, layer) in manifest.layers.iter().enumerate() {
        let digested = layer_reference(reference, &layer.digest);
        let content = resolver.fetch_blob(&digested, layer).await?;
        crate::digest::verify(&content, &layer.digest)?;

        match layer.kind() {
            LayerKind::ComposeYaml if layer.has_annotation(annotations::EXTENDS) => {
                let target = annotated_target(local, layer, annotations::FILE)?;
                write_file(&target, &content).await?;
                debug!(digest = %layer.digest, ?target, "Wrote extended compose file");
            }
            LayerKind::ComposeYaml => {
                if index > 0 && layer.has_annotation(annotations::FILE) {
                    write_all(&mut compose, &compose_path, DOCUMENT_SEPARATOR).await?;
                }
                write_all(&mut compose, &compose_path, &content).await?;
                debug!(digest = %layer.digest, index, "Appended compose document");
            }
            LayerKind::ComposeEnvFile => {
                let target = annotated_target(local, layer, annotations::ENV_FILE)?;
                write_file(&target, &content).await?;
                debug!(digest = %layer.digest, ?target, "Wrote env file");
            }
            LayerKind::EmptyConfig => {}
            LayerKind::Other(media_type) => {
                trace!(digest = %layer.digest, media_type, "Skipping unrecognized layer");
            }
        }
    }

    compose
        .flush()
        .await
        .map_err(|e| Error::io(e, &compose_path, "flush"))?;
    Ok(())
}

/// Resolve the file a layer annotation names, inside `local`.
fn annotated_target(local: &Path, layer: &Descriptor, annotation: &str) -> Result<PathBuf> {
    let name = layer
        .annotation(annotation)
        .ok_or_else(|| Error::missing_annotation(annotation, &layer.digest))?;

    let relative = Path::new(name);
    let contained = relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        return Err(Error::unsafe_path(name, &layer.digest));
    }

    Ok(local.join(relative))
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_private_dir(parent).await?;
    }
    let mut file = create_new(path).await?;
    write_all(&mut file, path, content).await?;
    file.flush().await.map_err(|e| Error::io(e, path, "flush"))
}

async fn write_all(file: &mut File, path: &Path, content: &[u8]) -> Result<()> {
    file.write_all(content)
        .await
        .map_err(|e| Error::io(e, path, "write"))
}

async fn create_new(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| Error::io(e, path, "create"))
}

async fn create_private_dir(path: &Path) -> Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder
        .create(path)
        .await
        .map_err(|e| Error::io(e, path, "create directory"))
}
