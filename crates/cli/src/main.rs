//! `compose-oci`: resolve `oci://` compose projects into the local cache and
//! print the path of each project's compose file.

mod cli;
mod errors;
mod logging;

use clap::Parser;
use compose_remote_oci::{
    ClientProtocol, ComposeCache, OciRemoteLoader, RegistryResolver, ResourceLoader,
};
use std::io::Write;
use std::sync::Arc;
use tracing::warn;

use crate::cli::Cli;
use crate::errors::CliError;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.level.into(), cli.json)?;
    run(cli).await
}

async fn run(cli: Cli) -> miette::Result<()> {
    let mut loader = build_loader(&cli);

    for reference in &cli.references {
        if !loader.accept(reference) {
            return Err(CliError::NotOciReference {
                reference: reference.clone(),
            }
            .into());
        }

        match loader.load(reference).await? {
            Some(compose_file) => writeln!(std::io::stdout(), "{}", compose_file.display())
                .map_err(|source| CliError::Output { source })?,
            None => warn!(%reference, "Offline, compose project not loaded"),
        }
    }

    Ok(())
}

fn build_loader(cli: &Cli) -> OciRemoteLoader {
    let protocol = if cli.insecure {
        ClientProtocol::Http
    } else {
        ClientProtocol::Https
    };
    let mut resolver = RegistryResolver::with_protocol(protocol);
    if let (Some(username), Some(password)) = (&cli.username, &cli.password) {
        resolver = resolver.with_basic_auth(username, password);
    }

    let cache = cli
        .cache_dir
        .clone()
        .map_or_else(ComposeCache::from_env, ComposeCache::new);

    OciRemoteLoader::new(Arc::new(resolver), cache, cli.offline)
}
