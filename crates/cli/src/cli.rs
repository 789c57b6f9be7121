use clap::Parser;
use std::path::PathBuf;

use crate::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "compose-oci")]
#[command(about = "Resolve oci:// compose projects to local compose files")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(
        required = true,
        value_name = "REFERENCE",
        help = "Artifact references, e.g. oci://docker.io/acme/stack:1.0"
    )]
    pub references: Vec<String>,

    #[arg(long, help = "Do not contact any registry")]
    pub offline: bool,

    #[arg(
        long,
        help = "Cache directory (defaults to $XDG_CACHE_HOME/docker-compose)"
    )]
    pub cache_dir: Option<PathBuf>,

    #[arg(long, help = "Talk plain HTTP to the registry")]
    pub insecure: bool,

    #[arg(long, requires = "password", help = "Registry user name")]
    pub username: Option<String>,

    #[arg(long, requires = "username", help = "Registry password or token")]
    pub password: Option<String>,

    #[arg(
        short = 'l',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(long, help = "Output logs in JSON format")]
    pub json: bool,
}
