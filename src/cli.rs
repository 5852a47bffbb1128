use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "emblem")]
#[command(author, version, about = "CI status badge server", long_about = None)]
pub struct Cli {
    /// Path to the configuration JSON file
    #[arg(short, long, env = "EMBLEM_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Override the configured bind port
    #[arg(short, long, env = "EMBLEM_PORT")]
    pub port: Option<u16>,
}
