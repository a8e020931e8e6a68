// Command-line arguments
// Only overrides for the handful of settings people change per invocation

use clap::Parser;

pub const DEFAULT_CONFIG_FILE: &str = "coi-serve.toml";

/// Serve a directory over HTTP with cross-origin isolation headers on every response
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "coi-serve", version)]
pub struct CliArgs {
    /// Configuration file
    #[arg(short, long = "config", value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config_path: String,

    /// Address to bind (default: 0.0.0.0)
    #[arg(long, value_name = "ADDR")]
    pub host: Option<String>,

    /// Port to listen on (default: 8000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve (default: .)
    #[arg(short, long = "root", value_name = "DIR", conflicts_with = "root_dir")]
    pub root_flag: Option<String>,

    /// Directory to serve, as a positional argument
    #[arg(value_name = "ROOT")]
    pub root_dir: Option<String>,
}

impl CliArgs {
    /// Root directory from either `--root` or the positional argument
    pub fn root(&self) -> Option<&str> {
        self.root_flag.as_deref().or(self.root_dir.as_deref())
    }
}
