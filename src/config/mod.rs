// Configuration module entry point
// Layers defaults, the config file, environment and command line

pub mod cli;
mod state;
mod types;

use std::net::SocketAddr;

pub use cli::CliArgs;
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig};

impl Config {
    /// Load configuration for the given command line.
    ///
    /// Precedence, lowest first: built-in defaults, the config file (optional),
    /// `COI_<SECTION>__<KEY>` environment variables, command-line flags.
    pub fn load(args: &CliArgs) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(&args.config_path).required(false))
            .add_source(
                config::Environment::with_prefix("COI")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("serve.root", ".")?
            .set_default("serve.entry_file", "live-test.html")?
            .set_default("serve.index_files", vec!["index.html", "index.htm"])?
            .set_default("serve.directory_listing", true)?
            .set_default("http.server_name", concat!("coi-serve/", env!("CARGO_PKG_VERSION")))?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 75)?;

        if let Some(host) = &args.host {
            builder = builder.set_override("server.host", host.as_str())?;
        }
        if let Some(port) = args.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(root) = args.root() {
            builder = builder.set_override("serve.root", root)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = &self.server.host;
        let port = self.server.port;
        // Bare IPv6 literals need brackets before they parse as a socket address
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };
        addr.parse().map_err(|e| format!("Invalid address '{addr}': {e}"))
    }
}
