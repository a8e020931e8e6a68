//! Logger module
//!
//! Provides logging utilities for the file server including:
//! - Startup banner
//! - Access logging with multiple formats
//! - Leveled error, warning, info and debug messages
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{AppState, Config};
use std::net::SocketAddr;
use std::str::FromStr;

/// Minimum severity written to the logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("Unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level = config.logging.level.parse::<LogLevel>()?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )?;
    Ok(())
}

/// Without an initialised writer (tests, early startup) fall back to the console
fn write(level: LogLevel, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= LogLevel::Warn => eprintln!("{message}"),
        None if level == LogLevel::Info => println!("{message}"),
        None => {}
    }
}

/// Announce the listener. Always printed to stdout, whatever the log targets.
/// Startup banner lines: the served root and the live test page URL
///
/// `addr` must be the bound address, so that `--port 0` reports the port
/// the OS actually assigned.
pub fn format_serving_banner(addr: &SocketAddr, state: &AppState) -> [String; 2] {
    let port = addr.port();
    [
        format!("🌐 Serving {} at http://localhost:{port}", state.root.display()),
        format!(
            "📋 Live test: http://localhost:{port}/{}",
            state.config.serve.entry_file.trim_start_matches('/')
        ),
    ]
}

pub fn log_serving_banner(addr: &SocketAddr, state: &AppState) {
    for line in format_serving_banner(addr, state) {
        println!("{line}");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write(LogLevel::Info, &format!("[INFO] Listening on: http://{addr}"));
    write(LogLevel::Info, &format!("[INFO] Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write(LogLevel::Info, &format!("[INFO] Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write(LogLevel::Info, &format!("[INFO] Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(LogLevel::Info, &format!("[INFO] Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(LogLevel::Info, &format!("[INFO] Error log: {path}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(LogLevel::Debug, &format!("[DEBUG] Accepted connection from {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write(LogLevel::Warn, &format!("[WARN] Failed to serve connection: {err}"));
}

pub fn log_shutdown(reason: &str) {
    write(LogLevel::Info, &format!("[INFO] Shutting down: {reason}"));
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &format!("[WARN] {message}"));
}

pub fn log_debug(message: &str) {
    write(LogLevel::Debug, &format!("[DEBUG] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}
