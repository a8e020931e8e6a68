// Application state module
// Holds the validated configuration shared by every connection

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::types::Config;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonical root directory, resolved once at startup
    pub root: PathBuf,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    /// Build state from configuration, validating the root directory.
    ///
    /// A missing root, or one that is not a directory, is a startup error.
    pub fn new(config: Config) -> Result<Self, String> {
        let root = canonical_root(&config.serve.root)?;
        let cached_access_log = Arc::new(AtomicBool::new(config.logging.access_log));

        Ok(Self {
            config,
            root,
            cached_access_log,
        })
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}

fn canonical_root(root: &str) -> Result<PathBuf, String> {
    let path = Path::new(root)
        .canonicalize()
        .map_err(|e| format!("Root directory '{root}' is not accessible: {e}"))?;
    if !path.is_dir() {
        return Err(format!("Root '{root}' is not a directory"));
    }
    Ok(path)
}
