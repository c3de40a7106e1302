//! File-backed tracing subscriber.
//!
//! The terminal belongs to the UI, so log output goes to
//! `<store>/logs/launchviz.log` instead of stderr.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::constants::{DEFAULT_LOG_FILTER, LOG_FILE, LOGS_DIR};

/// Install the global subscriber. Returns the log file path.
///
/// `filter` uses `EnvFilter` syntax (`debug`, `launchviz=trace,lv_mod_tree=debug`);
/// an unparsable filter falls back to the default level.
pub fn init(store_dir: &Path, filter: Option<&str>) -> io::Result<PathBuf> {
    let dir = store_dir.join(LOGS_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(path)
}
