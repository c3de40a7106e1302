pub mod config;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod storage;
pub mod types;
pub mod ui;

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current time in milliseconds since UNIX epoch
pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}
