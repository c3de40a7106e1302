// =============================================================================
// STORAGE
// =============================================================================

/// Workspace-scoped directory for cache, logs and config overrides
pub const STORE_DIR: &str = ".launchviz";

/// Storage key holding the serialized parameter override set
pub const PARAMETER_CACHE_KEY: &str = "parameter_overrides";

/// Config override file looked up inside STORE_DIR
pub const CONFIG_OVERRIDE_FILE: &str = "config.yaml";

// =============================================================================
// LOGGING
// =============================================================================

pub const LOGS_DIR: &str = "logs";

pub const LOG_FILE: &str = "launchviz.log";

/// Used when neither --log nor LAUNCHVIZ_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Terminal input poll timeout
pub const EVENT_POLL_MS: u64 = 25;

/// Minimum time between two redraws (~30fps)
pub const RENDER_THROTTLE_MS: u64 = 33;

// =============================================================================
// ANALYZER
// =============================================================================

/// Interval between readiness probes while the analyzer starts up
pub const ANALYZER_PROBE_INTERVAL_MS: u64 = 100;

/// Line the opener jumps to
pub const OPEN_FILE_LINE: u32 = 0;

// =============================================================================
// UI LAYOUT
// =============================================================================

/// Rows moved by PageUp/PageDown in the tree and form
pub const PAGE_ROWS: usize = 10;

/// Width of the parameter name column in the form
pub const FORM_NAME_WIDTH: u16 = 28;
