//! YAML configuration: embedded defaults plus an optional workspace override.
use std::fs;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ConfigError;

pub mod constants;

// ============================================================================
// Configuration Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub analyzer: AnalyzerConfig,
    pub tree: TreeConfig,
    pub opener: OpenerConfig,
    pub theme: ThemeColors,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    /// Executable started as `<program> --port <port>`
    pub program: String,
    pub host: String,
    /// 0 = pick a free port at startup
    pub port: u16,
    /// Spawn the analyzer ourselves instead of connecting to a running one
    pub spawn: bool,
    pub startup_wait_ms: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeConfig {
    /// Node type assumed when the analyzer omits one
    pub fallback_type: String,
    /// Node type hidden by the type filter
    pub excluded_type: String,
    /// Stripped from node paths before opening, first match wins
    pub file_scheme_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenerConfig {
    pub program: String,
    /// `{path}` and `{line}` are substituted per request
    pub args: Vec<String>,
}

/// RGB color as [r, g, b] array
pub type RgbColor = [u8; 3];

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeColors {
    pub accent: RgbColor,
    pub accent_dim: RgbColor,
    pub error: RgbColor,
    pub warning: RgbColor,
    pub text: RgbColor,
    pub text_muted: RgbColor,
    pub selected: RgbColor,
    pub node: RgbColor,
    pub match_bg: RgbColor,
    pub bg_base: RgbColor,
    pub bg_elevated: RgbColor,
    pub border: RgbColor,
}

// ============================================================================
// Loading Functions
// ============================================================================

const DEFAULT_CONFIG_NAME: &str = "config.yaml";

/// Embedded at compile time so the binary runs without any file on disk.
const DEFAULT_CONFIG_YAML: &str = include_str!("../../../../yamls/config.yaml");

fn parse_default() -> Value {
    serde_yaml::from_str(DEFAULT_CONFIG_YAML).unwrap_or(Value::Null)
}

/// Recursively overlay `overlay` onto `base`. Mappings merge key by key;
/// every other value (scalars, sequences) replaces what was there.
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (slot, value) => *slot = value,
    }
}

impl AppConfig {
    /// The built-in defaults.
    pub fn defaults() -> Result<Self, ConfigError> {
        serde_yaml::from_value(parse_default())
            .map_err(|source| ConfigError::Parse { name: DEFAULT_CONFIG_NAME.to_string(), source })
    }

    /// Defaults with the YAML text `overlay` merged on top.
    pub fn from_overlay(name: &str, overlay: &str) -> Result<Self, ConfigError> {
        let overlay: Value =
            serde_yaml::from_str(overlay).map_err(|source| ConfigError::Parse { name: name.to_string(), source })?;
        let mut merged = parse_default();
        merge_yaml(&mut merged, overlay);
        serde_yaml::from_value(merged).map_err(|source| ConfigError::Parse { name: name.to_string(), source })
    }

    /// Load defaults, overridden by `path` when given, else by the workspace
    /// override file when it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let workspace = Path::new(constants::STORE_DIR).join(constants::CONFIG_OVERRIDE_FILE);
        let path = match path {
            Some(p) => p.to_path_buf(),
            None if workspace.exists() => workspace,
            None => return Self::defaults(),
        };
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        Self::from_overlay(&path.display().to_string(), &text)
    }
}

// ============================================================================
// Global Configuration
// ============================================================================

static INSTALLED: OnceLock<AppConfig> = OnceLock::new();

/// Fallback used before `install` runs (tests, early startup).
static BUILTIN: LazyLock<Option<AppConfig>> = LazyLock::new(|| AppConfig::defaults().ok());

/// Install the resolved config. Only the first call has an effect.
pub fn install(config: AppConfig) {
    if INSTALLED.set(config).is_err() {
        tracing::warn!("config already installed, ignoring second install");
    }
}

/// The installed config, or the built-in defaults if nothing was installed.
pub fn config() -> Option<&'static AppConfig> {
    INSTALLED.get().or(BUILTIN.as_ref())
}

// =============================================================================
// THEME COLORS
// =============================================================================

pub mod theme {
    use crate::config::{RgbColor, ThemeColors, config};
    use ratatui::style::Color;

    fn pick(f: fn(&ThemeColors) -> RgbColor, fallback: Color) -> Color {
        match config() {
            Some(cfg) => {
                let c = f(&cfg.theme);
                Color::Rgb(c[0], c[1], c[2])
            }
            None => fallback,
        }
    }

    pub fn accent() -> Color {
        pick(|t| t.accent, Color::Green)
    }
    pub fn accent_dim() -> Color {
        pick(|t| t.accent_dim, Color::DarkGray)
    }
    pub fn error() -> Color {
        pick(|t| t.error, Color::Red)
    }
    pub fn warning() -> Color {
        pick(|t| t.warning, Color::Yellow)
    }
    pub fn text() -> Color {
        pick(|t| t.text, Color::White)
    }
    pub fn text_muted() -> Color {
        pick(|t| t.text_muted, Color::Gray)
    }
    pub fn selected() -> Color {
        pick(|t| t.selected, Color::Red)
    }
    pub fn node() -> Color {
        pick(|t| t.node, Color::LightRed)
    }
    pub fn match_bg() -> Color {
        pick(|t| t.match_bg, Color::DarkGray)
    }
    pub fn bg_base() -> Color {
        pick(|t| t.bg_base, Color::Reset)
    }
    pub fn bg_elevated() -> Color {
        pick(|t| t.bg_elevated, Color::DarkGray)
    }
    pub fn border() -> Color {
        pick(|t| t.border, Color::Gray)
    }
}
