//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypoint/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::lock;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypointConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub dialogs: DialogsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavigationConfig {
    pub modal_animated: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DialogsConfig {
    pub dismiss_text: Option<String>,
    pub snackbar_duration_ms: Option<u64>,
    pub open_settings_text: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODAL_ANIMATED: bool = true;
pub const DEFAULT_DISMISS_TEXT: &str = "OK";
pub const DEFAULT_SNACKBAR_DURATION_MS: u64 = 3000;
pub const DEFAULT_OPEN_SETTINGS_TEXT: &str = "Open Settings";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_FILE: &str = "waypoint.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub modal_animated: bool,
    pub dismiss_text: String,
    pub snackbar_duration_ms: u64,
    pub open_settings_text: String,
    pub log_level: log::LevelFilter,
    pub log_file: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.waypoint/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypoint").join("config.toml"))
}

/// Load config from `~/.waypoint/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WaypointConfig::default()`.
pub fn load_config() -> Result<WaypointConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(WaypointConfig::default())
        }
    }
}

/// Load config from an explicit path. Malformed files yield `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<WaypointConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(WaypointConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: WaypointConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Waypoint Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [navigation]
# modal_animated = true              # Or set WAYPOINT_MODAL_ANIMATED

# [dialogs]
# dismiss_text = "OK"
# snackbar_duration_ms = 3000
# open_settings_text = "Open Settings"

# [logging]
# level = "info"                     # "off", "error", "warn", "info", "debug", "trace"
# file = "waypoint.log"              # Or set WAYPOINT_LOG_FILE
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_log_level` comes from the command line (None = not specified).
pub fn resolve(config: &WaypointConfig, cli_log_level: Option<&str>) -> ResolvedConfig {
    // Log level: CLI → env → config → default
    let level_name = cli_log_level
        .map(|s| s.to_string())
        .or_else(|| std::env::var("WAYPOINT_LOG_LEVEL").ok())
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = level_name.parse().unwrap_or_else(|_| {
        warn!("Unknown log level '{}', falling back to {}", level_name, DEFAULT_LOG_LEVEL);
        log::LevelFilter::Info
    });

    let log_file = std::env::var("WAYPOINT_LOG_FILE")
        .ok()
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    // Modal animation: env → config → default
    let modal_animated = std::env::var("WAYPOINT_MODAL_ANIMATED")
        .ok()
        .and_then(|v| v.parse().ok())
        .or(config.navigation.modal_animated)
        .unwrap_or(DEFAULT_MODAL_ANIMATED);

    ResolvedConfig {
        modal_animated,
        dismiss_text: config
            .dialogs
            .dismiss_text
            .clone()
            .unwrap_or_else(|| DEFAULT_DISMISS_TEXT.to_string()),
        snackbar_duration_ms: config
            .dialogs
            .snackbar_duration_ms
            .unwrap_or(DEFAULT_SNACKBAR_DURATION_MS),
        open_settings_text: config
            .dialogs
            .open_settings_text
            .clone()
            .unwrap_or_else(|| DEFAULT_OPEN_SETTINGS_TEXT.to_string()),
        log_level,
        log_file,
    }
}

// ============================================================================
// Startup Log
// ============================================================================

/// Log writer that holds lines in memory until the log file is known.
///
/// The logger has to exist before the config is loaded, but the config
/// names the log file. Install the logger over this writer, load and
/// resolve, then [`attach`](Self::attach) the file: buffered lines are
/// written to it first.
#[derive(Clone, Default)]
pub struct DeferredLog {
    target: Arc<Mutex<LogTarget>>,
}

enum LogTarget {
    Buffered(Vec<u8>),
    File(File),
    Discard,
}

impl Default for LogTarget {
    fn default() -> Self {
        LogTarget::Buffered(Vec::new())
    }
}

impl DeferredLog {
    /// Flush the buffer into `file` and write straight to it from now on.
    /// `None` drops the buffer and discards later lines.
    pub fn attach(&self, file: Option<File>) -> io::Result<()> {
        let mut target = lock(&self.target);
        let pending = match std::mem::replace(&mut *target, LogTarget::Discard) {
            LogTarget::Buffered(pending) => pending,
            attached => {
                *target = attached;
                return Ok(());
            }
        };
        if let Some(mut file) = file {
            file.write_all(&pending)?;
            *target = LogTarget::File(file);
        }
        Ok(())
    }
}

impl Write for DeferredLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut target = lock(&self.target);
        match &mut *target {
            LogTarget::Buffered(pending) => {
                pending.extend_from_slice(buf);
                Ok(buf.len())
            }
            LogTarget::File(file) => file.write(buf),
            LogTarget::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *lock(&self.target) {
            LogTarget::File(file) => file.flush(),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
