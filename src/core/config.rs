//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `<config_dir>/changedir/config.toml` (usually
//! `~/.config/changedir/config.toml`). If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChangedirConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub install: InstallConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub history_file: Option<String>,
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InstallConfig {
    pub color: Option<ColorMode>,
    pub fish_config_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    Always,
    Never,
}

// ============================================================================
// Defaults
// ============================================================================

pub const APP_DIR: &str = "changedir";
pub const HISTORY_FILE_NAME: &str = "history.json";
pub const LOG_FILE_NAME: &str = "changedir.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub history_file: PathBuf,
    pub log_level: LogLevel,
    pub log_file: PathBuf,
    pub color: bool,
    pub fish_config_dir: PathBuf,
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

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `<config_dir>/changedir/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// `<data_dir>/changedir`, falling back to the current directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load config from the default location.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChangedirConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChangedirConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine config directory, using default config");
            return Ok(ChangedirConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ChangedirConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        // Runs before logging is set up, so the user has to see this here.
        if let Err(e) = generate_default_config(path) {
            eprintln!(
                "Warning: could not write default config {}: {e}",
                path.display()
            );
            warn!("Failed to write default config: {e}");
        }
        return Ok(ChangedirConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChangedirConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG: &str = r#"# changedir configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# history_file = "/home/me/.local/share/changedir/history.json"  # Or CHANGEDIR_HISTORY / --history
# log_level = "warn"                 # "off", "error", "warn", "info", "debug", "trace"

# [install]
# color = "auto"                     # "auto", "always", "never" (NO_COLOR disables auto)
# fish_config_dir = "/home/me/.config/fish"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_history` is the `--history` flag (None = not specified).
pub fn resolve(config: &ChangedirConfig, cli_history: Option<&Path>) -> ResolvedConfig {
    let data = data_dir();

    // History file: CLI → env → config → default
    let history_file = cli_history
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("CHANGEDIR_HISTORY").map(PathBuf::from))
        .or_else(|| config.general.history_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| data.join(HISTORY_FILE_NAME));

    let color = match config.install.color.unwrap_or_default() {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
        }
    };

    let fish_config_dir = config
        .install
        .fish_config_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("fish")))
        .unwrap_or_else(|| PathBuf::from(".config").join("fish"));

    ResolvedConfig {
        history_file,
        log_level: config.general.log_level.unwrap_or_default(),
        log_file: data.join(LOG_FILE_NAME),
        color,
        fish_config_dir,
    }
}
