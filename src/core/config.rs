//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.roundtable/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoundtableConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub meeting: MeetingConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MeetingConfig {
    pub supervisor_name: Option<String>,
    pub supervisor_title: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    pub summary_interval_secs: Option<u64>,
    pub data_dir: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SUPERVISOR_NAME: &str = "Sarah Mitchell";
pub const DEFAULT_SUPERVISOR_TITLE: &str = "IT Supervisor";
pub const DEFAULT_SUMMARY_INTERVAL_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Who gets the front seat when replies are fanned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSettings {
    pub supervisor_name: String,
    pub supervisor_title: String,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            supervisor_name: DEFAULT_SUPERVISOR_NAME.to_string(),
            supervisor_title: DEFAULT_SUPERVISOR_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub meeting: MeetingSettings,
    pub summary_interval: Duration,
    pub data_dir: PathBuf,
}

/// Values supplied on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub base_url: Option<&'a str>,
    pub timeout_secs: Option<u64>,
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

/// Returns `~/.roundtable`, the home of config and session data.
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".roundtable"))
}

/// Returns the path to `~/.roundtable/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    home_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.roundtable/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RoundtableConfig::default()`.
pub fn load_config() -> Result<RoundtableConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RoundtableConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RoundtableConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<RoundtableConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RoundtableConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Roundtable Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://127.0.0.1:5000"   # Or set ROUNDTABLE_BASE_URL
# request_timeout_secs = 60             # Or set ROUNDTABLE_TIMEOUT_SECS

# [meeting]
# supervisor_name = "Sarah Mitchell"
# supervisor_title = "IT Supervisor"

# [session]
# summary_interval_secs = 30
# data_dir = "/home/me/.roundtable"     # Where session.json is written
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RoundtableConfig, cli: CliOverrides<'_>) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("ROUNDTABLE_BASE_URL").ok())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: CLI → env → config → default. Zero would make every call fail.
    let timeout_secs = cli
        .timeout_secs
        .or_else(|| {
            std::env::var("ROUNDTABLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or(config.server.request_timeout_secs)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    let summary_secs = config
        .session
        .summary_interval_secs
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_SUMMARY_INTERVAL_SECS);

    let data_dir = config
        .session
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(home_dir)
        .unwrap_or_else(|| PathBuf::from(".roundtable"));

    let defaults = MeetingSettings::default();
    let meeting = MeetingSettings {
        supervisor_name: config
            .meeting
            .supervisor_name
            .clone()
            .unwrap_or(defaults.supervisor_name),
        supervisor_title: config
            .meeting
            .supervisor_title
            .clone()
            .unwrap_or(defaults.supervisor_title),
    };

    ResolvedConfig {
        base_url,
        request_timeout: Duration::from_secs(timeout_secs),
        meeting,
        summary_interval: Duration::from_secs(summary_secs),
        data_dir,
    }
}
