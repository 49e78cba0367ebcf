//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.telemenu/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ControlScheme;
use crate::core::binding::DirectionalControls;
use crate::core::engine::{
    DEFAULT_IDLE_TRANSMISSION_INTERVAL, DEFAULT_SETTLE_WINDOW, DEFAULT_TRANSMISSION_INTERVAL,
    EngineSettings,
};
use crate::core::host::InputId;
use crate::core::menu::DEFAULT_REFRESH_INTERVAL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TelemenuConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    pub settle_window_ms: Option<u64>,
    pub settle_on_forward: Option<bool>,
    pub transmission_interval_ms: Option<u64>,
    pub idle_transmission_interval_ms: Option<u64>,
    pub refresh_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ControlsConfig {
    pub up: Option<InputId>,
    pub down: Option<InputId>,
    pub left: Option<InputId>,
    pub right: Option<InputId>,
    pub cycle: Option<InputId>,
    pub back: Option<InputId>,
    pub forward: Option<InputId>,
    pub select: Option<InputId>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CYCLE_INPUT: &str = "tab";
pub const DEFAULT_BACK_INPUT: &str = "backspace";
pub const DEFAULT_FORWARD_INPUT: &str = "]";
pub const DEFAULT_SELECT_INPUT: &str = "enter";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: EngineSettings,
    pub controls: DirectionalControls,
    pub cycle: InputId,
    pub back: InputId,
    pub forward: InputId,
    pub select: InputId,
    pub refresh_interval: Duration,
    pub log_level: LevelFilter,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub scheme: Option<ControlScheme>,
    pub settle_ms: Option<u64>,
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

/// Returns the path to `~/.telemenu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".telemenu").join("config.toml"))
}

/// Load config from `path`, or from `~/.telemenu/config.toml` when `None`.
///
/// A missing default config is generated (commented out) and treated as
/// empty. A missing explicit path is an I/O error. A malformed file
/// returns `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<TelemenuConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => {
                if !p.exists() {
                    info!("No config file found, generating default at {}", p.display());
                    generate_default_config(&p);
                    return Ok(TelemenuConfig::default());
                }
                p
            }
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(TelemenuConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<TelemenuConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Telemenu Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [engine]
# settle_window_ms = 250               # Or set TELEMENU_SETTLE_MS
# settle_on_forward = false
# transmission_interval_ms = 50        # While the engine owns the display
# idle_transmission_interval_ms = 250  # Restored on shutdown
# refresh_interval_ms = 250            # Cursor blink / redraw cadence

# [controls]
# up = "up"
# down = "down"
# left = "left"
# right = "right"
# cycle = "tab"
# back = "backspace"
# forward = "]"
# select = "enter"

# [logging]
# level = "debug"                      # Or set TELEMENU_LOG_LEVEL
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
pub fn resolve(config: &TelemenuConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Settle window: CLI → env → config → default
    let settle_window = cli
        .settle_ms
        .or_else(|| env_u64("TELEMENU_SETTLE_MS"))
        .or(config.engine.settle_window_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_SETTLE_WINDOW);

    let settings = EngineSettings {
        settle_window,
        settle_on_forward: config.engine.settle_on_forward.unwrap_or(false),
        transmission_interval: config
            .engine
            .transmission_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TRANSMISSION_INTERVAL),
        idle_transmission_interval: config
            .engine
            .idle_transmission_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_IDLE_TRANSMISSION_INTERVAL),
    };

    let controls = resolve_controls(&config.controls, cli.scheme);

    // Log level: env → config → default
    let log_level = std::env::var("TELEMENU_LOG_LEVEL")
        .ok()
        .or_else(|| config.logging.level.clone())
        .map(|s| parse_level(&s))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let c = &config.controls;
    ResolvedConfig {
        settings,
        controls,
        cycle: c.cycle.clone().unwrap_or_else(|| DEFAULT_CYCLE_INPUT.into()),
        back: c.back.clone().unwrap_or_else(|| DEFAULT_BACK_INPUT.into()),
        forward: c.forward.clone().unwrap_or_else(|| DEFAULT_FORWARD_INPUT.into()),
        select: c.select.clone().unwrap_or_else(|| DEFAULT_SELECT_INPUT.into()),
        refresh_interval: config
            .engine
            .refresh_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL),
        log_level,
    }
}

/// A CLI scheme wins outright; otherwise each direction falls back from the
/// config file to the arrow preset independently.
fn resolve_controls(config: &ControlsConfig, scheme: Option<ControlScheme>) -> DirectionalControls {
    if let Some(scheme) = scheme {
        return scheme.controls();
    }
    let defaults = DirectionalControls::arrows();
    DirectionalControls {
        up: config.up.clone().unwrap_or(defaults.up),
        down: config.down.clone().unwrap_or(defaults.down),
        left: config.left.clone().unwrap_or(defaults.left),
        right: config.right.clone().unwrap_or(defaults.right),
    }
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}

fn parse_level(raw: &str) -> LevelFilter {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!("Unknown log level {:?}, using {}", raw, DEFAULT_LOG_LEVEL);
        DEFAULT_LOG_LEVEL
    })
}
