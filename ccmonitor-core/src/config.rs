//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/ccmonitor/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/ccmonitor/` (~/.config/ccmonitor/)
//! - State/Logs: `$XDG_STATE_HOME/ccmonitor/` (~/.local/state/ccmonitor/)

use crate::analytics::ActivityPolicy;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Log root overrides
    #[serde(default)]
    pub paths: PathOverrides,

    /// Timeline aggregation and rendering policy
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Watch mode settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Override paths for assistant log directories
#[derive(Debug, Deserialize, Default)]
pub struct PathOverrides {
    /// Override path for the Claude Code `projects` directory
    pub claude_projects: Option<PathBuf>,
}

/// Timeline policy constants
#[derive(Debug, Deserialize)]
pub struct TimelineConfig {
    /// Default look-back window in days
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Gaps up to this many minutes count as active time
    #[serde(default = "default_idle_threshold_minutes")]
    pub idle_threshold_minutes: f64,

    /// Active minutes credited to a timeline with a single event
    #[serde(default = "default_single_event_minutes")]
    pub single_event_minutes: u32,

    /// Blank columns required between two time-axis labels
    #[serde(default = "default_label_gap")]
    pub label_gap: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            idle_threshold_minutes: default_idle_threshold_minutes(),
            single_event_minutes: default_single_event_minutes(),
            label_gap: default_label_gap(),
        }
    }
}

impl TimelineConfig {
    /// Active-time policy derived from this configuration.
    pub fn activity_policy(&self) -> ActivityPolicy {
        ActivityPolicy {
            idle_threshold_minutes: self.idle_threshold_minutes,
            single_event_minutes: self.single_event_minutes,
        }
    }

    /// Validate policy values, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.default_days == 0 {
            return Err(Error::Config(
                "timeline.default_days must be at least 1".to_string(),
            ));
        }
        if !self.idle_threshold_minutes.is_finite() || self.idle_threshold_minutes < 0.0 {
            return Err(Error::Config(
                "timeline.idle_threshold_minutes must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_days() -> u32 {
    1
}

fn default_idle_threshold_minutes() -> f64 {
    3.0
}

fn default_single_event_minutes() -> u32 {
    5
}

fn default_label_gap() -> usize {
    1
}

/// Watch mode configuration
#[derive(Debug, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between refreshes in watch mode
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    1
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.timeline.validate()?;
        Ok(config)
    }

    /// Root of the Claude Code session logs, honoring the config override.
    ///
    /// Defaults to `~/.claude/projects`.
    pub fn claude_projects_path(&self) -> PathBuf {
        self.paths
            .claude_projects
            .clone()
            .unwrap_or_else(|| home_dir().join(".claude").join("projects"))
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/ccmonitor/config.toml` (~/.config/ccmonitor/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("ccmonitor").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/ccmonitor/` (~/.local/state/ccmonitor/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("ccmonitor")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/ccmonitor/ccmonitor.log` (~/.local/state/ccmonitor/ccmonitor.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("ccmonitor.log")
    }
}
