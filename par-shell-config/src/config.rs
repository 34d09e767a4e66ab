//! The `Config` struct plus its persistence and path helpers.

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{KeyBinding, LogLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "par-shell";

/// Session multiplexer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========================================================================
    // Buffers and history
    // ========================================================================
    /// Output lines retained per tab before the oldest are evicted
    #[serde(default = "defaults::max_output_lines")]
    pub max_output_lines: usize,

    /// Commands retained in each tab's own history
    #[serde(default = "defaults::history_capacity")]
    pub history_capacity: usize,

    /// Commands retained in the session-wide history
    #[serde(default = "defaults::global_history_capacity")]
    pub global_history_capacity: usize,

    /// Telemetry events retained before the oldest are evicted
    #[serde(default = "defaults::telemetry_capacity")]
    pub telemetry_capacity: usize,

    // ========================================================================
    // Split layout
    // ========================================================================
    /// Maximum number of top-level splits
    #[serde(default = "defaults::max_splits")]
    pub max_splits: usize,

    /// Grid splits can only be created while fewer than this many splits exist
    #[serde(default = "defaults::max_grid_splits")]
    pub max_grid_splits: usize,

    /// Percent share given to the first child of a grid split
    #[serde(default = "defaults::grid_primary_share")]
    pub grid_primary_share: f32,

    // ========================================================================
    // Timers
    // ========================================================================
    /// Interval between system metric samples (clamped to 2000..=5000)
    #[serde(default = "defaults::metrics_refresh_interval_ms")]
    pub metrics_refresh_interval_ms: u64,

    /// Seconds without input before transient UI is hidden
    #[serde(default = "defaults::idle_hide_timeout_secs")]
    pub idle_hide_timeout_secs: u64,

    // ========================================================================
    // Session
    // ========================================================================
    /// Working directory for newly created tabs
    #[serde(default = "defaults::default_directory")]
    pub default_directory: String,

    /// Active theme name
    #[serde(default = "defaults::theme")]
    pub theme: String,

    /// Active layout name
    #[serde(default = "defaults::layout")]
    pub layout: String,

    /// Base font size in points
    #[serde(default = "defaults::font_size")]
    pub font_size: f32,

    /// Log verbosity used when neither the CLI nor RUST_LOG set one
    #[serde(default = "defaults::log_level")]
    pub log_level: LogLevel,

    // ========================================================================
    // Keybindings
    // ========================================================================
    /// Shortcuts resolved while no text input has focus
    #[serde(default = "defaults::global_keybindings")]
    pub global_keybindings: Vec<KeyBinding>,

    /// Shortcuts resolved while the command line has focus
    #[serde(default = "defaults::command_line_keybindings")]
    pub command_line_keybindings: Vec<KeyBinding>,

    // ========================================================================
    // Persistence
    // ========================================================================
    /// Save the global command history on exit
    #[serde(default = "defaults::bool_true")]
    pub persist_history: bool,

    /// Save the telemetry log on exit
    #[serde(default = "defaults::bool_true")]
    pub persist_telemetry: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_output_lines: defaults::max_output_lines(),
            history_capacity: defaults::history_capacity(),
            global_history_capacity: defaults::global_history_capacity(),
            telemetry_capacity: defaults::telemetry_capacity(),
            max_splits: defaults::max_splits(),
            max_grid_splits: defaults::max_grid_splits(),
            grid_primary_share: defaults::grid_primary_share(),
            metrics_refresh_interval_ms: defaults::metrics_refresh_interval_ms(),
            idle_hide_timeout_secs: defaults::idle_hide_timeout_secs(),
            default_directory: defaults::default_directory(),
            theme: defaults::theme(),
            layout: defaults::layout(),
            font_size: defaults::font_size(),
            log_level: defaults::log_level(),
            global_keybindings: defaults::global_keybindings(),
            command_line_keybindings: defaults::command_line_keybindings(),
            persist_history: true,
            persist_telemetry: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_output_lines(mut self, lines: usize) -> Self {
        self.max_output_lines = lines;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_telemetry_capacity(mut self, capacity: usize) -> Self {
        self.telemetry_capacity = capacity;
        self
    }

    pub fn with_split_limits(mut self, max_splits: usize, max_grid_splits: usize) -> Self {
        self.max_splits = max_splits;
        self.max_grid_splits = max_grid_splits;
        self
    }

    pub fn with_default_directory(mut self, dir: impl Into<String>) -> Self {
        self.default_directory = dir.into();
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persist_history = enabled;
        self.persist_telemetry = enabled;
        self
    }

    /// Load configuration from the default path, creating it if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, writing a default file there if none exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Config path: {:?}", path);

        if !path.exists() {
            log::info!("Config file not found, creating default at {:?}", path);
            let config = Self::default();
            if let Err(e) = config.save_to(path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            return Ok(config);
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let mut config: Config = serde_yaml_ng::from_str(&contents)?;

        // Pick up default bindings for actions added since the file was written
        config.merge_default_keybindings();
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(|e| ConfigError::io(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| ConfigError::io(path, e))?;

        Ok(())
    }

    /// Configuration directory (`~/.config/par-shell`, or the platform config dir on Windows).
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("history.yaml")
    }

    pub fn telemetry_path() -> PathBuf {
        Self::config_dir().join("telemetry.yaml")
    }

    /// Add default keybindings whose actions the user has not configured.
    ///
    /// Applies to both binding scopes independently.
    pub fn merge_default_keybindings(&mut self) {
        let added = merge_missing(&mut self.global_keybindings, defaults::global_keybindings())
            + merge_missing(
                &mut self.command_line_keybindings,
                defaults::command_line_keybindings(),
            );

        if added > 0 {
            log::info!("Merged {} new default keybinding(s) into user config", added);
        }
    }

    /// Clamp out-of-range values into their supported ranges.
    pub fn normalize(&mut self) {
        let interval = self.metrics_refresh_interval_ms.clamp(
            defaults::MIN_METRICS_REFRESH_MS,
            defaults::MAX_METRICS_REFRESH_MS,
        );
        if interval != self.metrics_refresh_interval_ms {
            log::warn!(
                "metrics_refresh_interval_ms {} out of range, using {}",
                self.metrics_refresh_interval_ms,
                interval
            );
            self.metrics_refresh_interval_ms = interval;
        }

        let font = self
            .font_size
            .clamp(defaults::MIN_FONT_SIZE, defaults::MAX_FONT_SIZE);
        if font != self.font_size {
            log::warn!("font_size {} out of range, using {}", self.font_size, font);
            self.font_size = font;
        }
    }

    /// Reject values that cannot be clamped into something meaningful.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_splits == 0 {
            return Err(ConfigError::Validation(
                "max_splits must be at least 1".to_string(),
            ));
        }
        if self.max_grid_splits == 0 {
            return Err(ConfigError::Validation(
                "max_grid_splits must be at least 1".to_string(),
            ));
        }
        if !(self.grid_primary_share > 0.0 && self.grid_primary_share < 100.0) {
            return Err(ConfigError::Validation(format!(
                "grid_primary_share must be between 0 and 100, got {}",
                self.grid_primary_share
            )));
        }
        Ok(())
    }
}

fn merge_missing(target: &mut Vec<KeyBinding>, defaults: Vec<KeyBinding>) -> usize {
    let existing: HashSet<String> = target.iter().map(|kb| kb.action.clone()).collect();
    let mut added = 0;
    for default_kb in defaults {
        if !existing.contains(&default_kb.action) {
            log::info!(
                "Adding new default keybinding: {} -> {}",
                default_kb.key,
                default_kb.action
            );
            target.push(default_kb);
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_documented_limits() {
        let config = Config::default();
        assert_eq!(config.max_output_lines, 1000);
        assert_eq!(config.history_capacity, 500);
        assert_eq!(config.telemetry_capacity, 1000);
        assert_eq!(config.max_splits, 4);
        assert_eq!(config.max_grid_splits, 3);
        assert_eq!(config.metrics_refresh_interval_ms, 2000);
        assert_eq!(config.default_directory, "~");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml_ng::from_str("max_splits: 6\ntheme: light\n").unwrap();
        assert_eq!(config.max_splits, 6);
        assert_eq!(config.theme, "light");
        assert_eq!(config.max_output_lines, 1000);
        assert!(!config.global_keybindings.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_writes_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let config = Config::new()
            .with_max_output_lines(250)
            .with_default_directory("/tmp")
            .with_persistence(false);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.max_output_lines, 250);
        assert_eq!(loaded.default_directory, "/tmp");
        assert!(!loaded.persist_history);
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn test_load_clamps_metrics_interval_and_font() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "metrics_refresh_interval_ms: 100\nfont_size: 99\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.metrics_refresh_interval_ms, 2000);
        assert_eq!(config.font_size, 32.0);
    }

    #[test]
    fn test_load_rejects_zero_splits() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_splits: 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_reports_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "max_splits: [not a number\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_adds_only_missing_actions() {
        let mut config = Config {
            global_keybindings: vec![KeyBinding::new("Ctrl+Alt+T", "new_tab")],
            command_line_keybindings: Vec::new(),
            ..Config::default()
        };
        config.merge_default_keybindings();

        let new_tab: Vec<_> = config
            .global_keybindings
            .iter()
            .filter(|kb| kb.action == "new_tab")
            .collect();
        assert_eq!(new_tab.len(), 1);
        assert_eq!(new_tab[0].key, "Ctrl+Alt+T");
        assert_eq!(
            config.global_keybindings.len(),
            defaults::global_keybindings().len()
        );
        assert_eq!(
            config.command_line_keybindings,
            defaults::command_line_keybindings()
        );
    }
}
