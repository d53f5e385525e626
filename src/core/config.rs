//! Configuration module for `studytrack`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path of the program data file
    #[serde(default)]
    pub data_file: String,
    /// Directory for exported report files
    #[serde(default)]
    pub reports_dir: String,
}

const fn default_scale_min() -> f64 {
    1.0
}

const fn default_scale_max() -> f64 {
    5.0
}

const fn default_passing_grade() -> f64 {
    4.0
}

const fn default_max_attempts() -> u8 {
    3
}

const fn default_target_grade() -> f64 {
    2.5
}

/// Grading convention the engine evaluates grades against.
///
/// The scale is numeric with lower values being better; a grade passes when
/// it is less than or equal to `passing_grade`. All engine entry points take
/// this struct explicitly so the same engine can be tested against other
/// conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Best grade on the scale
    #[serde(default = "default_scale_min")]
    pub scale_min: f64,
    /// Worst grade on the scale
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
    /// Pass/fail cutoff; a grade equal to the cutoff passes
    #[serde(default = "default_passing_grade")]
    pub passing_grade: f64,
    /// Attempt count above which a module is flagged critical
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u8,
    /// Target grade for the modules-above-target indicator
    #[serde(default = "default_target_grade")]
    pub target_grade: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            scale_min: default_scale_min(),
            scale_max: default_scale_max(),
            passing_grade: default_passing_grade(),
            max_attempts: default_max_attempts(),
            target_grade: default_target_grade(),
        }
    }
}

impl GradingConfig {
    /// Whether a grade lies within the scale bounds (inclusive)
    #[must_use]
    pub fn contains(&self, grade: f64) -> bool {
        (self.scale_min..=self.scale_max).contains(&grade)
    }

    /// Whether a grade passes; the cutoff itself passes
    #[must_use]
    pub fn is_passing(&self, grade: f64) -> bool {
        grade <= self.passing_grade
    }

    /// Check that the scale is internally consistent
    ///
    /// # Errors
    /// Returns a description of the first inconsistency.
    pub fn validate(&self) -> Result<(), String> {
        if self.scale_min >= self.scale_max {
            return Err(format!(
                "grading scale is empty: scale_min {} must be below scale_max {}",
                self.scale_min, self.scale_max
            ));
        }
        if !self.contains(self.passing_grade) {
            return Err(format!(
                "passing grade {} lies outside the scale {}..{}",
                self.passing_grade, self.scale_min, self.scale_max
            ));
        }
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Grading convention
    #[serde(default)]
    pub grading: GradingConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override program data file path
    pub data_file: Option<String>,
    /// Override report output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$STUDYTRACK` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/studytrack`
    /// - macOS: `~/Library/Application Support/studytrack`
    /// - Windows: `%APPDATA%\studytrack`
    #[must_use]
    pub fn get_studytrack_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("studytrack")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading configuration so that fields added in newer versions
    /// are populated with their default values. Only string fields that are
    /// empty in the current config and non-empty in defaults are updated;
    /// grading values always deserialize with usable defaults and do not
    /// participate.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        // Merge logging fields - only if they're empty (use defaults for empty values)
        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        // Merge paths fields
        if self.paths.data_file.is_empty() && !defaults.paths.data_file.is_empty() {
            self.paths.data_file.clone_from(&defaults.paths.data_file);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// This allows command-line arguments to override configuration file
    /// values without modifying the persistent configuration file. Only
    /// non-`None` values in the overrides struct will replace config values.
    ///
    /// # Arguments
    ///
    /// * `overrides` - A `ConfigOverrides` struct with optional override values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(data_file) = &overrides.data_file {
            self.paths.data_file.clone_from(data_file);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// Returns the full path to the configuration file:
    /// - `config.toml` for release builds
    /// - `dconfig.toml` for debug builds (allows separate debug config)
    ///
    /// The file is located in the directory returned by [`get_studytrack_dir`].
    ///
    /// [`get_studytrack_dir`]: Self::get_studytrack_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_studytrack_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$STUDYTRACK` variable in a string
    ///
    /// Replaces occurrences of `$STUDYTRACK` with the actual studytrack
    /// directory path, so configuration values can reference the config
    /// directory dynamically.
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains("$STUDYTRACK") {
            let studytrack_dir = Self::get_studytrack_dir();
            value.replace("$STUDYTRACK", studytrack_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses a TOML configuration string and expands any `$STUDYTRACK`
    /// variables in path values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the
    /// expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        // Expand variables in config values
        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.data_file = Self::expand_variables(&config.paths.data_file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// Loads the compiled-in default configuration bundled with the binary.
    /// The defaults differ between debug and release builds:
    /// - Debug: Uses `DefaultConfigDebug.toml`
    /// - Release: Uses `DefaultConfigRelease.toml`
    ///
    /// # Returns
    /// A `Config` instance with all values set to their defaults.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. This
    /// should never happen in practice since the defaults are compiled into
    /// the binary.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// This is the primary way to load configuration. It handles several scenarios:
    /// - If config file exists: Loads from file, merges missing fields from defaults, saves updated config
    /// - If config file doesn't exist (first run): Creates config directory if needed, loads defaults, saves to file
    ///
    /// The merge behavior ensures that upgrading the application automatically
    /// adds new config fields while preserving existing user settings.
    ///
    /// # Returns
    /// A `Config` instance loaded from file or defaults. Falls back to
    /// defaults if any error occurs during loading.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    // Merge any missing fields from defaults
                    if config.merge_defaults(&defaults) {
                        // Save the updated config with new fields
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            // First run: create directory and config file from defaults

            // Create the directory if it doesn't exist
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // Save the default config
            let _ = defaults.save();

            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// Serializes the current configuration to TOML and writes it to the
    /// platform-specific config file. The config directory will be created
    /// if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config cannot be serialized to TOML (shouldn't happen)
    /// - The config directory cannot be created
    /// - The file cannot be written (permissions, disk full, etc.)
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys:
    /// - `level`: Logging level ("debug", "info", "warn", "error")
    /// - `file`: Log file path
    /// - `verbose`: Verbose logging boolean
    /// - `data_file`: Program data file path
    /// - `reports_dir`: Report output directory path
    /// - `scale_min`, `scale_max`, `passing_grade`, `max_attempts`,
    ///   `target_grade`: Grading convention values
    ///
    /// # Arguments
    /// - `key`: The configuration key to retrieve
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "data_file" | "data-file" => Some(self.paths.data_file.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "scale_min" | "scale-min" => Some(self.grading.scale_min.to_string()),
            "scale_max" | "scale-max" => Some(self.grading.scale_max.to_string()),
            "passing_grade" | "passing-grade" => Some(self.grading.passing_grade.to_string()),
            "max_attempts" | "max-attempts" => Some(self.grading.max_attempts.to_string()),
            "target_grade" | "target-grade" => Some(self.grading.target_grade.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates a configuration value using a string key and value. The value
    /// is validated and converted to the appropriate type.
    ///
    /// Note: This method updates the in-memory config. Call
    /// [`save()`](Config::save) to persist changes.
    ///
    /// # Arguments
    /// - `key`: The configuration key to set
    /// - `value`: The new value as a string
    ///
    /// # Errors
    /// Returns an error if:
    /// - The key is not recognized
    /// - The value cannot be parsed (e.g., "maybe" for verbose boolean)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "data_file" | "data-file" => self.paths.data_file = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "scale_min" | "scale-min" => self.grading.scale_min = parse_number(key, value)?,
            "scale_max" | "scale-max" => self.grading.scale_max = parse_number(key, value)?,
            "passing_grade" | "passing-grade" => {
                self.grading.passing_grade = parse_number(key, value)?;
            }
            "max_attempts" | "max-attempts" => {
                self.grading.max_attempts = value
                    .parse::<u8>()
                    .map_err(|_| format!("Invalid attempt count for 'max_attempts': '{value}'"))?;
            }
            "target_grade" | "target-grade" => {
                self.grading.target_grade = parse_number(key, value)?;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// Resets a single configuration value to its default, taken from the
    /// provided defaults config (typically from
    /// [`from_defaults()`](Config::from_defaults)).
    ///
    /// Note: This method updates the in-memory config. Call
    /// [`save()`](Config::save) to persist changes.
    ///
    /// # Arguments
    /// - `key`: The configuration key to reset
    /// - `defaults`: A config instance containing default values
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "data_file" | "data-file" => {
                self.paths.data_file.clone_from(&defaults.paths.data_file);
            }
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "scale_min" | "scale-min" => self.grading.scale_min = defaults.grading.scale_min,
            "scale_max" | "scale-max" => self.grading.scale_max = defaults.grading.scale_max,
            "passing_grade" | "passing-grade" => {
                self.grading.passing_grade = defaults.grading.passing_grade;
            }
            "max_attempts" | "max-attempts" => {
                self.grading.max_attempts = defaults.grading.max_attempts;
            }
            "target_grade" | "target-grade" => {
                self.grading.target_grade = defaults.grading.target_grade;
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file, causing the next
    /// [`load()`](Config::load) call to recreate it from defaults. This
    /// removes all user customizations; the CLI requires confirmation before
    /// calling it.
    ///
    /// If the config file doesn't exist, this method succeeds without doing
    /// anything.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    /// (permissions, file locked, etc.)
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("Invalid numeric value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  data_file = \"{}\"", self.paths.data_file)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[grading]")?;
        writeln!(f, "  scale_min = {}", self.grading.scale_min)?;
        writeln!(f, "  scale_max = {}", self.grading.scale_max)?;
        writeln!(f, "  passing_grade = {}", self.grading.passing_grade)?;
        writeln!(f, "  max_attempts = {}", self.grading.max_attempts)?;
        writeln!(f, "  target_grade = {}", self.grading.target_grade)?;

        Ok(())
    }
}
