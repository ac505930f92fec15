//! Configuration loading and hierarchy management
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment,
//! command line. The command line layer is applied by the CLI module.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::EngineConfig;
use crate::error::{FramecatError, FramecatResult};
use crate::listfile::DEFAULT_MAX_LINE_LENGTH;
use crate::streams::TrackKind;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "framecat.toml";

/// Environment variables and the setting each one overrides
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("FRAMECAT_LOG_LEVEL", "log.level"),
    ("FRAMECAT_LOG_FORMAT", "log.format"),
    ("FRAMECAT_MAX_LINE_LENGTH", "list.max_line_length"),
    ("FRAMECAT_TRACKS", "tracks.kinds"),
    ("FRAMECAT_OVERWRITE", "output.overwrite"),
];

/// Complete Framecat configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramecatConfig {
    pub log: LogSettings,
    pub list: ListSettings,
    pub tracks: TrackSettings,
    pub output: OutputSettings,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `framecat=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Single-line text format
    Compact,
    /// JSON lines for structured logging
    Json,
}

impl FromStr for LogFormat {
    type Err = FramecatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(FramecatError::Config {
                message: format!("Unknown log format: {}", other),
            }),
        }
    }
}

/// File list settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Line buffer size, terminator included
    pub max_line_length: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Output track selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Kinds carried to the output, in output index order
    pub kinds: Vec<TrackKind>,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            kinds: vec![TrackKind::Video, TrackKind::Audio],
        }
    }
}

/// Output file settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub overwrite: OverwritePolicy,
}

/// Overwrite policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace an existing output file
    #[default]
    Always,
    /// Refuse to run when the output file exists
    Never,
}

impl FromStr for OverwritePolicy {
    type Err = FramecatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" | "yes" | "true" => Ok(OverwritePolicy::Always),
            "never" | "no" | "false" => Ok(OverwritePolicy::Never),
            other => Err(FramecatError::Config {
                message: format!("Unknown overwrite policy: {}", other),
            }),
        }
    }
}

impl fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverwritePolicy::Always => f.write_str("always"),
            OverwritePolicy::Never => f.write_str("never"),
        }
    }
}

impl FramecatConfig {
    /// Load defaults, then the config file, then environment overrides.
    /// The result is not validated, since command line flags may still
    /// replace any of these values.
    ///
    /// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// used only when present.
    pub fn load(path: Option<&Path>) -> FramecatResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> FramecatResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FramecatError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        debug!("Loading configuration from: {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> FramecatResult<Self> {
        toml::from_str(content).map_err(|e| FramecatError::Config {
            message: format!("Failed to parse TOML config: {}", e),
        })
    }

    /// Apply overrides from a variable lookup, see [`ENV_OVERRIDES`]
    pub fn apply_env_with<F>(&mut self, lookup: F) -> FramecatResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        for &(var, key) in ENV_OVERRIDES {
            let Some(value) = lookup(var) else {
                continue;
            };
            debug!("Found environment override: {} = {}", var, value);
            self.set(key, &value)?;
            applied += 1;
        }

        if applied > 0 {
            debug!("Applied {} environment variable overrides", applied);
        }
        Ok(())
    }

    /// Set one setting from its dotted key
    pub fn set(&mut self, key: &str, value: &str) -> FramecatResult<()> {
        match key {
            "log.level" => self.log.level = value.trim().to_string(),
            "log.format" => self.log.format = value.parse()?,
            "list.max_line_length" => {
                self.list.max_line_length =
                    value.trim().parse().map_err(|_| FramecatError::Config {
                        message: format!("Invalid max line length: {}", value),
                    })?
            }
            "tracks.kinds" => self.tracks.kinds = TrackKind::parse_list(value)?,
            "output.overwrite" => self.output.overwrite = value.parse()?,
            other => {
                return Err(FramecatError::Config {
                    message: format!("Unknown setting: {}", other),
                })
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> FramecatResult<()> {
        if self.list.max_line_length < 2 {
            return Err(FramecatError::Config {
                message: "list.max_line_length must be at least 2".to_string(),
            });
        }
        if self.tracks.kinds.is_empty() {
            return Err(FramecatError::Config {
                message: "tracks.kinds must name at least one track kind".to_string(),
            });
        }
        if let Some(kind) = self.tracks.kinds.iter().find(|kind| !kind.is_registrable()) {
            return Err(FramecatError::Config {
                message: format!("Track kind '{}' cannot be carried to the output", kind),
            });
        }
        Ok(())
    }

    /// Engine settings for one concatenation run
    pub fn engine_config(&self, list_path: &Path, output_path: &Path) -> EngineConfig {
        EngineConfig {
            list_path: list_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            track_kinds: self.tracks.kinds.clone(),
            max_line_length: self.list.max_line_length,
            overwrite: self.output.overwrite,
        }
    }
}
