//! Runtime configuration for `dockctl` and embedding hosts.
//!
//! ```toml
//! # dockspace.toml
//! storage_dir = ".dockspace"
//! layout_id = "trading"
//! log_filter = "dock_layout=debug,info"
//! log_json = false
//!
//! [engine]
//! min_percent = 15.0
//!
//! [[panels]]
//! id = "chart"
//! title = "Price Chart"
//! width = 60.0
//! ```
//!
//! Every field has a default; `panels` is the initial panel set used when no
//! layout is persisted (and by `reset`).

use std::fmt;
use std::path::{Path, PathBuf};

use dock_layout::{EngineConfig, PanelDescriptor};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_DIR: &str = ".dockspace";
pub const DEFAULT_LAYOUT_ID: &str = "default";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub storage_dir: PathBuf,
    pub layout_id: String,
    /// `EnvFilter` directives; `DOCK_LOG` overrides this when set.
    pub log_filter: String,
    pub log_json: bool,
    pub engine: EngineConfig,
    pub panels: Vec<PanelDescriptor>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            layout_id: DEFAULT_LAYOUT_ID.to_owned(),
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_json: false,
            engine: EngineConfig::default(),
            panels: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load `path` when given, defaults otherwise, and reject invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Parameters outside their meaningful range. An empty list means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.layout_id.trim().is_empty() {
            errors.push("layout_id must not be empty".to_owned());
        }
        errors.extend(
            self.engine
                .validate()
                .into_iter()
                .map(|e| format!("engine.{e}")),
        );
        errors
    }
}

/// Errors that can occur when loading a runtime configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
