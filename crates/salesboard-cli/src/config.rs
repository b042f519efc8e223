//! CLI configuration loaded from `salesboard.toml`
//!
//! Every key is optional:
//!
//! ```toml
//! data_file = "vendas.xlsx"
//! currency = "R$"
//! title = "Sales Report by Branch"
//! report_path = "relatorio_vendas.xlsx"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "salesboard.toml";

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// CLI settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Input table used when no FILE argument is given
    pub data_file: PathBuf,
    /// Currency symbol for reports
    pub currency: String,
    /// Report title
    pub title: String,
    /// Default export path for `report`
    pub report_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("vendas.xlsx"),
            currency: "R$".into(),
            title: "Sales Report by Branch".into(),
            report_path: PathBuf::from("relatorio_vendas.xlsx"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the configuration for a run
    ///
    /// An explicit path must exist. Without one, `salesboard.toml` in the
    /// working directory is used when present, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            tracing::debug!(path = DEFAULT_CONFIG_FILE, "using config from working directory");
            Self::from_file(fallback)
        } else {
            Ok(Self::default())
        }
    }
}
