//! Run configuration: an optional TOML file, overridden by command-line flags.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "/var/log/inss-refund.log"
//! rate_tables = "rate_tables.csv"
//! window_years = 5
//! output = "json"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use inss_core::DEFAULT_WINDOW_YEARS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Bare level or full `EnvFilter` directive. `RUST_LOG` wins over it.
    pub log_level: String,
    pub log_file: Option<PathBuf>,

    /// CSV replacing the built-in statutory tables.
    pub rate_tables: Option<PathBuf>,
    pub window_years: u32,
    pub output: OutputFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            rate_tables: None,
            window_years: DEFAULT_WINDOW_YEARS,
            output: OutputFormat::Text,
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub rate_tables: Option<PathBuf>,
    pub window_years: Option<u32>,
    pub output: Option<OutputFormat>,
}

impl AppConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File values (or defaults when there is no file) with CLI values on top.
    pub fn resolve(
        path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(
        &mut self,
        overrides: ConfigOverrides,
    ) {
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(file) = overrides.log_file {
            self.log_file = Some(file);
        }
        if let Some(rates) = overrides.rate_tables {
            self.rate_tables = Some(rates);
        }
        if let Some(years) = overrides.window_years {
            self.window_years = years;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
    }
}
