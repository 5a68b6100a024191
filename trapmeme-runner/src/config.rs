//! TOML application config.
//!
//! Every section and field is optional; a missing file section falls back to
//! the dashboard defaults (BTC/USDT, $10,000, Conservative, 100 hourly bars).
//!
//! ```toml
//! [session]
//! coin = "ETH/USDT"
//! capital = 25000.0
//! risk_profile = "Aggressive"
//! seed = 42
//!
//! [generator]
//! bars = 100
//! interval_minutes = 60
//!
//! [output]
//! dir = "results"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use trapmeme_core::domain::{RiskProfile, SMA_WINDOW};
use trapmeme_core::GeneratorConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Trader-facing defaults for an analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub coin: String,
    pub capital: f64,
    pub risk_profile: RiskProfile,
    /// Master seed. `None` draws a fresh one per run.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            coin: "BTC/USDT".into(),
            capital: 10_000.0,
            risk_profile: RiskProfile::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub generator: GeneratorConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.coin.trim().is_empty() {
            return Err(ConfigError::Invalid("session.coin must not be empty".into()));
        }
        if !(self.session.capital.is_finite() && self.session.capital > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "session.capital must be positive, got {}",
                self.session.capital
            )));
        }
        if self.generator.bars < SMA_WINDOW {
            return Err(ConfigError::Invalid(format!(
                "generator.bars must be at least {SMA_WINDOW} to evaluate a signal, got {}",
                self.generator.bars
            )));
        }
        self.generator
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}
