//! Configuration for the simdweave tools
//!
//! The vector core takes no configuration: its backend is fixed when the
//! crate is compiled. These settings drive the command-line tool, the
//! planar file interleaver and the backend self-test.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::element::ElementKind;
use crate::error::{Error, Result};

/// Log levels accepted in `system.log_level`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Layout of planar and interleaved files
    pub layout: LayoutConfig,
    /// Backend self-test settings
    pub selftest: SelfTestConfig,
    /// System-wide settings
    pub system: SystemConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a file as pretty JSON
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(2..=4).contains(&self.layout.ways) {
            return Err(Error::config(format!(
                "layout.ways must be 2, 3 or 4, got {}",
                self.layout.ways
            )));
        }

        if self.selftest.iterations == 0 {
            return Err(Error::config("selftest.iterations must be > 0"));
        }

        if !LOG_LEVELS.contains(&self.system.log_level.as_str()) {
            return Err(Error::config(format!(
                "system.log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.system.log_level
            )));
        }

        Ok(())
    }
}

/// Layout of planar and interleaved files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Element type stored in the files
    pub element: ElementKind,
    /// Number of planes interleaved together
    pub ways: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            element: ElementKind::F32,
            ways: 3,
        }
    }
}

/// Backend self-test settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfTestConfig {
    /// Random vectors checked per element kind
    pub iterations: usize,
    /// Seed for the random vectors
    pub seed: u64,
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        Self {
            iterations: 256,
            seed: 0x5eed,
        }
    }
}

/// System-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
