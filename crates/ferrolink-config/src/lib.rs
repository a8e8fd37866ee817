//! Configuration management system for FerroLink
//!
//! This crate loads the list of source/destination pairs and the history-log
//! location that drive a FerroLink run, together with performance and
//! logging settings.
//!
//! # Features
//!
//! - **Multiple formats**: YAML, TOML and JSON configuration files
//! - **Validation**: Required keys are checked before a run starts
//! - **Environment overrides**: `FERROLINK__<KEY>` variables override file values
//! - **Defaults**: Sensible default values for every optional setting
//!
//! # Examples
//!
//! ```rust,no_run
//! use ferrolink_config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_source_file("ferrolink.yaml")
//!     .add_env_prefix("FERROLINK")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! println!("History log: {}", config.history_file.display());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use ferrolink_types::{SyncPair, ThreadCount};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Main configuration structure for FerroLink
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path of the append-only history log
    #[serde(default)]
    pub history_file: PathBuf,
    /// Source/destination pairs, processed in order
    #[serde(default)]
    pub pairs: Vec<PairConfig>,
    /// Performance-related configuration
    #[serde(default)]
    pub performance: PerformanceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Configuration written by `ferrolink config init`
    pub fn example() -> Self {
        Self {
            pairs: vec![PairConfig::new("/path/to/source", "/path/to/destination")],
            history_file: PathBuf::from("history.txt"),
            ..Self::default()
        }
    }

    /// Pairs converted for the sync engine, in configuration order
    pub fn sync_pairs(&self) -> Vec<SyncPair> {
        self.pairs.iter().map(PairConfig::to_sync_pair).collect()
    }
}

/// One configured source/destination pair
///
/// Either directory may be absent; such a pair is reported and skipped at
/// run time rather than rejected while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairConfig {
    /// Directory to mirror
    #[serde(default)]
    pub source_directory: Option<PathBuf>,
    /// Directory receiving the hard links
    #[serde(default)]
    pub destination_directory: Option<PathBuf>,
}

impl PairConfig {
    /// Create a complete pair
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, destination: D) -> Self {
        Self {
            source_directory: Some(source.into()),
            destination_directory: Some(destination.into()),
        }
    }

    /// Convert to an engine pair; a missing directory becomes an empty path
    pub fn to_sync_pair(&self) -> SyncPair {
        SyncPair::new(
            self.source_directory.clone().unwrap_or_default(),
            self.destination_directory.clone().unwrap_or_default(),
        )
    }
}

/// Performance-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// Number of workers creating links within one pair
    #[serde(default)]
    pub link_workers: ThreadCount,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatting
    #[serde(default)]
    pub json_format: bool,
    /// Write logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Enable colored output
    #[serde(default = "default_colored_output")]
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            log_file: None,
            colored_output: default_colored_output(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_colored_output() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_conversion_keeps_order() {
        let config = Config {
            pairs: vec![
                PairConfig::new("/a", "/b"),
                PairConfig {
                    source_directory: None,
                    destination_directory: Some(PathBuf::from("/d")),
                },
            ],
            history_file: PathBuf::from("history.txt"),
            ..Config::default()
        };

        let pairs = config.sync_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], SyncPair::new("/a", "/b"));
        assert!(pairs[0].is_complete());
        assert!(!pairs[1].is_complete());
        assert_eq!(pairs[1].destination_directory, PathBuf::from("/d"));
    }

    #[test]
    fn test_example_config() {
        let config = Config::example();
        assert_eq!(config.pairs.len(), 1);
        assert_eq!(config.history_file, PathBuf::from("history.txt"));
        assert_eq!(config.performance.link_workers.get(), 1);
        assert_eq!(config.logging.level, "info");
    }
}
