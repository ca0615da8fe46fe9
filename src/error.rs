//! Error types.
//!
//! The controller itself never fails: degenerate tuning degrades to reduced
//! or no-op behavior. The only fallible surface is loading configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a [`PlatformerConfig`](crate::config::PlatformerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid RON for a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
