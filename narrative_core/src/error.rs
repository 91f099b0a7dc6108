//! Engine errors. Only setup and export are fallible; story flow never is.

use story_rules::ContentError;
use thiserror::Error;

/// Errors raised while loading or validating [`crate::EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid range for {field}: {min} > {max}")]
    InvalidRange { field: &'static str, min: u64, max: u64 },

    #[error("Probability {field} must be within 0.0..=1.0, got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("Narrator memory capacity must be at least 1")]
    EmptyMemory,
}

/// Top-level error for the narrative engine.
#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}

/// Error an observer may report back. The engine logs it and carries on.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Observer rejected notification: {0}")]
    Rejected(String),
}
