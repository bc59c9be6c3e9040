//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and translating a heap profile
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read profile {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Profile is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid profile format: {0}")]
    InvalidProfile(String),
}

/// Errors raised by the interactive tree model
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Aggregates are stale; call update() after changing exclusions")]
    StaleModel,

    #[error("Cannot compute heat color for node: {0}")]
    Computation(String),

    #[error("No frame at index {0}")]
    UnknownFrame(usize),
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to render flamegraph: {0}")]
    Render(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a filter preset
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filter preset: {0}")]
    Toml(#[from] toml::de::Error),
}
