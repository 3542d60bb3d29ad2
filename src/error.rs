//! Error types
//!
//! Gameplay outcomes (eliminations, episode end) are state transitions, not errors.
//! These cover bad configuration, bad sprite data and host wiring mistakes.

use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("gap center range is empty: [{min}, {max})")]
    EmptyGapRange { min: i32, max: i32 },

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },

    #[error("animation time must be at least one tick")]
    ZeroAnimationTime,

    #[error("invalid config JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Rejected silhouette data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("mask dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },

    #[error("pixel buffer has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("mask has {actual} pixels, expected {expected} for {width}x{height}")]
    BitCount {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors surfaced while driving an episode
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("episode was created for {expected} entrants but {actual} were supplied")]
    PopulationMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
