//! Pager error types
//!
//! Interaction itself never fails: degenerate input is clamped or ignored.
//! Errors only surface where configuration enters the system.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a config file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config text is not valid TOML for a pager config
    #[error("failed to parse pager config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("failed to serialize pager config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A ratio outside `0..=1`
    #[error("{field} must be within 0..=1, got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    /// A length, duration or velocity below zero (or not finite)
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },

    /// Direction tolerance outside `0..=90` degrees
    #[error("gesture_direction_tolerance_deg must be within 0..=90, got {0}")]
    InvalidTolerance(f32),

    /// Spring parameters that cannot produce motion
    #[error("scroll_to_page_spring.{field} must be positive, got {value}")]
    InvalidSpring { field: &'static str, value: f32 },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
