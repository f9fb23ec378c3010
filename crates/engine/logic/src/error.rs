//! Error types for the logic crate

use thiserror::Error;

/// Result type alias for logic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or validating rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// `temperature_min` is greater than `temperature_max`
    #[error("temperature range inverted: min {min} > max {max}")]
    TemperatureRange { min: f32, max: f32 },

    /// A coordinate axis has `min` greater than `max`
    #[error("{axis} range inverted: min {min} > max {max}")]
    CoordinateRange { axis: char, min: i32, max: i32 },

    /// Both a dimension whitelist and a dimension blacklist are present
    #[error("rule declares both `dimensions` and `dimensions_blacklist`")]
    ConflictingDimensions,

    /// Identifier is not a valid `namespace:path`
    #[error("invalid resource identifier: {0:?}")]
    InvalidIdentifier(String),
}
