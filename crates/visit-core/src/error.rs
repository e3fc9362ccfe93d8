//! Waypoint configuration errors.

/// Reasons a points-to-visit configuration is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Odd number of points to visit coordinates: {0} (expected lat/lon pairs)")]
    OddCoordinateCount(usize),

    #[error("Invalid coordinate at position {index}: {value:?}")]
    InvalidNumber { index: usize, value: String },
}
