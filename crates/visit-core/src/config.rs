//! Points-to-visit configuration parsing.
//!
//! The configuration surface is a flat list of latitude/longitude pairs in
//! decimal degrees. Conversion to radians happens here, once per update.

use crate::error::ConfigError;
use crate::models::Waypoint;

/// Convert a flat `[lat, lon, lat, lon, ...]` degree list into waypoints.
///
/// The input is never modified, so applying the same configuration twice
/// yields the same radians.
pub fn waypoints_from_degrees(points_deg: &[f64]) -> Result<Vec<Waypoint>, ConfigError> {
    if points_deg.len() % 2 != 0 {
        return Err(ConfigError::OddCoordinateCount(points_deg.len()));
    }

    Ok(points_deg
        .chunks_exact(2)
        .map(|pair| Waypoint::from_degrees(pair[0], pair[1]))
        .collect())
}

/// Parse a textual coordinate list separated by commas and/or whitespace.
///
/// Only number syntax is checked; pairing is left to [`waypoints_from_degrees`].
pub fn parse_points(raw: &str) -> Result<Vec<f64>, ConfigError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| ConfigError::InvalidNumber {
                index,
                value: token.to_string(),
            })
        })
        .collect()
}
