//! Pairwise travel-cost matrix between the vehicle and the waypoints.
//!
//! Node 0 is the vehicle position, nodes 1..=N are the waypoints in
//! configuration order. Costs are WGS84 ranges in meters.

use crate::models::{Position, Waypoint};
use crate::spatial::wgs84_bearing_and_range;

/// Symmetric (N+1)×(N+1) cost matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// Build the matrix for a vehicle at `origin` and the given waypoints.
    pub fn build(origin: Position, waypoints: &[Waypoint]) -> Self {
        let nodes: Vec<(f64, f64)> = std::iter::once((origin.lat, origin.lon))
            .chain(waypoints.iter().map(|wp| (wp.lat, wp.lon)))
            .collect();

        Self::from_fn(nodes.len(), |i, j| {
            let (lat1, lon1) = nodes[i];
            let (lat2, lon2) = nodes[j];
            // Bearing is not part of the cost
            let (_, range) = wgs84_bearing_and_range(lat1, lon1, lat2, lon2);
            range
        })
    }

    /// Build a symmetric matrix from a cost function.
    ///
    /// `cost(i, j)` is called once per unordered pair with `i < j` and the
    /// result is mirrored; the diagonal is zero.
    pub fn from_fn(size: usize, mut cost: impl FnMut(usize, usize) -> f64) -> Self {
        let mut cells = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let c = cost(i, j);
                cells[i * size + j] = c;
                cells[j * size + i] = c;
            }
        }
        Self { size, cells }
    }

    /// Cost of travelling from node `i` to node `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cells[i * self.size + j]
    }

    /// Number of nodes including the origin.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of waypoint nodes (excludes the origin).
    pub fn waypoint_count(&self) -> usize {
        self.size.saturating_sub(1)
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::wgs84_range;

    fn sample_waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint::from_degrees(41.1850, -8.7060),
            Waypoint::from_degrees(41.1870, -8.7020),
            Waypoint::from_degrees(41.1830, -8.7000),
            Waypoint::from_degrees(41.1900, -8.7100),
        ]
    }

    #[test]
    fn no_waypoints_gives_single_zero_cell() {
        let matrix = DistanceMatrix::build(Position::from_degrees(41.0, -8.0), &[]);
        assert_eq!(matrix.size(), 1);
        assert_eq!(matrix.waypoint_count(), 0);
        assert_eq!(matrix.get(0, 0), 0.0);
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let origin = Position::from_degrees(41.1840, -8.7080);
        let matrix = DistanceMatrix::build(origin, &sample_waypoints());

        assert_eq!(matrix.size(), 5);
        assert!(matrix.is_symmetric());
        for i in 0..matrix.size() {
            assert_eq!(matrix.get(i, i), 0.0);
            for j in 0..matrix.size() {
                assert!(matrix.get(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn node_indices_follow_configuration_order() {
        // Regression guard: row 0 is the vehicle, row k is waypoint k-1 of the list.
        let origin = Position::from_degrees(41.1840, -8.7080);
        let wps = sample_waypoints();
        let matrix = DistanceMatrix::build(origin, &wps);

        for (k, wp) in wps.iter().enumerate() {
            let expected = wgs84_range(origin.lat, origin.lon, wp.lat, wp.lon);
            assert_eq!(matrix.get(0, k + 1), expected);
            assert_eq!(matrix.get(k + 1, 0), expected);
        }

        for (i, a) in wps.iter().enumerate() {
            for (j, b) in wps.iter().enumerate() {
                if i == j {
                    continue;
                }
                let expected = wgs84_range(a.lat, a.lon, b.lat, b.lon);
                assert!((matrix.get(i + 1, j + 1) - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn duplicate_coordinates_cost_nothing() {
        let wp = Waypoint::from_degrees(41.1850, -8.7060);
        let origin = Position::new(wp.lat, wp.lon);
        let matrix = DistanceMatrix::build(origin, &[wp, wp]);
        assert_eq!(matrix.get(0, 1), 0.0);
        assert_eq!(matrix.get(1, 2), 0.0);
    }

    #[test]
    fn from_fn_mirrors_upper_triangle() {
        let matrix = DistanceMatrix::from_fn(3, |i, j| (i * 10 + j) as f64);
        assert_eq!(matrix.get(0, 2), 2.0);
        assert_eq!(matrix.get(2, 0), 2.0);
        assert_eq!(matrix.get(1, 2), 12.0);
        assert_eq!(matrix.get(2, 1), 12.0);
        assert_eq!(matrix.rows().count(), 3);
    }
}
