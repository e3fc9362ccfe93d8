//! Exact closed-tour optimizer.
//!
//! Enumerates every ordering of the waypoint nodes and keeps the cheapest
//! Hamiltonian cycle that starts and ends at node 0. This is O(N!) and only
//! practical for small waypoint counts; there is no approximation fallback
//! and no time limit, so callers must bound N themselves.

use serde::{Deserialize, Serialize};

use crate::matrix::DistanceMatrix;

/// Waypoint count above which the exhaustive search gets noticeably slow.
pub const PRACTICAL_WAYPOINT_LIMIT: usize = 10;

/// Visiting order of waypoint nodes (1..=N) with its closed-tour cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub order: Vec<usize>,
    /// Total cycle cost in meters, including the legs to and from node 0
    pub cost: f64,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// Find the minimum-cost tour over all waypoint nodes of `matrix`.
///
/// Permutations are generated in lexicographic order starting from
/// `[1, 2, .., N]` and a candidate only replaces the best when strictly
/// cheaper, so ties resolve to the lexicographically first ordering.
pub fn solve(matrix: &DistanceMatrix) -> Route {
    let n = matrix.waypoint_count();
    let mut order: Vec<usize> = (1..=n).collect();

    // Trivial cases
    if n <= 1 {
        let cost = tour_cost(matrix, &order);
        return Route { order, cost };
    }

    let mut best = order.clone();
    let mut best_cost = tour_cost(matrix, &order);
    while next_permutation(&mut order) {
        let cost = tour_cost(matrix, &order);
        if cost < best_cost {
            best_cost = cost;
            best.clone_from(&order);
        }
    }

    Route {
        order: best,
        cost: best_cost,
    }
}

/// Cost of the closed tour `0 -> order[0] -> .. -> order[last] -> 0`.
pub fn tour_cost(matrix: &DistanceMatrix, order: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut current = 0;
    for &node in order {
        total += matrix.get(current, node);
        current = node;
    }
    total + matrix.get(current, 0)
}

/// Rearrange `values` into the next lexicographically greater permutation.
///
/// Returns false and leaves the slice sorted ascending once the last
/// permutation has been passed.
pub fn next_permutation<T: Ord>(values: &mut [T]) -> bool {
    if values.len() < 2 {
        return false;
    }

    // Longest non-increasing suffix starts at `pivot + 1`
    let mut i = values.len() - 1;
    while i > 0 && values[i - 1] >= values[i] {
        i -= 1;
    }
    if i == 0 {
        values.reverse();
        return false;
    }

    let pivot = i - 1;
    let mut j = values.len() - 1;
    while values[j] <= values[pivot] {
        j -= 1;
    }
    values.swap(pivot, j);
    values[i..].reverse();
    true
}
