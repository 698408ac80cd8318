//! Crowding distance over a niche's front.
//!
//! # Algorithm
//!
//! 1. Sort the rules by [`by_total_order`] (accuracy, then effectiveness)
//! 2. Assign [`BOUNDARY_DISTANCE`] to the first and last rule
//! 3. For each interior rule and each front objective, add
//!    `|next - prev| / (|last - first| + ε)`
//!
//! Higher distance means a more isolated (more diverse) rule.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use super::dominance::{by_total_order, objective_value};
use crate::fitness::Objectives;

/// Distance given to the two extremes of the sorted front.
pub const BOUNDARY_DISTANCE: f64 = f64::MAX;

/// Keeps the normalization finite when an objective has zero spread.
const EPSILON: f64 = 1e-9;

/// Indices of `points` in [`by_total_order`] order.
pub fn total_order_indices(points: &[Objectives]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..points.len()).collect();
    indices.sort_by(|&a, &b| by_total_order(&points[a], &points[b]));
    indices
}

/// Crowding distance of every point, returned in input order.
///
/// Fronts of one or two points are all boundary.
///
/// # Example
///
/// ```
/// use u_nichepso::fitness::Objectives;
/// use u_nichepso::pareto::{crowding_distances, BOUNDARY_DISTANCE};
///
/// let front = vec![
///     Objectives::new(1.0, 0.9, 0.1),
///     Objectives::new(1.0, 0.5, 0.5),
///     Objectives::new(1.0, 0.1, 0.9),
/// ];
/// let d = crowding_distances(&front);
/// assert_eq!(d[0], BOUNDARY_DISTANCE);
/// assert_eq!(d[2], BOUNDARY_DISTANCE);
/// assert!(d[1].is_finite());
/// ```
pub fn crowding_distances(points: &[Objectives]) -> Vec<f64> {
    let n = points.len();
    if n <= 2 {
        return vec![BOUNDARY_DISTANCE; n];
    }

    let order = total_order_indices(points);
    let mut distances = vec![0.0f64; n];
    distances[order[0]] = BOUNDARY_DISTANCE;
    distances[order[n - 1]] = BOUNDARY_DISTANCE;

    let objectives: [fn(&Objectives) -> f64; 2] = [
        |o| objective_value(o.effectiveness),
        |o| objective_value(o.accuracy),
    ];

    for value in objectives {
        let first = value(&points[order[0]]);
        let last = value(&points[order[n - 1]]);
        let range = (last - first).abs() + EPSILON;

        for i in 1..(n - 1) {
            let prev = value(&points[order[i - 1]]);
            let next = value(&points[order[i + 1]]);
            distances[order[i]] += (next - prev).abs() / range;
        }
    }

    distances
}
