//! Multi-objective machinery: dominance, bounded archives and crowding.
//!
//! Dominance is decided on `(effectiveness, accuracy)` only, both
//! maximized. Three orderings are exposed as plain functions and chosen
//! explicitly by each call site:
//!
//! - [`dominates`] / [`dominance_cmp`]: Pareto dominance (partial order)
//! - [`by_total_order`]: accuracy then effectiveness (archive sorting)
//! - [`crowding_distances`]: diversity contribution (truncation, reports)
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - Coello, Pulido & Lechuga (2004), "Handling Multiple Objectives With Particle Swarm Optimization"

mod archive;
mod crowding;
mod dominance;

pub use archive::{Archive, Insertion, Truncation, DEFAULT_CAPACITY};
pub use crowding::{crowding_distances, total_order_indices, BOUNDARY_DISTANCE};
pub use dominance::{
    by_total_order, distance, dominance_cmp, dominates, non_dominated, objective_value, Dominance,
};
