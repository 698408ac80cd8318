//! Niched multi-objective particle swarm optimization for classification
//! rule mining.
//!
//! Every class label gets its own sub-swarm (niche) whose particles are
//! conjunctive rules such as `(petal_length < 2.5) AND (sepal_width >= 3)`.
//! Rules are scored on two maximized objectives, effectiveness
//! (sensitivity × specificity) and accuracy, and each niche keeps a
//! bounded Pareto front of the best trade-offs it has found.
//!
//! - **Rules**: [`rule`] conditions, canonical text rendering and parsing.
//! - **Data access**: [`dataset`] defines the [`RecordStore`](dataset::RecordStore)
//!   contract the optimizer queries; [`MemoryStore`](dataset::MemoryStore)
//!   implements it in memory.
//! - **Fitness**: [`fitness`] turns a rule's query result into objectives
//!   and counts evaluations, the swarm's only stopping clock.
//! - **Fronts**: [`pareto`] dominance, bounded archives, crowding distance.
//! - **Swarm**: [`pso`] operators and the per-fold niched swarm.
//! - **Validation**: [`crossval`] stratified folds, repetitions, averages.
//!
//! # Architecture
//!
//! The crate holds no I/O. Reading tables, properties files or writing
//! reports belongs to the consumer, which plugs a store into
//! [`CrossValidation`](crossval::CrossValidation) or drives
//! [`NichedSwarm`](pso::NichedSwarm) fold by fold. Logging goes through
//! `tracing`; no subscriber is installed here.

pub mod crossval;
pub mod dataset;
pub mod error;
pub mod fitness;
pub mod pareto;
pub mod pso;
pub(crate) mod random;
pub mod rule;
