//! Repeated stratified k-fold cross-validation around the niched swarm.
//!
//! Each repetition reshuffles the class-stratified folds; each fold trains
//! a fresh [`NichedSwarm`](crate::pso::NichedSwarm) on the other folds and
//! validates its niche fronts on the held-out one.
//!
//! # Key Types
//!
//! - [`CrossValidationConfig`]: folds, repetitions, seed
//! - [`ExperimentConfig`]: complete experiment parsed from flat properties
//! - [`CrossValidation`]: the driver
//! - [`CvReport`]: fold reports plus per-niche and global averages

mod config;
mod kfold;
mod runner;

pub use config::{CrossValidationConfig, DatasetConfig, ExperimentConfig};
pub use kfold::stratified_folds;
pub use runner::{CrossValidation, CvReport, NicheAverage, RunReport};
