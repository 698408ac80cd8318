//! Niched multi-objective particle swarm over classification rules.
//!
//! One sub-swarm (niche) per class label mines rules predicting that
//! label. Particles carry no velocity: they move by turbulence and by
//! recombining with the nearest member of their personal-best front or
//! their niche's front. All niches share one evaluation budget per fold.
//!
//! # Key Types
//!
//! - [`SwarmConfig`]: swarm parameters (size, `w`, `c1`, `c2`, `cr`, budget)
//! - [`NichedSwarm`]: runs one fold through init, iteration and validation
//! - [`FoldReport`]: per-niche training fronts and validation winners
//!
//! # Submodules
//!
//! - [`operators`]: random rule generation, turbulence and recombination
//!
//! # References
//!
//! - Kennedy & Eberhart (1995), "Particle Swarm Optimization"
//! - Brits, Engelbrecht & van den Bergh (2002), "A Niching Particle Swarm Optimizer"
//! - Coello, Pulido & Lechuga (2004), "Handling Multiple Objectives With Particle Swarm Optimization"

mod config;
pub mod operators;
mod particle;
mod runner;

pub use config::{MutationMode, SwarmConfig, ValueScheme};
pub use particle::Particle;
pub use runner::{niche_sizes, FoldReport, NicheReport, NichedSwarm, Phase, ValidatedRule};
