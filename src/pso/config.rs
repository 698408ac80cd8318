//! Swarm configuration.
//!
//! [`SwarmConfig`] holds all parameters that control one fold's run.

use crate::error::ConfigError;
use crate::pareto::{Truncation, DEFAULT_CAPACITY};

/// Which value-perturbation scheme turbulence applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MutationMode {
    /// Keyed by particle index mod 3: non-uniform Gaussian, uniform
    /// directional, no turbulence.
    #[default]
    PerParticle,
    /// Every particle uses the non-uniform Gaussian scheme.
    Gaussian,
    /// Every particle uses the uniform directional scheme.
    Uniform,
}

/// A single value-perturbation scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueScheme {
    /// `old + N(0, 0.1 · range)`, clamped to the attribute bounds.
    Gaussian,
    /// `old + (max - old) · U(0,1)` or `old - (old - min) · U(0,1)`.
    Uniform,
}

impl MutationMode {
    /// Scheme for the particle at `index`, or `None` if it is exempt.
    pub fn scheme_for(self, index: usize) -> Option<ValueScheme> {
        match self {
            MutationMode::PerParticle => match index % 3 {
                0 => Some(ValueScheme::Gaussian),
                1 => Some(ValueScheme::Uniform),
                _ => None,
            },
            MutationMode::Gaussian => Some(ValueScheme::Gaussian),
            MutationMode::Uniform => Some(ValueScheme::Uniform),
        }
    }
}

/// Configuration of the niched swarm.
///
/// # Defaults
///
/// ```
/// use u_nichepso::pso::SwarmConfig;
///
/// let config = SwarmConfig::default();
/// assert_eq!(config.swarm_size, 60);
/// assert_eq!(config.archive_capacity, 30);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_nichepso::pso::SwarmConfig;
///
/// let config = SwarmConfig::default()
///     .with_swarm_size(90)
///     .with_inertia(0.3)
///     .with_cognitive(0.7)
///     .with_social(0.9)
///     .with_max_iterations(5_000)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwarmConfig {
    /// Total particles, split across class niches.
    pub swarm_size: usize,

    /// Inertia `w` (0.0–1.0).
    ///
    /// There is no velocity in rule space; inertia is the chance that a
    /// particle makes a self-driven random move (turbulence) each iteration.
    pub inertia: f64,

    /// Cognitive coefficient `c1` (0.0–1.0): probability of recombining
    /// with the nearest member of the particle's personal-best archive.
    pub cognitive: f64,

    /// Social coefficient `c2` (0.0–1.0): probability of recombining with
    /// the nearest member of the niche archive.
    pub social: f64,

    /// Crossover rate `cr` (0.0–1.0): per-draw probability of taking the
    /// next condition from the best neighbour rather than the own position.
    pub crossover_rate: f64,

    /// Evaluation budget of one fold, shared by all niches.
    pub max_iterations: usize,

    /// Bound on every archive (niche and personal best).
    pub archive_capacity: usize,

    /// Turbulence scheme selection.
    pub mutation_mode: MutationMode,

    /// Eviction strategy for over-full archives.
    pub truncation: Truncation,

    /// Probability that a fresh condition compares two numeric attributes
    /// instead of an attribute and a literal.
    pub attribute_operand_rate: f64,

    /// Validate niches on the rayon pool (`parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            swarm_size: 60,
            inertia: 0.4,
            cognitive: 0.8,
            social: 0.8,
            crossover_rate: 0.5,
            max_iterations: 2_000,
            archive_capacity: DEFAULT_CAPACITY,
            mutation_mode: MutationMode::default(),
            truncation: Truncation::default(),
            attribute_operand_rate: 0.1,
            parallel: false,
            seed: None,
        }
    }
}

impl SwarmConfig {
    /// Sets the swarm size.
    pub fn with_swarm_size(mut self, n: usize) -> Self {
        self.swarm_size = n;
        self
    }

    /// Sets the inertia `w`.
    pub fn with_inertia(mut self, w: f64) -> Self {
        self.inertia = w.clamp(0.0, 1.0);
        self
    }

    /// Sets the cognitive coefficient `c1`.
    pub fn with_cognitive(mut self, c1: f64) -> Self {
        self.cognitive = c1.clamp(0.0, 1.0);
        self
    }

    /// Sets the social coefficient `c2`.
    pub fn with_social(mut self, c2: f64) -> Self {
        self.social = c2.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate `cr`.
    pub fn with_crossover_rate(mut self, cr: f64) -> Self {
        self.crossover_rate = cr.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-fold evaluation budget.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the archive capacity.
    pub fn with_archive_capacity(mut self, n: usize) -> Self {
        self.archive_capacity = n;
        self
    }

    pub fn with_mutation_mode(mut self, mode: MutationMode) -> Self {
        self.mutation_mode = mode;
        self
    }

    pub fn with_truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }

    /// Sets the attribute-to-attribute operand rate.
    pub fn with_attribute_operand_rate(mut self, rate: f64) -> Self {
        self.attribute_operand_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel validation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Fields are public, so probabilities set directly are checked here
    /// rather than trusted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.swarm_size == 0 {
            return Err(ConfigError::OutOfRange {
                name: "swarm_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_iterations",
                reason: "must be at least 1".into(),
            });
        }
        if self.archive_capacity < 2 {
            return Err(ConfigError::OutOfRange {
                name: "archive_capacity",
                reason: "must be at least 2".into(),
            });
        }
        for (name, p) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
            ("crossover_rate", self.crossover_rate),
            ("attribute_operand_rate", self.attribute_operand_rate),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::OutOfRange {
                    name,
                    reason: format!("{p} is not a probability"),
                });
            }
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus the check that every one of
    /// `classes` niches receives at least one particle.
    pub fn validate_for(&self, classes: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.swarm_size < classes {
            return Err(ConfigError::SwarmTooSmall {
                swarm_size: self.swarm_size,
                classes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SwarmConfig::default();
        assert_eq!(config.swarm_size, 60);
        assert!((config.inertia - 0.4).abs() < 1e-10);
        assert!((config.cognitive - 0.8).abs() < 1e-10);
        assert!((config.social - 0.8).abs() < 1e-10);
        assert!((config.crossover_rate - 0.5).abs() < 1e-10);
        assert_eq!(config.max_iterations, 2_000);
        assert_eq!(config.archive_capacity, 30);
        assert_eq!(config.mutation_mode, MutationMode::PerParticle);
        assert_eq!(config.truncation, Truncation::Random);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SwarmConfig::default()
            .with_swarm_size(12)
            .with_inertia(0.2)
            .with_cognitive(0.3)
            .with_social(0.4)
            .with_crossover_rate(0.6)
            .with_max_iterations(100)
            .with_archive_capacity(10)
            .with_mutation_mode(MutationMode::Uniform)
            .with_truncation(Truncation::Crowding)
            .with_attribute_operand_rate(0.0)
            .with_parallel(true)
            .with_seed(9);

        assert_eq!(config.swarm_size, 12);
        assert!((config.inertia - 0.2).abs() < 1e-10);
        assert!((config.cognitive - 0.3).abs() < 1e-10);
        assert!((config.social - 0.4).abs() < 1e-10);
        assert!((config.crossover_rate - 0.6).abs() < 1e-10);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.archive_capacity, 10);
        assert_eq!(config.mutation_mode, MutationMode::Uniform);
        assert_eq!(config.truncation, Truncation::Crowding);
        assert!(config.parallel);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_clamp_rates() {
        let config = SwarmConfig::default()
            .with_inertia(1.5)
            .with_cognitive(-0.5)
            .with_crossover_rate(2.0);
        assert!((config.inertia - 1.0).abs() < 1e-10);
        assert!((config.cognitive - 0.0).abs() < 1e-10);
        assert!((config.crossover_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_ok() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_swarm() {
        assert!(SwarmConfig::default().with_swarm_size(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_budget() {
        assert!(SwarmConfig::default().with_max_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_small_archive() {
        assert!(SwarmConfig::default().with_archive_capacity(1).validate().is_err());
    }

    #[test]
    fn test_validate_direct_field_probability() {
        let mut config = SwarmConfig::default();
        config.social = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "social", .. })
        ));
        config.social = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_for_classes() {
        let config = SwarmConfig::default().with_swarm_size(2);
        assert!(config.validate_for(2).is_ok());
        assert_eq!(
            config.validate_for(3),
            Err(ConfigError::SwarmTooSmall {
                swarm_size: 2,
                classes: 3
            })
        );
    }

    #[test]
    fn test_scheme_for() {
        let mode = MutationMode::PerParticle;
        assert_eq!(mode.scheme_for(0), Some(ValueScheme::Gaussian));
        assert_eq!(mode.scheme_for(4), Some(ValueScheme::Uniform));
        assert_eq!(mode.scheme_for(5), None);
        assert_eq!(MutationMode::Gaussian.scheme_for(5), Some(ValueScheme::Gaussian));
        assert_eq!(MutationMode::Uniform.scheme_for(3), Some(ValueScheme::Uniform));
    }
}
