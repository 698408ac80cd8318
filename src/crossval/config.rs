//! Experiment configuration.
//!
//! [`ExperimentConfig::from_properties`] reads the flat key/value set an
//! experiment is described with:
//!
//! | Key | Meaning | Required |
//! |---|---|---|
//! | `table` | table the record store queries | yes |
//! | `label_column` | class label column | yes |
//! | `id_column` | record id column | yes |
//! | `swarm_size` | particles across all niches | yes |
//! | `w`, `c1`, `c2`, `cr` | inertia, cognitive, social, crossover rate | yes |
//! | `max_iterations` | evaluation budget per fold | yes |
//! | `folds` | number of cross-validation folds | yes |
//! | `runs` | independent repetitions | no |
//! | `seed` | random seed | no |
//! | `archive_capacity` | bound on every archive | no |
//! | `mutation` | `per_particle`, `gaussian` or `uniform` | no |
//! | `truncation` | `random` or `crowding` | no |
//! | `parallel` | validate niches on the rayon pool | no |

use crate::error::ConfigError;
use crate::pareto::Truncation;
use crate::pso::{MutationMode, SwarmConfig};
use std::collections::HashMap;
use std::str::FromStr;

/// Cross-validation parameters.
///
/// ```
/// use u_nichepso::crossval::CrossValidationConfig;
///
/// let config = CrossValidationConfig::default().with_folds(5).with_runs(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrossValidationConfig {
    /// Number of folds `k`.
    pub folds: usize,

    /// Independent repetitions; folds are reshuffled for each.
    pub runs: usize,

    /// Seed for fold shuffles and every swarm. `None` falls back to the
    /// swarm's seed, then to a random one.
    pub seed: Option<u64>,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            runs: 1,
            seed: None,
        }
    }
}

impl CrossValidationConfig {
    pub fn with_folds(mut self, k: usize) -> Self {
        self.folds = k;
        self
    }

    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// A single fold would leave nothing to train on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.folds < 2 {
            return Err(ConfigError::OutOfRange {
                name: "folds",
                reason: "must be at least 2".into(),
            });
        }
        if self.runs == 0 {
            return Err(ConfigError::OutOfRange {
                name: "runs",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Where a record store finds the data. Opaque to the optimizer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatasetConfig {
    pub table: String,
    pub label_column: String,
    pub id_column: String,
}

/// A complete experiment description.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    pub dataset: DatasetConfig,
    pub swarm: SwarmConfig,
    pub cross_validation: CrossValidationConfig,
}

impl ExperimentConfig {
    /// Parses and validates a flat property set.
    ///
    /// # Errors
    /// [`ConfigError::Missing`] for an absent required key,
    /// [`ConfigError::Invalid`] for an unparseable value, and whatever
    /// [`SwarmConfig::validate`] or [`CrossValidationConfig::validate`]
    /// reject.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use u_nichepso::crossval::ExperimentConfig;
    ///
    /// let props: HashMap<String, String> = [
    ///     ("table", "iris"),
    ///     ("label_column", "species"),
    ///     ("id_column", "id"),
    ///     ("swarm_size", "60"),
    ///     ("w", "0.4"),
    ///     ("c1", "0.8"),
    ///     ("c2", "0.8"),
    ///     ("cr", "0.5"),
    ///     ("max_iterations", "2000"),
    ///     ("folds", "10"),
    /// ]
    /// .into_iter()
    /// .map(|(k, v)| (k.to_string(), v.to_string()))
    /// .collect();
    ///
    /// let config = ExperimentConfig::from_properties(&props).unwrap();
    /// assert_eq!(config.dataset.table, "iris");
    /// assert_eq!(config.swarm.swarm_size, 60);
    /// assert_eq!(config.cross_validation.folds, 10);
    /// ```
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let dataset = DatasetConfig {
            table: required(props, "table")?.to_string(),
            label_column: required(props, "label_column")?.to_string(),
            id_column: required(props, "id_column")?.to_string(),
        };

        let mut swarm = SwarmConfig {
            swarm_size: parse(props, "swarm_size")?,
            inertia: parse(props, "w")?,
            cognitive: parse(props, "c1")?,
            social: parse(props, "c2")?,
            crossover_rate: parse(props, "cr")?,
            max_iterations: parse(props, "max_iterations")?,
            ..SwarmConfig::default()
        };
        if let Some(capacity) = parse_optional(props, "archive_capacity")? {
            swarm.archive_capacity = capacity;
        }
        if let Some(mode) = optional(props, "mutation") {
            swarm.mutation_mode = match mode {
                "per_particle" => MutationMode::PerParticle,
                "gaussian" => MutationMode::Gaussian,
                "uniform" => MutationMode::Uniform,
                _ => return Err(invalid("mutation", mode)),
            };
        }
        if let Some(truncation) = optional(props, "truncation") {
            swarm.truncation = match truncation {
                "random" => Truncation::Random,
                "crowding" => Truncation::Crowding,
                _ => return Err(invalid("truncation", truncation)),
            };
        }
        if let Some(parallel) = parse_optional(props, "parallel")? {
            swarm.parallel = parallel;
        }
        let seed = parse_optional(props, "seed")?;
        swarm.seed = seed;

        let cross_validation = CrossValidationConfig {
            folds: parse(props, "folds")?,
            runs: parse_optional::<usize>(props, "runs")?.unwrap_or(1),
            seed,
        };

        swarm.validate()?;
        cross_validation.validate()?;

        Ok(Self {
            dataset,
            swarm,
            cross_validation,
        })
    }
}

fn optional<'p>(props: &'p HashMap<String, String>, key: &str) -> Option<&'p str> {
    props.get(key).map(|v| v.trim())
}

fn required<'p>(props: &'p HashMap<String, String>, key: &str) -> Result<&'p str, ConfigError> {
    optional(props, key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(props: &HashMap<String, String>, key: &str) -> Result<T, ConfigError> {
    let value = required(props, key)?;
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_optional<T: FromStr>(
    props: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    optional(props, key)
        .map(|value| value.parse().map_err(|_| invalid(key, value)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(extra: &[(&str, &str)]) -> HashMap<String, String> {
        let mut props: HashMap<String, String> = [
            ("table", "t"),
            ("label_column", "class"),
            ("id_column", "id"),
            ("swarm_size", "30"),
            ("w", "0.3"),
            ("c1", "0.7"),
            ("c2", "0.6"),
            ("cr", "0.5"),
            ("max_iterations", "500"),
            ("folds", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        for (k, v) in extra {
            props.insert(k.to_string(), v.to_string());
        }
        props
    }

    // ---- CrossValidationConfig ----

    #[test]
    fn test_cv_defaults() {
        let config = CrossValidationConfig::default();
        assert_eq!(config.folds, 10);
        assert_eq!(config.runs, 1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_cv_validate() {
        assert!(CrossValidationConfig::default().with_folds(1).validate().is_err());
        assert!(CrossValidationConfig::default().with_runs(0).validate().is_err());
        assert!(CrossValidationConfig::default().with_seed(3).validate().is_ok());
    }

    // ---- from_properties ----

    #[test]
    fn test_required_keys() {
        let config = ExperimentConfig::from_properties(&props(&[])).unwrap();
        assert_eq!(config.dataset.label_column, "class");
        assert_eq!(config.dataset.id_column, "id");
        assert_eq!(config.swarm.swarm_size, 30);
        assert!((config.swarm.inertia - 0.3).abs() < 1e-10);
        assert!((config.swarm.cognitive - 0.7).abs() < 1e-10);
        assert!((config.swarm.social - 0.6).abs() < 1e-10);
        assert!((config.swarm.crossover_rate - 0.5).abs() < 1e-10);
        assert_eq!(config.swarm.max_iterations, 500);
        assert_eq!(config.cross_validation.folds, 5);
        assert_eq!(config.cross_validation.runs, 1);
        assert_eq!(config.swarm.archive_capacity, 30);
    }

    #[test]
    fn test_optional_keys() {
        let config = ExperimentConfig::from_properties(&props(&[
            ("runs", "3"),
            ("seed", "42"),
            ("archive_capacity", "12"),
            ("mutation", "uniform"),
            ("truncation", "crowding"),
            ("parallel", "true"),
        ]))
        .unwrap();
        assert_eq!(config.cross_validation.runs, 3);
        assert_eq!(config.cross_validation.seed, Some(42));
        assert_eq!(config.swarm.seed, Some(42));
        assert_eq!(config.swarm.archive_capacity, 12);
        assert_eq!(config.swarm.mutation_mode, MutationMode::Uniform);
        assert_eq!(config.swarm.truncation, Truncation::Crowding);
        assert!(config.swarm.parallel);
    }

    #[test]
    fn test_missing_key() {
        let mut p = props(&[]);
        p.remove("cr");
        assert_eq!(
            ExperimentConfig::from_properties(&p).unwrap_err(),
            ConfigError::Missing("cr".into())
        );
    }

    #[test]
    fn test_unparseable_numeric() {
        let err = ExperimentConfig::from_properties(&props(&[("swarm_size", "many")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "swarm_size".into(),
                value: "many".into()
            }
        );
    }

    #[test]
    fn test_unknown_mutation_mode() {
        let err = ExperimentConfig::from_properties(&props(&[("mutation", "cauchy")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == "mutation"));
    }

    #[test]
    fn test_out_of_range_probability() {
        let err = ExperimentConfig::from_properties(&props(&[("w", "1.5")])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "inertia", .. }));
    }

    #[test]
    fn test_values_trimmed() {
        let config = ExperimentConfig::from_properties(&props(&[("folds", " 4 ")])).unwrap();
        assert_eq!(config.cross_validation.folds, 4);
    }
}
