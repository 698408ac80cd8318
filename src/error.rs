//! Error types for u-nichepso.
//!
//! Configuration errors are fatal before any optimization starts; record
//! store errors abort the run at the call site. Numeric degeneracy (0/0
//! ratios in the objectives) is not an error and never appears here.

use thiserror::Error;

/// Invalid or missing configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A required key was absent from the property set.
    #[error("missing configuration key: {0}")]
    Missing(String),

    /// A key was present but its value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },

    /// A parameter parsed but lies outside its admissible range.
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    /// Fewer particles than class niches.
    #[error("swarm size {swarm_size} is smaller than the number of classes ({classes})")]
    SwarmTooSmall { swarm_size: usize, classes: usize },
}

/// Malformed rule construction or rule text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    /// A rule must hold at least one condition.
    #[error("a rule must contain at least one condition")]
    Empty,

    /// Rule text did not match `(attr op rhs) AND ...`.
    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },
}

/// Failure reported by a [`RecordStore`](crate::dataset::RecordStore).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// The predicate query itself failed (lost connection, bad statement).
    #[error("record store query failed: {0}")]
    Query(String),

    /// A condition referenced an attribute the store does not know.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// A class label with no membership list.
    #[error("unknown class label: {0}")]
    UnknownClass(String),

    /// A record holds a NaN or infinite attribute value.
    #[error("record {record} has a non-finite value for {attribute}")]
    NonFinite { record: u64, attribute: String },
}

/// Top-level error for swarm and cross-validation runs.
#[derive(Debug, Error)]
pub enum MiningError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rule error
    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    /// Record store error
    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    /// The store exposes no records.
    #[error("dataset contains no records")]
    EmptyDataset,

    /// The store exposes no class labels, or no usable attributes.
    #[error("dataset has no class labels or no attributes")]
    NoClasses,
}

/// Result alias used across the crate.
pub type MiningResult<T> = Result<T, MiningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts() {
        let err: MiningError = StoreError::Query("connection reset".into()).into();
        assert!(matches!(err, MiningError::Store(_)));
        assert_eq!(
            err.to_string(),
            "record store error: record store query failed: connection reset"
        );
    }

    #[test]
    fn test_swarm_too_small_message() {
        let err = ConfigError::SwarmTooSmall {
            swarm_size: 2,
            classes: 3,
        };
        assert_eq!(
            err.to_string(),
            "swarm size 2 is smaller than the number of classes (3)"
        );
    }
}
