//! Objective vectors and the confusion matrix they are derived from.

/// Confusion-matrix counts of one rule against one class niche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl ConfusionMatrix {
    /// `tp / (tp + fn)`. NaN when the niche has no members in scope.
    pub fn sensitivity(&self) -> f64 {
        let tp = self.true_positives as f64;
        tp / (tp + self.false_negatives as f64)
    }

    /// `tn / (tn + fp)`. NaN when every record in scope is positive.
    pub fn specificity(&self) -> f64 {
        let tn = self.true_negatives as f64;
        tn / (tn + self.false_positives as f64)
    }

    /// `sensitivity × specificity`.
    pub fn effectiveness(&self) -> f64 {
        self.sensitivity() * self.specificity()
    }

    /// `(tp + tn) / total`. NaN on an empty scope.
    pub fn accuracy(&self) -> f64 {
        let correct = (self.true_positives + self.true_negatives) as f64;
        correct / self.total() as f64
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }
}

/// The three competing objectives of a rule, all maximized.
///
/// Values are stored as computed; a zero denominator leaves a NaN in place.
/// Comparisons read NaN as the worst value through
/// [`pareto::objective_value`](crate::pareto::objective_value).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objectives {
    /// `1 / |conditions|`.
    pub complexity: f64,
    /// Sensitivity × specificity.
    pub effectiveness: f64,
    /// Fraction of correctly classified records.
    pub accuracy: f64,
}

impl Objectives {
    pub fn new(complexity: f64, effectiveness: f64, accuracy: f64) -> Self {
        Self {
            complexity,
            effectiveness,
            accuracy,
        }
    }

    /// Placeholder carried by a rule before its first evaluation.
    pub fn unevaluated() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    /// Builds the objective vector from a rule size and its confusion counts.
    pub fn from_confusion(num_conditions: usize, matrix: &ConfusionMatrix) -> Self {
        Self::new(
            1.0 / num_conditions as f64,
            matrix.effectiveness(),
            matrix.accuracy(),
        )
    }

    /// Complexity is never NaN once a rule has been evaluated.
    pub fn is_evaluated(&self) -> bool {
        !self.complexity.is_nan()
    }

    /// `[complexity, effectiveness, accuracy]`.
    pub fn to_array(&self) -> [f64; 3] {
        [self.complexity, self.effectiveness, self.accuracy]
    }

    /// The pair `(effectiveness, accuracy)` that dominance is decided on.
    pub fn front_point(&self) -> [f64; 2] {
        [self.effectiveness, self.accuracy]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confusion_ratios() {
        let m = ConfusionMatrix {
            true_positives: 8,
            false_positives: 2,
            false_negatives: 2,
            true_negatives: 18,
        };
        assert!((m.sensitivity() - 0.8).abs() < 1e-12);
        assert!((m.specificity() - 0.9).abs() < 1e-12);
        assert!((m.effectiveness() - 0.72).abs() < 1e-12);
        assert!((m.accuracy() - 26.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_denominators_propagate_nan() {
        let m = ConfusionMatrix {
            true_positives: 0,
            false_positives: 3,
            false_negatives: 0,
            true_negatives: 0,
        };
        assert!(m.sensitivity().is_nan());
        assert!(m.effectiveness().is_nan());
        assert_eq!(m.accuracy(), 0.0);

        let empty = ConfusionMatrix::default();
        assert!(empty.accuracy().is_nan());
    }

    #[test]
    fn test_from_confusion() {
        let m = ConfusionMatrix {
            true_positives: 5,
            false_positives: 0,
            false_negatives: 0,
            true_negatives: 5,
        };
        let o = Objectives::from_confusion(4, &m);
        assert_eq!(o.to_array(), [0.25, 1.0, 1.0]);
        assert!(o.is_evaluated());
        assert!(!Objectives::unevaluated().is_evaluated());
    }
}
