//! The rule (particle position) type.

use super::condition::Condition;
use crate::error::RuleError;
use crate::fitness::Objectives;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Conjunction separator in rendered rules.
pub const CONJUNCTION: &str = " AND ";

/// A candidate classification rule for one class niche.
///
/// Conditions are held in a `BTreeSet`, so duplicate conditions collapse
/// and iteration (and therefore [`Display`](fmt::Display)) is always in
/// canonical order. Two rules are equal when they target the same niche
/// with the same condition set; cached objectives do not take part.
///
/// A rule is never edited in place: operators build a new condition set
/// and the owner swaps it in with a fresh evaluation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    niche: usize,
    conditions: BTreeSet<Condition>,
    objectives: Objectives,
}

impl Rule {
    /// Creates an unevaluated rule.
    ///
    /// # Errors
    /// [`RuleError::Empty`] if no conditions are given.
    pub fn new(
        niche: usize,
        conditions: impl IntoIterator<Item = Condition>,
    ) -> Result<Self, RuleError> {
        let conditions: BTreeSet<Condition> = conditions.into_iter().collect();
        if conditions.is_empty() {
            return Err(RuleError::Empty);
        }
        Ok(Self {
            niche,
            conditions,
            objectives: Objectives::unevaluated(),
        })
    }

    /// Parses the canonical text form `(a op x) AND (b op y) ...`.
    pub fn parse(niche: usize, text: &str) -> Result<Self, RuleError> {
        let conditions = text
            .split(CONJUNCTION)
            .map(Condition::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(niche, conditions)
    }

    /// Index of the class niche this rule belongs to.
    pub fn niche(&self) -> usize {
        self.niche
    }

    pub fn conditions(&self) -> &BTreeSet<Condition> {
        &self.conditions
    }

    pub fn num_conditions(&self) -> usize {
        self.conditions.len()
    }

    /// Structural simplicity, `1 / |conditions|`.
    pub fn complexity(&self) -> f64 {
        1.0 / self.conditions.len() as f64
    }

    /// Cached objectives from the most recent evaluation.
    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }

    /// Returns the rule with the given objectives attached.
    pub fn with_objectives(mut self, objectives: Objectives) -> Self {
        self.objectives = objectives;
        self
    }

    /// Whether both rules hold exactly the same conditions.
    pub fn same_conditions(&self, other: &Rule) -> bool {
        self.conditions == other.conditions
    }

    /// Predicate text understood by the record store.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.niche == other.niche && self.conditions == other.conditions
    }
}

impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.niche.hash(state);
        self.conditions.hash(state);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(CONJUNCTION)?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}
