//! Swarm member.

use crate::dataset::{RecordStore, Split};
use crate::error::MiningResult;
use crate::fitness::FitnessEvaluator;
use crate::pareto::{Archive, Insertion, Truncation};
use crate::rule::{Condition, Rule};
use rand::Rng;
use std::collections::BTreeSet;

/// A rule flying through rule space, with its own personal-best front.
///
/// The particle owns its personal-best archive outright; the niche archive
/// lives in the swarm and is only ever read through clones.
#[derive(Debug, Clone)]
pub struct Particle {
    index: usize,
    position: Rule,
    personal_best: Archive,
}

impl Particle {
    /// Creates a particle at an already evaluated `position`.
    pub fn new(index: usize, position: Rule, archive_capacity: usize) -> Self {
        Self {
            index,
            position,
            personal_best: Archive::new(archive_capacity),
        }
    }

    /// Position in swarm order; keys the turbulence scheme.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn niche(&self) -> usize {
        self.position.niche()
    }

    pub fn position(&self) -> &Rule {
        &self.position
    }

    pub fn personal_best(&self) -> &Archive {
        &self.personal_best
    }

    /// Offers the current position to the personal-best archive.
    pub fn remember<R: Rng>(&mut self, truncation: Truncation, rng: &mut R) -> Insertion {
        self.personal_best.insert(&self.position, truncation, rng)
    }

    /// Replaces the position with `conditions`, scored on the training
    /// split. Advances the evaluator's counter by exactly one.
    pub fn move_to<S: RecordStore + ?Sized>(
        &mut self,
        conditions: BTreeSet<Condition>,
        evaluator: &FitnessEvaluator<'_, S>,
    ) -> MiningResult<()> {
        let rule = Rule::new(self.niche(), conditions)?;
        let objectives = evaluator.evaluate(&rule, Split::Training)?;
        self.position = rule.with_objectives(objectives);
        Ok(())
    }
}
