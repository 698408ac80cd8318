//! Niched swarm execution loop.
//!
//! [`NichedSwarm`] runs one cross-validation fold through
//! `INIT → ITERATING → VALIDATING → DONE`:
//!
//! 1. **Init**: split the swarm across class niches, draw and score the
//!    initial rules, seed each niche archive
//! 2. **Iterating**: per particle, archive → turbulence → personal best →
//!    cognitive and social recombination, until the fold's evaluation
//!    budget is spent
//! 3. **Validating**: score every archived rule on the held-out fold and
//!    keep the most effective one per niche

use super::config::SwarmConfig;
use super::operators::{self, TurbulenceKind};
use super::particle::Particle;
use crate::dataset::{Dataset, RecordId, RecordStore, Split};
use crate::error::{MiningResult, StoreError};
use crate::fitness::{FitnessEvaluator, Objectives};
use crate::pareto::{objective_value, Archive};
use crate::rule::Rule;
use rand::Rng;
use tracing::{debug, info, warn};

/// Lifecycle stage of a fold's swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Initial population drawn and archives seeded.
    Init,
    /// Generations are being run against the training split.
    Iterating,
    /// Archives are being scored on the held-out fold. Only held inside
    /// [`NichedSwarm::finish`], so never seen from outside.
    Validating,
    /// [`NichedSwarm::finish`] has produced the fold report.
    Done,
}

/// An archived rule together with its held-out fold score.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidatedRule {
    /// The rule, carrying its training objectives.
    pub rule: Rule,
    /// Objectives on the validation split.
    pub validation: Objectives,
}

impl ValidatedRule {
    /// Predicate text of the rule, usable by the record store.
    pub fn text(&self) -> String {
        self.rule.render()
    }
}

/// Outcome of one niche on one fold.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NicheReport {
    pub niche: usize,
    /// Class label the niche mines rules for.
    pub label: String,
    /// Training front, most isolated rules first.
    pub archive: Vec<Rule>,
    /// Archived rule with the best validation effectiveness, if any.
    pub winner: Option<ValidatedRule>,
}

/// Outcome of one fold.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoldReport {
    pub fold: usize,
    /// Generations completed.
    pub generations: usize,
    /// Positions assigned, initial ones included.
    pub placements: usize,
    /// Evaluations spent on the training split.
    pub training_evaluations: usize,
    /// All evaluations, validation included.
    pub evaluations: usize,
    /// One entry per niche, in label order.
    pub niches: Vec<NicheReport>,
}

impl FoldReport {
    /// Validation winners of the niches that have one.
    pub fn winners(&self) -> impl Iterator<Item = (usize, &ValidatedRule)> {
        self.niches
            .iter()
            .filter_map(|n| n.winner.as_ref().map(|w| (n.niche, w)))
    }
}

/// Particles per niche: `swarm_size / classes` each, the remainder going
/// one apiece to the earliest niches.
pub fn niche_sizes(swarm_size: usize, classes: usize) -> Vec<usize> {
    if classes == 0 {
        return Vec::new();
    }
    let base = swarm_size / classes;
    let remainder = swarm_size % classes;
    (0..classes)
        .map(|niche| base + usize::from(niche < remainder))
        .collect()
}

/// The swarm of one fold.
///
/// Each niche owns one archive; particles own their personal-best archive
/// and are addressed by index. The fold's [`FitnessEvaluator`] carries the
/// single evaluation counter that all niches draw from.
///
/// # Usage
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_nichepso::dataset::{AttributeKind, Dataset, MemoryStore};
/// use u_nichepso::pso::{NichedSwarm, SwarmConfig};
///
/// let mut store = MemoryStore::new(vec![("x", AttributeKind::Numeric)]);
/// for i in 0..10u64 {
///     let label = if i < 5 { "low" } else { "high" };
///     store.insert(i, label, vec![i as f64]).unwrap();
/// }
/// let dataset = Dataset::load(&store).unwrap();
/// let config = SwarmConfig::default().with_swarm_size(6).with_max_iterations(60);
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let swarm = NichedSwarm::new(&store, &dataset, &config, 0, &[0, 5], &mut rng).unwrap();
/// let report = swarm.run(&mut rng).unwrap();
/// assert_eq!(report.niches.len(), 2);
/// assert!(report.training_evaluations >= 60);
/// ```
pub struct NichedSwarm<'a, S: RecordStore + ?Sized> {
    config: &'a SwarmConfig,
    dataset: &'a Dataset,
    evaluator: FitnessEvaluator<'a, S>,
    particles: Vec<Particle>,
    archives: Vec<Archive>,
    phase: Phase,
    generations: usize,
    placements: usize,
}

impl<'a, S: RecordStore + ?Sized> NichedSwarm<'a, S> {
    /// Builds the initial swarm for fold `fold_index`, whose held-out
    /// record ids are `fold`.
    ///
    /// # Errors
    /// Invalid configuration (checked before anything is drawn) and store
    /// failures while scoring the initial population.
    pub fn new<R: Rng>(
        store: &'a S,
        dataset: &'a Dataset,
        config: &'a SwarmConfig,
        fold_index: usize,
        fold: &[RecordId],
        rng: &mut R,
    ) -> MiningResult<Self> {
        config.validate_for(dataset.num_classes())?;

        let evaluator = FitnessEvaluator::new(store, &dataset.class_members, fold_index, fold);
        let schema = &dataset.schema;

        let mut particles = Vec::with_capacity(config.swarm_size);
        for (niche, size) in niche_sizes(config.swarm_size, dataset.num_classes())
            .into_iter()
            .enumerate()
        {
            for _ in 0..size {
                let count = operators::initial_condition_count(schema.len(), rng);
                let conditions =
                    operators::random_conditions(schema, count, config.attribute_operand_rate, rng);
                let rule = Rule::new(niche, conditions)?;
                let objectives = evaluator.evaluate(&rule, Split::Training)?;
                particles.push(Particle::new(
                    particles.len(),
                    rule.with_objectives(objectives),
                    config.archive_capacity,
                ));
            }
        }

        let mut archives: Vec<Archive> = (0..dataset.num_classes())
            .map(|_| Archive::new(config.archive_capacity))
            .collect();
        for particle in &particles {
            archives[particle.niche()].insert(particle.position(), config.truncation, rng);
        }

        let placements = particles.len();
        Ok(Self {
            config,
            dataset,
            evaluator,
            particles,
            archives,
            phase: Phase::Init,
            generations: 0,
            placements,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Archive of niche `niche`.
    pub fn archive(&self, niche: usize) -> Option<&Archive> {
        self.archives.get(niche)
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Positions assigned so far, initial ones included. Equals the
    /// evaluation count until validation starts.
    pub fn placements(&self) -> usize {
        self.placements
    }

    pub fn evaluations(&self) -> usize {
        self.evaluator.evaluations()
    }

    /// Runs one generation over every particle in swarm order.
    ///
    /// Returns the number of positions replaced.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> MiningResult<usize> {
        self.phase = Phase::Iterating;
        let config = self.config;
        let schema = &self.dataset.schema;
        let evaluator = &self.evaluator;
        let before = self.placements;

        for particle in &mut self.particles {
            let niche = particle.niche();
            self.archives[niche].insert(particle.position(), config.truncation, rng);

            if let Some(scheme) = config.mutation_mode.scheme_for(particle.index()) {
                if rng.random_bool(config.inertia) {
                    let (next, kind) = operators::turbulence(
                        particle.position().conditions(),
                        schema,
                        scheme,
                        config.attribute_operand_rate,
                        rng,
                    );
                    if kind == TurbulenceKind::Unchanged {
                        warn!(
                            particle = particle.index(),
                            niche, "turbulence produced no distinct condition"
                        );
                    } else {
                        particle.move_to(next, evaluator)?;
                        self.placements += 1;
                    }
                }
            }

            particle.remember(config.truncation, rng);

            if rng.random_bool(config.cognitive) {
                let next = partner(particle.personal_best(), particle.position())
                    .map(|best| {
                        operators::recombine(
                            particle.position().conditions(),
                            best.conditions(),
                            config.crossover_rate,
                            rng,
                        )
                    });
                if let Some(next) = next {
                    particle.move_to(next, evaluator)?;
                    self.placements += 1;
                }
            }

            if rng.random_bool(config.social) {
                let next = partner(&self.archives[niche], particle.position())
                    .map(|best| {
                        operators::recombine(
                            particle.position().conditions(),
                            best.conditions(),
                            config.crossover_rate,
                            rng,
                        )
                    });
                if let Some(next) = next {
                    particle.move_to(next, evaluator)?;
                    self.placements += 1;
                }
            }
        }

        self.generations += 1;
        debug!(
            fold = self.evaluator.fold_index(),
            generation = self.generations,
            evaluations = self.evaluator.evaluations(),
            archive_sizes = ?self.archives.iter().map(Archive::len).collect::<Vec<_>>(),
            "generation complete"
        );
        Ok(self.placements - before)
    }

    /// Runs generations until the fold's training budget is spent.
    ///
    /// The budget is checked between generations, so the last generation
    /// always completes and the training count may overshoot
    /// `max_iterations` by up to one generation's worth. A generation that
    /// moves no particle ends training early.
    ///
    /// # Errors
    /// Store failures abort training.
    pub fn train<R: Rng>(&mut self, rng: &mut R) -> MiningResult<()> {
        let fold = self.evaluator.fold_index();
        info!(
            fold,
            particles = self.particles.len(),
            niches = self.archives.len(),
            "fold started"
        );

        while self.evaluator.evaluations() < self.config.max_iterations {
            if self.step(rng)? == 0 {
                warn!(
                    fold,
                    generation = self.generations,
                    "generation moved no particle, stopping early"
                );
                break;
            }
        }
        Ok(())
    }

    /// Scores every niche archive on the held-out fold and reports the
    /// fold. Leaves the swarm in [`Phase::Done`].
    ///
    /// Calling it again re-scores the archives and spends the validation
    /// evaluations a second time.
    ///
    /// # Errors
    /// Store failures during validation.
    pub fn finish(&mut self) -> MiningResult<FoldReport> {
        let fold = self.evaluator.fold_index();
        let training_evaluations = self.placements;

        self.phase = Phase::Validating;
        let winners = validate_niches(&self.evaluator, &self.archives, self.config.parallel)?;

        let niches: Vec<NicheReport> = winners
            .into_iter()
            .enumerate()
            .map(|(niche, winner)| {
                if winner.is_none() {
                    warn!(fold, niche, "niche has no validation winner");
                }
                NicheReport {
                    niche,
                    label: self.dataset.labels[niche].clone(),
                    archive: self.archives[niche]
                        .ranked_by_crowding()
                        .into_iter()
                        .cloned()
                        .collect(),
                    winner,
                }
            })
            .collect();

        self.phase = Phase::Done;
        let report = FoldReport {
            fold,
            generations: self.generations,
            placements: self.placements,
            training_evaluations,
            evaluations: self.evaluator.evaluations(),
            niches,
        };
        info!(
            fold,
            generations = report.generations,
            evaluations = report.evaluations,
            winners = report.winners().count(),
            "fold finished"
        );
        Ok(report)
    }

    /// Runs the fold to completion: [`train`](Self::train), then
    /// [`finish`](Self::finish).
    ///
    /// # Errors
    /// Store failures during training or validation abort the fold.
    pub fn run<R: Rng>(mut self, rng: &mut R) -> MiningResult<FoldReport> {
        self.train(rng)?;
        self.finish()
    }
}

/// Recombination partner of `position`: the nearest archived rule holding
/// other conditions. Recombining with the position itself changes nothing.
fn partner<'r>(archive: &'r Archive, position: &Rule) -> Option<&'r Rule> {
    archive.nearest_excluding(position)
}

/// Archived rule with the highest validation effectiveness; the first one
/// found wins ties. `None` for an empty archive.
fn best_on_validation<S: RecordStore + ?Sized>(
    evaluator: &FitnessEvaluator<'_, S>,
    archive: &Archive,
) -> Result<Option<ValidatedRule>, StoreError> {
    let mut best: Option<ValidatedRule> = None;
    for rule in archive.iter() {
        let validation = evaluator.evaluate(rule, Split::Validation)?;
        let better = match &best {
            None => true,
            Some(current) => {
                objective_value(validation.effectiveness)
                    > objective_value(current.validation.effectiveness)
            }
        };
        if better {
            best = Some(ValidatedRule {
                rule: rule.clone(),
                validation,
            });
        }
    }
    Ok(best)
}

#[cfg(feature = "parallel")]
fn validate_niches<S: RecordStore + ?Sized>(
    evaluator: &FitnessEvaluator<'_, S>,
    archives: &[Archive],
    parallel: bool,
) -> Result<Vec<Option<ValidatedRule>>, StoreError> {
    use rayon::prelude::*;

    if parallel {
        archives
            .par_iter()
            .map(|archive| best_on_validation(evaluator, archive))
            .collect()
    } else {
        archives
            .iter()
            .map(|archive| best_on_validation(evaluator, archive))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn validate_niches<S: RecordStore + ?Sized>(
    evaluator: &FitnessEvaluator<'_, S>,
    archives: &[Archive],
    parallel: bool,
) -> Result<Vec<Option<ValidatedRule>>, StoreError> {
    if parallel {
        debug!("parallel validation requested without the `parallel` feature");
    }
    archives
        .iter()
        .map(|archive| best_on_validation(evaluator, archive))
        .collect()
}
