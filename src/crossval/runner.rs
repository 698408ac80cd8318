//! Repeated stratified cross-validation driver.

use super::config::{CrossValidationConfig, ExperimentConfig};
use super::kfold::stratified_folds;
use crate::dataset::{Dataset, RecordStore};
use crate::error::MiningResult;
use crate::pareto::objective_value;
use crate::pso::{FoldReport, NichedSwarm, SwarmConfig};
use crate::random::create_rng;
use tracing::info;

/// Folds of one repetition.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub run: usize,
    pub folds: Vec<FoldReport>,
}

/// Validation score of one niche averaged over every fold of every run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NicheAverage {
    pub niche: usize,
    pub label: String,
    /// Mean validation effectiveness of the niche's winners.
    pub effectiveness: f64,
    /// Mean validation accuracy of the niche's winners.
    pub accuracy: f64,
    /// Folds that produced a winner.
    pub winners: usize,
}

/// Outcome of a cross-validation experiment.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CvReport {
    pub runs: Vec<RunReport>,
    pub niches: Vec<NicheAverage>,
    /// Mean of the per-niche effectiveness means.
    pub effectiveness: f64,
    /// Mean of the per-niche accuracy means.
    pub accuracy: f64,
}

impl CvReport {
    /// All folds, run after run.
    pub fn folds(&self) -> impl Iterator<Item = &FoldReport> {
        self.runs.iter().flat_map(|r| r.folds.iter())
    }
}

/// Runs the niched swarm over every fold of repeated stratified k-fold
/// cross-validation.
///
/// # Usage
///
/// ```
/// use u_nichepso::crossval::{CrossValidation, CrossValidationConfig};
/// use u_nichepso::dataset::{AttributeKind, MemoryStore};
/// use u_nichepso::pso::SwarmConfig;
///
/// let mut store = MemoryStore::new(vec![("x", AttributeKind::Numeric)]);
/// for i in 0..12u64 {
///     let label = if i < 6 { "low" } else { "high" };
///     store.insert(i, label, vec![i as f64]).unwrap();
/// }
///
/// let swarm = SwarmConfig::default().with_swarm_size(6).with_max_iterations(40);
/// let cv = CrossValidationConfig::default().with_folds(3).with_seed(7);
/// let report = CrossValidation::run(&store, &swarm, &cv).unwrap();
/// assert_eq!(report.folds().count(), 3);
/// assert_eq!(report.niches.len(), 2);
/// ```
pub struct CrossValidation;

impl CrossValidation {
    /// Runs `cv.runs` repetitions of `cv.folds`-fold cross-validation.
    ///
    /// Folds run strictly in sequence from one random source seeded with
    /// `cv.seed`, else `swarm.seed`.
    ///
    /// # Errors
    /// Configuration errors before anything runs; degenerate datasets;
    /// the first store failure of any fold.
    pub fn run<S: RecordStore + ?Sized>(
        store: &S,
        swarm: &SwarmConfig,
        cv: &CrossValidationConfig,
    ) -> MiningResult<CvReport> {
        cv.validate()?;
        let dataset = Dataset::load(store)?;
        swarm.validate_for(dataset.num_classes())?;

        info!(
            records = dataset.num_records(),
            classes = dataset.num_classes(),
            attributes = dataset.schema.len(),
            folds = cv.folds,
            runs = cv.runs,
            "cross-validation started"
        );

        let mut rng = create_rng(cv.seed.or(swarm.seed));
        let mut runs = Vec::with_capacity(cv.runs);
        for run in 0..cv.runs {
            let assignment = stratified_folds(&dataset.class_members, cv.folds, &mut rng);
            let mut folds = Vec::with_capacity(assignment.len());
            for (index, held_out) in assignment.iter().enumerate() {
                info!(run, fold = index, held_out = held_out.len(), "fold assigned");
                let report =
                    NichedSwarm::new(store, &dataset, swarm, index, held_out, &mut rng)?
                        .run(&mut rng)?;
                folds.push(report);
            }
            runs.push(RunReport { run, folds });
        }

        let report = aggregate(&dataset, runs);
        info!(
            effectiveness = report.effectiveness,
            accuracy = report.accuracy,
            "cross-validation finished"
        );
        Ok(report)
    }

    /// [`run`](Self::run) with the parameters of a parsed experiment.
    pub fn run_experiment<S: RecordStore + ?Sized>(
        store: &S,
        config: &ExperimentConfig,
    ) -> MiningResult<CvReport> {
        Self::run(store, &config.swarm, &config.cross_validation)
    }
}

/// Averages validation winners per niche, then across niches that had
/// any. NaN objectives count as zero.
fn aggregate(dataset: &Dataset, runs: Vec<RunReport>) -> CvReport {
    let mut sums = vec![(0.0, 0.0, 0usize); dataset.num_classes()];
    for fold in runs.iter().flat_map(|r| r.folds.iter()) {
        for (niche, winner) in fold.winners() {
            let entry = &mut sums[niche];
            entry.0 += objective_value(winner.validation.effectiveness);
            entry.1 += objective_value(winner.validation.accuracy);
            entry.2 += 1;
        }
    }

    let niches: Vec<NicheAverage> = sums
        .into_iter()
        .enumerate()
        .map(|(niche, (eff, acc, n))| {
            let (effectiveness, accuracy) = if n > 0 {
                (eff / n as f64, acc / n as f64)
            } else {
                (0.0, 0.0)
            };
            NicheAverage {
                niche,
                label: dataset.labels[niche].clone(),
                effectiveness,
                accuracy,
                winners: n,
            }
        })
        .collect();

    let scored: Vec<&NicheAverage> = niches.iter().filter(|n| n.winners > 0).collect();
    let (effectiveness, accuracy) = if scored.is_empty() {
        (0.0, 0.0)
    } else {
        let count = scored.len() as f64;
        (
            scored.iter().map(|n| n.effectiveness).sum::<f64>() / count,
            scored.iter().map(|n| n.accuracy).sum::<f64>() / count,
        )
    };

    CvReport {
        runs,
        niches,
        effectiveness,
        accuracy,
    }
}
