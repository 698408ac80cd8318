//! Rule evaluation against one cross-validation fold.

use super::objectives::{ConfusionMatrix, Objectives};
use crate::dataset::{RecordId, RecordStore, Split};
use crate::error::StoreError;
use crate::rule::Rule;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Ground truth of every niche on one side of the fold.
#[derive(Debug, Clone)]
struct SplitTruth {
    /// Records of niche `i` on this side.
    positives: Vec<HashSet<RecordId>>,
    /// Number of records on this side, all classes.
    size: usize,
}

impl SplitTruth {
    fn build(class_members: &[Vec<RecordId>], fold: &HashSet<RecordId>, split: Split) -> Self {
        let positives: Vec<HashSet<RecordId>> = class_members
            .iter()
            .map(|members| {
                members
                    .iter()
                    .copied()
                    .filter(|id| split.includes(fold.contains(id)))
                    .collect()
            })
            .collect();
        let size = positives.iter().map(HashSet::len).sum();
        Self { positives, size }
    }
}

/// Converts rules into objective vectors for one fold.
///
/// Immutable for the fold's lifetime apart from the evaluation counter,
/// which every call to [`evaluate`](Self::evaluate) advances. The counter
/// is shared by all niches and is the optimizer's only stopping clock.
/// It is atomic so validation may run niches on several threads.
pub struct FitnessEvaluator<'s, S: RecordStore + ?Sized> {
    store: &'s S,
    fold_index: usize,
    fold: HashSet<RecordId>,
    training: SplitTruth,
    validation: SplitTruth,
    evaluations: AtomicUsize,
}

impl<'s, S: RecordStore + ?Sized> FitnessEvaluator<'s, S> {
    /// Prepares an evaluator for fold `fold_index`, whose held-out ids are
    /// `fold`. `class_members[i]` is the full membership of niche `i`.
    pub fn new(
        store: &'s S,
        class_members: &[Vec<RecordId>],
        fold_index: usize,
        fold: &[RecordId],
    ) -> Self {
        let fold: HashSet<RecordId> = fold.iter().copied().collect();
        let training = SplitTruth::build(class_members, &fold, Split::Training);
        let validation = SplitTruth::build(class_members, &fold, Split::Validation);
        Self {
            store,
            fold_index,
            fold,
            training,
            validation,
            evaluations: AtomicUsize::new(0),
        }
    }

    pub fn fold_index(&self) -> usize {
        self.fold_index
    }

    /// Evaluations performed so far, both splits included.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    fn truth(&self, split: Split) -> &SplitTruth {
        match split {
            Split::Training => &self.training,
            Split::Validation => &self.validation,
        }
    }

    /// Confusion counts of `rule` against its niche on `split`.
    ///
    /// True negatives are the remainder of the split, so ids the store
    /// returns from outside the split cannot drive the count negative.
    pub fn confusion(&self, rule: &Rule, split: Split) -> Result<ConfusionMatrix, StoreError> {
        let truth = self.truth(split);
        let positives = truth
            .positives
            .get(rule.niche())
            .ok_or_else(|| StoreError::UnknownClass(format!("niche #{}", rule.niche())))?;

        let returned = self.store.query(rule, &self.fold, split)?;
        let true_positives = returned.iter().filter(|id| positives.contains(id)).count();
        let false_positives = returned.len() - true_positives;
        let false_negatives = positives.len() - true_positives;
        let true_negatives = truth
            .size
            .saturating_sub(true_positives + false_positives + false_negatives);

        Ok(ConfusionMatrix {
            true_positives,
            false_positives,
            false_negatives,
            true_negatives,
        })
    }

    /// Scores `rule` as `[complexity, effectiveness, accuracy]` and
    /// advances the evaluation counter.
    ///
    /// Zero denominators yield NaN objectives; they are not errors.
    ///
    /// # Errors
    /// Propagates the store's query failure.
    pub fn evaluate(&self, rule: &Rule, split: Split) -> Result<Objectives, StoreError> {
        let matrix = self.confusion(rule, split)?;
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        Ok(Objectives::from_confusion(rule.num_conditions(), &matrix))
    }
}
