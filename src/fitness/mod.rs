//! Rule fitness.
//!
//! A rule is scored on three maximized objectives:
//!
//! - **complexity** `1 / |conditions|` (structural simplicity)
//! - **effectiveness** sensitivity × specificity
//! - **accuracy** `(tp + tn) / total`
//!
//! Effectiveness and accuracy come from the confusion matrix of the rule's
//! predicate against its niche's ground truth, on the training side
//! (outside the held-out fold) or the validation side (inside it).

mod evaluator;
mod objectives;

pub use evaluator::FitnessEvaluator;
pub use objectives::{ConfusionMatrix, Objectives};
