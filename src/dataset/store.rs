//! The record store contract.

use crate::error::StoreError;
use crate::rule::Rule;
use std::collections::HashSet;

/// Identifier of one record (row) in the store.
pub type RecordId = u64;

/// Declared kind of a predictive attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeKind {
    /// Real-valued; ordered comparators apply.
    Numeric,
    /// Integer-coded categories; only `=` and `<>` apply.
    Categorical,
}

/// A non-key, non-label attribute with its dataset-wide bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
    pub min: f64,
    pub max: f64,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeKind, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            min,
            max,
        }
    }

    /// `max - min`.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the bounds span a finite, non-negative range. Values can
    /// only be drawn between bounded limits.
    pub fn is_bounded(&self) -> bool {
        let range = self.range();
        range.is_finite() && range >= 0.0
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == AttributeKind::Numeric
    }
}

/// Which side of the current fold a query or evaluation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Split {
    /// Every record outside the held-out fold.
    Training,
    /// Only the records of the held-out fold.
    Validation,
}

impl Split {
    /// Whether a record belongs to this side, given membership in the fold.
    pub fn includes(self, in_fold: bool) -> bool {
        match self {
            Split::Training => !in_fold,
            Split::Validation => in_fold,
        }
    }
}

/// Executes rule predicates against a labelled table.
///
/// Implementations wrap whatever actually holds the data (a SQL table, a
/// columnar file, memory). Calls are blocking; a failed query is reported
/// as [`StoreError`] and aborts the run without retry.
///
/// `Send + Sync` so that niches can be validated on a thread pool.
pub trait RecordStore: Send + Sync {
    /// Predictive attributes (excluding the id and label columns).
    fn attributes(&self) -> Result<Vec<Attribute>, StoreError>;

    /// Distinct class labels. Their order fixes the niche indices.
    fn class_labels(&self) -> Result<Vec<String>, StoreError>;

    /// Every record id carrying `label`.
    fn class_members(&self, label: &str) -> Result<Vec<RecordId>, StoreError>;

    /// Ids of the records satisfying every condition of `rule`, restricted
    /// to the complement of `fold` ([`Split::Training`]) or to `fold`
    /// itself ([`Split::Validation`]).
    fn query(
        &self,
        rule: &Rule,
        fold: &HashSet<RecordId>,
        split: Split,
    ) -> Result<HashSet<RecordId>, StoreError>;
}
