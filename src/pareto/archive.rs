//! Bounded archive of mutually non-dominated rules.

use super::crowding::{crowding_distances, total_order_indices};
use super::dominance::{by_total_order, distance, dominates, non_dominated};
use crate::fitness::Objectives;
use crate::rule::Rule;
use rand::Rng;
use tracing::debug;

/// Default archive capacity.
pub const DEFAULT_CAPACITY: usize = 30;

/// How an over-full archive picks the member to evict.
///
/// Both strategies sort by the total order first and never evict the first
/// or last member, so the extremes of the front survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Truncation {
    /// Uniformly random interior member.
    #[default]
    Random,
    /// Interior member with the smallest crowding distance (first on ties).
    Crowding,
}

/// Outcome of [`Archive::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A clone of the candidate joined the archive.
    Added,
    /// Some member dominates the candidate.
    Dominated,
    /// A member with the same condition set is already present.
    Duplicate,
}

/// A bounded Pareto front over `(effectiveness, accuracy)`.
///
/// # Invariants
///
/// - No member dominates another.
/// - No two members hold the same condition set.
/// - `len() <= capacity()` after every insertion.
///
/// Members are owned clones; callers refer to them by index or borrow
/// them briefly, never alias them across insertions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Archive {
    capacity: usize,
    members: Vec<Rule>,
}

impl Archive {
    /// Creates an empty archive.
    ///
    /// # Panics
    /// Panics if `capacity < 2`: truncation needs two extremes to keep.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "archive capacity must be at least 2");
        Self {
            capacity,
            members: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Rule] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.members.iter()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Offers `candidate` to the front.
    ///
    /// Members the candidate dominates are removed. A clone of the
    /// candidate is added unless a surviving member dominates it or holds
    /// the same conditions. An over-full archive is then truncated with
    /// `truncation`.
    pub fn insert<R: Rng>(
        &mut self,
        candidate: &Rule,
        truncation: Truncation,
        rng: &mut R,
    ) -> Insertion {
        if self.members.is_empty() {
            self.members.push(candidate.clone());
            return Insertion::Added;
        }

        let point = candidate.objectives().front_point();
        self.members
            .retain(|m| !dominates(point, m.objectives().front_point()));

        let mut dominated = false;
        let mut duplicate = false;
        for member in &self.members {
            let other = member.objectives().front_point();
            // Beating a member somewhere already rules out being dominated by it.
            if !non_dominated(point, other) && dominates(other, point) {
                dominated = true;
            }
            if member.same_conditions(candidate) {
                duplicate = true;
            }
        }

        if dominated {
            return Insertion::Dominated;
        }
        if duplicate {
            return Insertion::Duplicate;
        }

        self.members.push(candidate.clone());
        if self.members.len() > self.capacity {
            self.truncate(truncation, rng);
        }
        Insertion::Added
    }

    /// Evicts interior members until the capacity holds.
    fn truncate<R: Rng>(&mut self, truncation: Truncation, rng: &mut R) {
        let before = self.members.len();
        while self.members.len() > self.capacity {
            self.members
                .sort_by(|a, b| by_total_order(a.objectives(), b.objectives()));
            let last = self.members.len() - 1;
            let victim = match truncation {
                Truncation::Random => rng.random_range(1..last),
                Truncation::Crowding => {
                    let distances = crowding_distances(&self.objectives());
                    (1..last)
                        .min_by(|&a, &b| distances[a].total_cmp(&distances[b]))
                        .unwrap_or(1)
                }
            };
            self.members.remove(victim);
        }
        debug!(
            evicted = before - self.members.len(),
            size = self.members.len(),
            ?truncation,
            "archive truncated"
        );
    }

    fn objectives(&self) -> Vec<Objectives> {
        self.members.iter().map(|m| *m.objectives()).collect()
    }

    /// Index of the member closest to `target` in objective space; the
    /// first one found wins ties.
    pub fn nearest_index(&self, target: &Objectives) -> Option<usize> {
        self.members
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, m)| {
                let d = distance(target, m.objectives());
                match best {
                    Some((_, bd)) if bd <= d => best,
                    _ => Some((i, d)),
                }
            })
            .map(|(i, _)| i)
    }

    /// The member closest to `target` in objective space.
    pub fn nearest(&self, target: &Objectives) -> Option<&Rule> {
        self.nearest_index(target).map(|i| &self.members[i])
    }

    /// The member closest to `rule`'s objectives among those holding a
    /// different condition set; the first one found wins ties.
    pub fn nearest_excluding(&self, rule: &Rule) -> Option<&Rule> {
        let target = rule.objectives();
        self.members
            .iter()
            .filter(|m| !m.same_conditions(rule))
            .fold(None, |best: Option<(&Rule, f64)>, m| {
                let d = distance(target, m.objectives());
                match best {
                    Some((_, bd)) if bd <= d => best,
                    _ => Some((m, d)),
                }
            })
            .map(|(m, _)| m)
    }

    /// Members ordered by decreasing crowding distance; boundary members
    /// come first, in total order.
    pub fn ranked_by_crowding(&self) -> Vec<&Rule> {
        let objectives = self.objectives();
        let distances = crowding_distances(&objectives);
        let mut order = total_order_indices(&objectives);
        order.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]));
        order.into_iter().map(|i| &self.members[i]).collect()
    }
}
