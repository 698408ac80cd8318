//! Rule-space operators.
//!
//! Rules are sets of conditions, so particles move by rebuilding the set
//! rather than by adding a velocity. Every operator here is pure: it reads
//! the current conditions and returns a new set for the caller to swap in.
//!
//! # Generation
//!
//! - [`random_condition`] / [`random_conditions`]: fresh conditions
//! - [`initial_condition_count`]: `ceil(log2(U[1, n))) + 1`
//!
//! # Turbulence
//!
//! - [`append_condition`]: grow the rule by one condition (diversification)
//! - [`mutate_condition`]: swap a comparator or perturb a literal in place
//! - [`turbulence`]: picks one of the two with a fair coin
//!
//! # Recombination
//!
//! - [`recombine`]: interleave the own position with a best neighbour's
//!
//! # References
//!
//! - Sierra & Coello (2005), "Improving PSO-Based Multi-objective
//!   Optimization Using Crowding, Mutation and ε-Dominance"
//! - Martínez-García & Moreno-Pérez (2008), "Jumping Frogs Optimization"

use super::config::ValueScheme;
use crate::dataset::{Attribute, AttributeKind, Schema};
use crate::rule::{Comparator, Condition, Operand};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::BTreeSet;

/// Draw probabilities of the comparators for numeric attributes.
pub const COMPARATOR_TABLE: [(Comparator, f64); 6] = [
    (Comparator::Eq, 0.10),
    (Comparator::Ne, 0.10),
    (Comparator::Gt, 0.20),
    (Comparator::Ge, 0.20),
    (Comparator::Lt, 0.20),
    (Comparator::Le, 0.20),
];

/// Attempts at drawing a condition not already in the rule.
const MAX_ATTEMPTS: usize = 16;

/// Standard deviation of the Gaussian scheme, as a fraction of the range.
const GAUSSIAN_SCALE: f64 = 0.1;

// ============================================================================
// Generation
// ============================================================================

/// Draws a comparator admissible for `kind`.
///
/// Numeric attributes use [`COMPARATOR_TABLE`] (roulette over the table);
/// categorical ones pick `=` or `<>` with equal probability.
pub fn random_comparator<R: Rng>(kind: AttributeKind, rng: &mut R) -> Comparator {
    match kind {
        AttributeKind::Categorical => {
            if rng.random_bool(0.5) {
                Comparator::Eq
            } else {
                Comparator::Ne
            }
        }
        AttributeKind::Numeric => {
            let spin = rng.random_range(0.0..1.0);
            let mut cumulative = 0.0;
            for &(comparator, weight) in &COMPARATOR_TABLE {
                cumulative += weight;
                if spin < cumulative {
                    return comparator;
                }
            }
            // Rounding left the spin past the last bucket.
            COMPARATOR_TABLE[COMPARATOR_TABLE.len() - 1].0
        }
    }
}

/// Literal used when the bounds admit no draw.
fn fallback_value(attribute: &Attribute) -> f64 {
    if attribute.min.is_finite() {
        attribute.min
    } else if attribute.max.is_finite() {
        attribute.max
    } else {
        0.0
    }
}

/// Draws a literal inside the attribute's bounds.
///
/// Categorical codes are integers in `[ceil(min), floor(max)]`. Unbounded
/// attributes yield their finite bound, or `0.0` without one.
pub fn random_value<R: Rng>(attribute: &Attribute, rng: &mut R) -> f64 {
    if !attribute.is_bounded() {
        return fallback_value(attribute);
    }
    match attribute.kind {
        AttributeKind::Categorical => {
            let lo = attribute.min.ceil() as i64;
            let hi = attribute.max.floor() as i64;
            if lo < hi {
                rng.random_range(lo..=hi) as f64
            } else {
                attribute.min
            }
        }
        AttributeKind::Numeric => {
            if attribute.range() > 0.0 {
                rng.random_range(attribute.min..=attribute.max)
            } else {
                attribute.min
            }
        }
    }
}

/// Draws a fresh condition over a uniformly chosen attribute.
///
/// With probability `attribute_operand_rate`, and if a second numeric
/// attribute exists, a numeric attribute is compared with another one
/// instead of a literal. Returns `None` for an empty schema.
pub fn random_condition<R: Rng>(
    schema: &Schema,
    attribute_operand_rate: f64,
    rng: &mut R,
) -> Option<Condition> {
    if schema.is_empty() {
        return None;
    }
    let position = rng.random_range(0..schema.len());
    let attribute = &schema.attributes()[position];

    let numeric = schema.numeric();
    if attribute.is_numeric() && numeric.len() >= 2 && rng.random_bool(attribute_operand_rate) {
        // Skip over the attribute itself.
        let pick = rng.random_range(0..numeric.len() - 1);
        let other = numeric.iter().copied().filter(|&p| p != position).nth(pick)?;
        return Some(Condition::attribute(
            attribute.name.clone(),
            random_comparator(AttributeKind::Numeric, rng),
            schema.attributes()[other].name.clone(),
        ));
    }

    Some(Condition::value(
        attribute.name.clone(),
        random_comparator(attribute.kind, rng),
        random_value(attribute, rng),
    ))
}

/// Draws up to `count` distinct conditions.
pub fn random_conditions<R: Rng>(
    schema: &Schema,
    count: usize,
    attribute_operand_rate: f64,
    rng: &mut R,
) -> BTreeSet<Condition> {
    let mut conditions = BTreeSet::new();
    for _ in 0..count * MAX_ATTEMPTS {
        if conditions.len() >= count {
            break;
        }
        match random_condition(schema, attribute_operand_rate, rng) {
            Some(c) => {
                conditions.insert(c);
            }
            None => break,
        }
    }
    conditions
}

/// Condition count of a freshly initialized rule:
/// `ceil(log2(U[1, num_attributes))) + 1`.
///
/// Small rules dominate the initial swarm; one attribute always gives one
/// condition.
pub fn initial_condition_count<R: Rng>(num_attributes: usize, rng: &mut R) -> usize {
    if num_attributes <= 1 {
        return 1;
    }
    let u: f64 = rng.random_range(1.0..num_attributes as f64);
    u.log2().ceil() as usize + 1
}

// ============================================================================
// Turbulence
// ============================================================================

/// What a turbulence step did to the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurbulenceKind {
    /// One new condition was added.
    Appended,
    /// A condition's comparator was redrawn.
    Comparator,
    /// A condition's literal was perturbed.
    Value,
    /// No distinct result could be produced; the set is returned as is.
    Unchanged,
}

/// Perturbs a literal with `scheme`, staying inside the attribute bounds.
///
/// Categorical codes are redrawn whatever the scheme. Values of unbounded
/// attributes are left as they are.
pub fn mutate_value<R: Rng>(
    value: f64,
    attribute: &Attribute,
    scheme: ValueScheme,
    rng: &mut R,
) -> f64 {
    if !attribute.is_bounded() {
        return value;
    }
    if attribute.kind == AttributeKind::Categorical {
        return random_value(attribute, rng);
    }

    match scheme {
        ValueScheme::Gaussian => {
            let sigma = GAUSSIAN_SCALE * attribute.range();
            match Normal::new(0.0, sigma) {
                Ok(normal) if sigma > 0.0 => {
                    (value + normal.sample(rng)).clamp(attribute.min, attribute.max)
                }
                _ => value,
            }
        }
        ValueScheme::Uniform => {
            let u: f64 = rng.random_range(0.0..1.0);
            if rng.random_bool(0.5) {
                value + (attribute.max - value) * u
            } else {
                value - (value - attribute.min) * u
            }
        }
    }
}

/// Returns `conditions` plus one fresh condition not already present.
///
/// `None` when no distinct condition turned up within a bounded number of
/// draws (tiny categorical domains).
pub fn append_condition<R: Rng>(
    conditions: &BTreeSet<Condition>,
    schema: &Schema,
    attribute_operand_rate: f64,
    rng: &mut R,
) -> Option<BTreeSet<Condition>> {
    for _ in 0..MAX_ATTEMPTS {
        let fresh = random_condition(schema, attribute_operand_rate, rng)?;
        if !conditions.contains(&fresh) {
            let mut next = conditions.clone();
            next.insert(fresh);
            return Some(next);
        }
    }
    None
}

/// Rewrites the condition at `index` (canonical order).
///
/// A literal operand is perturbed with `scheme` or gets a new comparator
/// (fair coin); an attribute operand always gets a new comparator. The
/// count of conditions never changes: a rewrite colliding with another
/// condition of the rule is abandoned and reported as
/// [`TurbulenceKind::Unchanged`].
pub fn mutate_condition<R: Rng>(
    conditions: &BTreeSet<Condition>,
    index: usize,
    schema: &Schema,
    scheme: ValueScheme,
    rng: &mut R,
) -> (BTreeSet<Condition>, TurbulenceKind) {
    let unchanged = || (conditions.clone(), TurbulenceKind::Unchanged);

    let Some(old) = conditions.iter().nth(index) else {
        return unchanged();
    };
    let Some(attribute) = schema.get(&old.attribute) else {
        return unchanged();
    };

    let mut new = old.clone();
    let kind = match old.operand {
        Operand::Value(v) if rng.random_bool(0.5) => {
            new.operand = Operand::Value(mutate_value(v, attribute, scheme, rng));
            TurbulenceKind::Value
        }
        _ => {
            new.comparator = match attribute.kind {
                // Only two comparators: toggling is the only real change.
                AttributeKind::Categorical if old.comparator == Comparator::Eq => Comparator::Ne,
                AttributeKind::Categorical => Comparator::Eq,
                AttributeKind::Numeric => random_comparator(AttributeKind::Numeric, rng),
            };
            TurbulenceKind::Comparator
        }
    };

    if new != *old && conditions.contains(&new) {
        return unchanged();
    }

    let mut next = conditions.clone();
    next.remove(old);
    next.insert(new);
    (next, kind)
}

/// One turbulence step on a non-empty condition set.
///
/// Picks a random condition, then with a fair coin either appends a new
/// condition or rewrites the picked one.
pub fn turbulence<R: Rng>(
    conditions: &BTreeSet<Condition>,
    schema: &Schema,
    scheme: ValueScheme,
    attribute_operand_rate: f64,
    rng: &mut R,
) -> (BTreeSet<Condition>, TurbulenceKind) {
    if conditions.is_empty() {
        return (conditions.clone(), TurbulenceKind::Unchanged);
    }
    let index = rng.random_range(0..conditions.len());
    if rng.random_bool(0.5) {
        match append_condition(conditions, schema, attribute_operand_rate, rng) {
            Some(next) => (next, TurbulenceKind::Appended),
            None => (conditions.clone(), TurbulenceKind::Unchanged),
        }
    } else {
        mutate_condition(conditions, index, schema, scheme, rng)
    }
}

// ============================================================================
// Recombination
// ============================================================================

/// Interleaves `own` with a best neighbour's conditions.
///
/// Each draw takes, with probability `crossover_rate`, the next condition
/// of `best` (cycling), otherwise the next of `own` (cycling). Drawing
/// stops once the set holds `|best|` conditions. Duplicates collapse, so
/// when `4 · (|own| + |best|)` draws are not enough the remaining slots
/// are filled from `best` in order.
///
/// An empty `best` leaves `own` unchanged.
pub fn recombine<R: Rng>(
    own: &BTreeSet<Condition>,
    best: &BTreeSet<Condition>,
    crossover_rate: f64,
    rng: &mut R,
) -> BTreeSet<Condition> {
    if best.is_empty() {
        return own.clone();
    }

    let own_seq: Vec<&Condition> = own.iter().collect();
    let best_seq: Vec<&Condition> = best.iter().collect();
    let target = best_seq.len();
    let max_draws = 4 * (own_seq.len() + best_seq.len());

    let mut child = BTreeSet::new();
    let (mut i, mut j) = (0usize, 0usize);
    let mut draws = 0;
    while child.len() < target && draws < max_draws {
        if own_seq.is_empty() || rng.random_bool(crossover_rate) {
            child.insert(best_seq[j % best_seq.len()].clone());
            j += 1;
        } else {
            child.insert(own_seq[i % own_seq.len()].clone());
            i += 1;
        }
        draws += 1;
    }

    for condition in best_seq {
        if child.len() >= target {
            break;
        }
        child.insert(condition.clone());
    }

    child
}

// ============================================================================
// Tests
// ============================================================================
