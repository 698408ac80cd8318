//! Dominance and the orderings built on it.
//!
//! Both front objectives, effectiveness and accuracy, are **maximized**.
//! Complexity takes no part in dominance.
//!
//! # NaN policy
//!
//! A zero denominator leaves NaN in an objective. Every comparison here
//! reads NaN as `0.0`, the worst attainable value of both objectives, via
//! [`objective_value`]. That keeps dominance irreflexive and antisymmetric
//! and the total order total, without touching the stored values.

use crate::fitness::Objectives;
use std::cmp::Ordering;

/// Comparison value of one objective: NaN reads as `0.0`.
#[inline]
pub fn objective_value(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x
    }
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two `(effectiveness, accuracy)` points for Pareto dominance
/// under maximization.
pub fn dominance_cmp(a: [f64; 2], b: [f64; 2]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        let (va, vb) = (objective_value(va), objective_value(vb));
        if va > vb {
            a_better_in_some = true;
        } else if vb > va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// `a` is at least as good as `b` everywhere and strictly better somewhere.
///
/// # Example
///
/// ```
/// use u_nichepso::pareto::dominates;
///
/// assert!(dominates([0.8, 0.9], [0.8, 0.7]));
/// assert!(!dominates([0.8, 0.9], [0.9, 0.7]));
/// assert!(!dominates([0.5, 0.5], [0.5, 0.5]));
/// ```
pub fn dominates(a: [f64; 2], b: [f64; 2]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// `a` beats `b` in at least one objective, so `b` cannot dominate `a`.
pub fn non_dominated(a: [f64; 2], b: [f64; 2]) -> bool {
    a.iter()
        .zip(b.iter())
        .any(|(&va, &vb)| objective_value(va) > objective_value(vb))
}

/// Total order over rules' objectives: accuracy ascending, then
/// effectiveness ascending.
///
/// Used to sort an archive before truncation and crowding.
pub fn by_total_order(a: &Objectives, b: &Objectives) -> Ordering {
    let cmp = |x: f64, y: f64| {
        objective_value(x)
            .partial_cmp(&objective_value(y))
            .unwrap_or(Ordering::Equal)
    };
    cmp(a.accuracy, b.accuracy).then_with(|| cmp(a.effectiveness, b.effectiveness))
}

/// Euclidean distance between two rules in `(effectiveness, accuracy)`.
pub fn distance(a: &Objectives, b: &Objectives) -> f64 {
    let de = objective_value(a.effectiveness) - objective_value(b.effectiveness);
    let da = objective_value(a.accuracy) - objective_value(b.accuracy);
    (de * de + da * da).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_dominance() {
        assert_eq!(dominance_cmp([0.9, 0.9], [0.5, 0.5]), Dominance::Left);
        assert_eq!(dominance_cmp([0.5, 0.5], [0.9, 0.9]), Dominance::Right);
        assert!(dominates([0.9, 0.5], [0.9, 0.4]));
    }

    #[test]
    fn test_trade_off_is_neither() {
        assert_eq!(dominance_cmp([0.9, 0.1], [0.1, 0.9]), Dominance::Neither);
        assert!(!dominates([0.9, 0.1], [0.1, 0.9]));
        assert!(!dominates([0.1, 0.9], [0.9, 0.1]));
    }

    #[test]
    fn test_irreflexive() {
        assert!(!dominates([0.3, 0.7], [0.3, 0.7]));
        assert!(!dominates([f64::NAN, 0.7], [f64::NAN, 0.7]));
    }

    #[test]
    fn test_nan_is_worst() {
        assert!(dominates([0.1, 0.5], [f64::NAN, 0.5]));
        assert!(!dominates([f64::NAN, 0.5], [0.1, 0.5]));
        // NaN ties with a genuine zero.
        assert_eq!(dominance_cmp([f64::NAN, 0.5], [0.0, 0.5]), Dominance::Neither);
    }

    #[test]
    fn test_non_dominated() {
        assert!(non_dominated([0.9, 0.1], [0.1, 0.9]));
        assert!(!non_dominated([0.5, 0.5], [0.5, 0.5]));
        assert!(!non_dominated([0.1, 0.1], [0.5, 0.5]));
    }

    #[test]
    fn test_total_order() {
        let low = Objectives::new(1.0, 0.9, 0.2);
        let high = Objectives::new(1.0, 0.1, 0.8);
        assert_eq!(by_total_order(&low, &high), Ordering::Less);

        // Accuracy tie falls back to effectiveness.
        let a = Objectives::new(1.0, 0.2, 0.5);
        let b = Objectives::new(0.5, 0.4, 0.5);
        assert_eq!(by_total_order(&a, &b), Ordering::Less);
        assert_eq!(by_total_order(&a, &a), Ordering::Equal);

        let nan = Objectives::new(1.0, f64::NAN, f64::NAN);
        assert_eq!(by_total_order(&nan, &a), Ordering::Less);
    }

    #[test]
    fn test_distance() {
        let a = Objectives::new(1.0, 0.0, 0.0);
        let b = Objectives::new(0.5, 0.3, 0.4);
        assert!((distance(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(distance(&b, &b), 0.0);
    }
}
