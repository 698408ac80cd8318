//! Atomic conditions: `attribute comparator operand`.

use crate::error::RuleError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Relational operator of a condition.
///
/// Declaration order is the canonical order used when sorting conditions
/// that share an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparator {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl Comparator {
    /// All six comparators in canonical order.
    pub const ALL: [Comparator; 6] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Gt,
        Comparator::Ge,
        Comparator::Lt,
        Comparator::Le,
    ];

    /// Textual form used in rendered rules.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
        }
    }

    /// Inverse of [`symbol`](Self::symbol). Accepts `!=` as an alias of `<>`.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "=" => Some(Comparator::Eq),
            "<>" | "!=" => Some(Comparator::Ne),
            ">" => Some(Comparator::Gt),
            ">=" => Some(Comparator::Ge),
            "<" => Some(Comparator::Lt),
            "<=" => Some(Comparator::Le),
            _ => None,
        }
    }

    /// Whether `lhs op rhs` holds.
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Eq => lhs == rhs,
            Comparator::Ne => lhs != rhs,
            Comparator::Gt => lhs > rhs,
            Comparator::Ge => lhs >= rhs,
            Comparator::Lt => lhs < rhs,
            Comparator::Le => lhs <= rhs,
        }
    }

    /// `=` or `<>`: the only comparators meaningful for categorical codes.
    pub fn is_equality(self) -> bool {
        matches!(self, Comparator::Eq | Comparator::Ne)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Right-hand side of a condition.
///
/// Literals compare by `f64::total_cmp`, which makes the type `Eq`/`Ord`
/// and lets conditions live in ordered sets.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operand {
    /// A numeric literal.
    Value(f64),
    /// Another attribute of the same record.
    Attribute(String),
}

impl Operand {
    /// The literal, if this operand is one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Operand::Value(v) => Some(*v),
            Operand::Attribute(_) => None,
        }
    }
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Operand {}

impl PartialOrd for Operand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Operand {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Operand::Value(a), Operand::Value(b)) => a.total_cmp(b),
            (Operand::Value(_), Operand::Attribute(_)) => Ordering::Less,
            (Operand::Attribute(_), Operand::Value(_)) => Ordering::Greater,
            (Operand::Attribute(a), Operand::Attribute(b)) => a.cmp(b),
        }
    }
}

impl Hash for Operand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Operand::Value(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Operand::Attribute(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(v) => write!(f, "{v}"),
            Operand::Attribute(name) if needs_quotes(name) => write!(f, "\"{name}\""),
            Operand::Attribute(name) => f.write_str(name),
        }
    }
}

/// Attribute names that would read back as a literal, or lose a quote.
fn needs_quotes(name: &str) -> bool {
    name.starts_with('"') || name.parse::<f64>().is_ok_and(f64::is_finite)
}

/// One atomic comparison, rendered as `(attribute op operand)`.
///
/// The derived ordering sorts by attribute name first, which is what makes
/// a rule's rendering canonical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition {
    pub attribute: String,
    pub comparator: Comparator,
    pub operand: Operand,
}

impl Condition {
    /// Condition against a numeric literal.
    pub fn value(attribute: impl Into<String>, comparator: Comparator, value: f64) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            operand: Operand::Value(value),
        }
    }

    /// Attribute-to-attribute condition.
    pub fn attribute(
        attribute: impl Into<String>,
        comparator: Comparator,
        other: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            operand: Operand::Attribute(other.into()),
        }
    }

    /// Parses `attr op rhs`, with or without surrounding parentheses.
    ///
    /// A right-hand side in double quotes is an attribute name; one that
    /// parses as a finite `f64` is a literal; anything else is an attribute
    /// name. Rendering quotes exactly the names that need it, so text
    /// round-trips.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let parse_err = |reason: &str| RuleError::Parse {
            input: text.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = text.trim();
        let inner = match trimmed.strip_prefix('(') {
            Some(rest) => rest
                .strip_suffix(')')
                .ok_or_else(|| parse_err("unbalanced parenthesis"))?,
            None => trimmed,
        };

        let mut tokens = inner.split_whitespace();
        let (Some(attribute), Some(op), Some(rhs), None) =
            (tokens.next(), tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(parse_err("expected `attribute comparator operand`"));
        };

        let comparator =
            Comparator::from_symbol(op).ok_or_else(|| parse_err("unknown comparator"))?;
        let quoted = rhs
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .filter(|_| rhs.len() >= 2);
        let operand = match (quoted, rhs.parse::<f64>()) {
            (Some(name), _) => Operand::Attribute(name.to_string()),
            (None, Ok(v)) if v.is_finite() => Operand::Value(v),
            _ => Operand::Attribute(rhs.to_string()),
        };

        Ok(Self {
            attribute: attribute.to_string(),
            comparator,
            operand,
        })
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.attribute, self.comparator, self.operand)
    }
}
