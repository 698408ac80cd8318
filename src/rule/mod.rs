//! Classification rules.
//!
//! A [`Rule`] is a conjunction of [`Condition`]s targeting one class niche.
//! It doubles as a particle position in the swarm: operators never edit a
//! rule in place but build a new condition set and swap it in.
//!
//! # Text form
//!
//! Each condition renders as `(attribute op rhs)` and conditions are joined
//! with ` AND ` in canonical (sorted) order, so semantically identical rules
//! render identically. [`Rule::parse`] reads the same form back.

mod condition;
mod types;

pub use condition::{Comparator, Condition, Operand};
pub use types::{Rule, CONJUNCTION};
