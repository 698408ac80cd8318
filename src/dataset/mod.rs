//! Access to the labelled dataset.
//!
//! The optimizer never touches rows directly. It talks to a
//! [`RecordStore`], which executes a rule's predicate and reports attribute
//! bounds, class labels and class memberships. [`MemoryStore`] is a
//! complete in-memory implementation.

mod memory;
mod store;
mod types;

pub use memory::MemoryStore;
pub use store::{Attribute, AttributeKind, RecordId, RecordStore, Split};
pub use types::{Dataset, Schema};
