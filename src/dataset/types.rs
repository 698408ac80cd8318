//! Run-level snapshot of what the store exposes.

use super::store::{Attribute, RecordId, RecordStore};
use crate::error::{MiningError, MiningResult};
use std::collections::HashMap;

/// Attribute lookup by name, in the store's declared order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
    numeric: Vec<usize>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        let index = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .collect();
        let numeric = attributes
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_numeric())
            .map(|(i, _)| i)
            .collect();
        Self {
            attributes,
            index,
            numeric,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Positions of the numeric attributes.
    pub fn numeric(&self) -> &[usize] {
        &self.numeric
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Everything the optimizer needs from the store besides predicate queries.
///
/// Loaded once per cross-validation run; niche `i` is `labels[i]` and its
/// ground truth is `class_members[i]`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: Schema,
    pub labels: Vec<String>,
    pub class_members: Vec<Vec<RecordId>>,
}

impl Dataset {
    /// Reads schema, labels and class memberships from `store`.
    ///
    /// # Errors
    /// Store failures, [`MiningError::NoClasses`] when there are no labels
    /// or no attributes, [`MiningError::EmptyDataset`] when no record
    /// carries any label.
    pub fn load<S: RecordStore + ?Sized>(store: &S) -> MiningResult<Self> {
        let schema = Schema::new(store.attributes()?);
        let labels = store.class_labels()?;
        if labels.is_empty() || schema.is_empty() {
            return Err(MiningError::NoClasses);
        }

        let class_members = labels
            .iter()
            .map(|label| store.class_members(label))
            .collect::<Result<Vec<_>, _>>()?;

        let dataset = Self {
            schema,
            labels,
            class_members,
        };
        if dataset.num_records() == 0 {
            return Err(MiningError::EmptyDataset);
        }
        Ok(dataset)
    }

    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn num_records(&self) -> usize {
        self.class_members.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{AttributeKind, MemoryStore};

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::new(vec![
            Attribute::new("a", AttributeKind::Numeric, 0.0, 1.0),
            Attribute::new("b", AttributeKind::Categorical, 0.0, 3.0),
            Attribute::new("c", AttributeKind::Numeric, 0.0, 1.0),
        ]);
        assert_eq!(schema.position("b"), Some(1));
        assert_eq!(schema.get("c").map(|a| a.kind), Some(AttributeKind::Numeric));
        assert!(schema.get("z").is_none());
        assert_eq!(schema.numeric(), &[0, 2]);
    }

    #[test]
    fn test_load_from_store() {
        let mut store = MemoryStore::new(vec![("x", AttributeKind::Numeric)]);
        store.insert(1, "yes", vec![1.0]).unwrap();
        store.insert(2, "no", vec![2.0]).unwrap();
        store.insert(3, "yes", vec![3.0]).unwrap();

        let dataset = Dataset::load(&store).unwrap();
        assert_eq!(dataset.labels, vec!["yes".to_string(), "no".to_string()]);
        assert_eq!(dataset.class_members, vec![vec![1, 3], vec![2]]);
        assert_eq!(dataset.num_records(), 3);
        assert_eq!(dataset.schema.get("x").map(|a| a.max), Some(3.0));
    }

    #[test]
    fn test_load_empty_store() {
        let store = MemoryStore::new(vec![("x", AttributeKind::Numeric)]);
        assert!(matches!(Dataset::load(&store), Err(MiningError::NoClasses)));
    }
}
