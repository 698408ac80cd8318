//! In-memory record store.

use super::store::{Attribute, AttributeKind, RecordId, RecordStore, Split};
use crate::error::StoreError;
use crate::rule::{Comparator, Operand, Rule};
use std::collections::{HashMap, HashSet};

/// A condition's right-hand side resolved against the column layout.
#[derive(Debug, Clone, Copy)]
enum Rhs {
    Literal(f64),
    Column(usize),
}

#[derive(Debug, Clone)]
struct Record {
    id: RecordId,
    class: usize,
    values: Vec<f64>,
}

/// A [`RecordStore`] over rows held in memory.
///
/// Bounds of every attribute are tracked as rows are inserted. Class labels
/// are reported in order of first appearance.
///
/// # Examples
///
/// ```
/// use u_nichepso::dataset::{AttributeKind, MemoryStore};
///
/// let mut store = MemoryStore::new(vec![
///     ("length", AttributeKind::Numeric),
///     ("colour", AttributeKind::Categorical),
/// ]);
/// store.insert(1, "a", vec![4.2, 0.0]).unwrap();
/// store.insert(2, "b", vec![6.1, 2.0]).unwrap();
/// assert_eq!(store.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
    labels: Vec<String>,
    records: Vec<Record>,
}

impl MemoryStore {
    /// Creates an empty store with the given attribute columns.
    pub fn new<N: Into<String>>(columns: Vec<(N, AttributeKind)>) -> Self {
        let attributes: Vec<Attribute> = columns
            .into_iter()
            .map(|(name, kind)| Attribute::new(name, kind, f64::INFINITY, f64::NEG_INFINITY))
            .collect();
        let index = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .collect();
        Self {
            attributes,
            index,
            labels: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Appends a row.
    ///
    /// # Errors
    /// [`StoreError::Query`] if the row width does not match the columns,
    /// [`StoreError::NonFinite`] for a NaN or infinite value. A rejected
    /// row leaves the store untouched.
    pub fn insert(
        &mut self,
        id: RecordId,
        label: &str,
        values: Vec<f64>,
    ) -> Result<(), StoreError> {
        if values.len() != self.attributes.len() {
            return Err(StoreError::Query(format!(
                "record {id} has {} values, expected {}",
                values.len(),
                self.attributes.len()
            )));
        }

        if let Some((attribute, _)) = self
            .attributes
            .iter()
            .zip(&values)
            .find(|(_, v)| !v.is_finite())
        {
            return Err(StoreError::NonFinite {
                record: id,
                attribute: attribute.name.clone(),
            });
        }

        for (attribute, &v) in self.attributes.iter_mut().zip(&values) {
            attribute.min = attribute.min.min(v);
            attribute.max = attribute.max.max(v);
        }

        let class = match self.labels.iter().position(|l| l == label) {
            Some(c) => c,
            None => {
                self.labels.push(label.to_string());
                self.labels.len() - 1
            }
        };

        self.records.push(Record { id, class, values });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column(&self, name: &str) -> Result<usize, StoreError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| StoreError::UnknownAttribute(name.to_string()))
    }

    /// Resolves every condition to column positions once per query.
    fn compile(&self, rule: &Rule) -> Result<Vec<(usize, Comparator, Rhs)>, StoreError> {
        rule.conditions()
            .iter()
            .map(|c| {
                let lhs = self.column(&c.attribute)?;
                let rhs = match &c.operand {
                    Operand::Value(v) => Rhs::Literal(*v),
                    Operand::Attribute(other) => Rhs::Column(self.column(other)?),
                };
                Ok((lhs, c.comparator, rhs))
            })
            .collect()
    }
}

impl RecordStore for MemoryStore {
    fn attributes(&self) -> Result<Vec<Attribute>, StoreError> {
        Ok(self.attributes.clone())
    }

    fn class_labels(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.labels.clone())
    }

    fn class_members(&self, label: &str) -> Result<Vec<RecordId>, StoreError> {
        let class = self
            .labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| StoreError::UnknownClass(label.to_string()))?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.class == class)
            .map(|r| r.id)
            .collect())
    }

    fn query(
        &self,
        rule: &Rule,
        fold: &HashSet<RecordId>,
        split: Split,
    ) -> Result<HashSet<RecordId>, StoreError> {
        let compiled = self.compile(rule)?;

        Ok(self
            .records
            .iter()
            .filter(|r| split.includes(fold.contains(&r.id)))
            .filter(|r| {
                compiled.iter().all(|&(lhs, comparator, rhs)| {
                    let right = match rhs {
                        Rhs::Literal(v) => v,
                        Rhs::Column(col) => r.values[col],
                    };
                    comparator.holds(r.values[lhs], right)
                })
            })
            .map(|r| r.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Condition;

    fn store() -> MemoryStore {
        let mut s = MemoryStore::new(vec![
            ("x", AttributeKind::Numeric),
            ("y", AttributeKind::Numeric),
        ]);
        s.insert(1, "pos", vec![1.0, 5.0]).unwrap();
        s.insert(2, "pos", vec![2.0, 1.0]).unwrap();
        s.insert(3, "neg", vec![3.0, 4.0]).unwrap();
        s.insert(4, "neg", vec![4.0, 2.0]).unwrap();
        s
    }

    #[test]
    fn test_bounds_tracked() {
        let attrs = store().attributes().unwrap();
        assert_eq!((attrs[0].min, attrs[0].max), (1.0, 4.0));
        assert_eq!((attrs[1].min, attrs[1].max), (1.0, 5.0));
    }

    #[test]
    fn test_width_mismatch() {
        let mut s = store();
        assert!(s.insert(9, "pos", vec![1.0]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut s = store();
        for bad in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(
                s.insert(9, "pos", vec![2.0, bad]),
                Err(StoreError::NonFinite {
                    record: 9,
                    attribute: "y".into()
                })
            );
        }
        assert_eq!(s.len(), 4);
        let attrs = s.attributes().unwrap();
        assert_eq!((attrs[1].min, attrs[1].max), (1.0, 5.0));
    }

    #[test]
    fn test_query_split() {
        let s = store();
        let rule = Rule::new(0, vec![Condition::value("x", Comparator::Le, 3.0)]).unwrap();
        let fold: HashSet<RecordId> = [1, 4].into_iter().collect();

        let training = s.query(&rule, &fold, Split::Training).unwrap();
        assert_eq!(training, [2, 3].into_iter().collect());

        let validation = s.query(&rule, &fold, Split::Validation).unwrap();
        assert_eq!(validation, [1].into_iter().collect());
    }

    #[test]
    fn test_query_attribute_operand() {
        let s = store();
        let rule = Rule::new(0, vec![Condition::attribute("x", Comparator::Lt, "y")]).unwrap();
        let hits = s.query(&rule, &HashSet::new(), Split::Training).unwrap();
        assert_eq!(hits, [1, 3].into_iter().collect());
    }

    #[test]
    fn test_query_unknown_attribute() {
        let s = store();
        let rule = Rule::new(0, vec![Condition::value("w", Comparator::Eq, 0.0)]).unwrap();
        assert_eq!(
            s.query(&rule, &HashSet::new(), Split::Training),
            Err(StoreError::UnknownAttribute("w".into()))
        );
    }

    #[test]
    fn test_class_members() {
        let s = store();
        assert_eq!(s.class_labels().unwrap(), vec!["pos", "neg"]);
        assert_eq!(s.class_members("neg").unwrap(), vec![3, 4]);
        assert!(s.class_members("other").is_err());
    }
}
