//! Stratified k-fold partitioning.

use crate::dataset::RecordId;
use rand::seq::SliceRandom;
use rand::Rng;

/// Splits record ids into `k` class-stratified folds.
///
/// Each class list is shuffled independently, then dealt out in passes:
/// every pass visits the folds in order and, for each fold, takes the
/// next id of every class that still has one. Every fold thus holds
/// `floor` or `ceil` of each class's share, and fold sizes differ by at
/// most the number of classes.
///
/// Returns no folds for `k == 0`.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_nichepso::crossval::stratified_folds;
///
/// let classes = vec![vec![1, 2, 3, 4], vec![5, 6]];
/// let mut rng = StdRng::seed_from_u64(0);
/// let folds = stratified_folds(&classes, 2, &mut rng);
/// assert_eq!(folds.len(), 2);
/// assert_eq!(folds[0].len(), 3);
/// assert_eq!(folds[1].len(), 3);
/// ```
pub fn stratified_folds<R: Rng>(
    classes: &[Vec<RecordId>],
    k: usize,
    rng: &mut R,
) -> Vec<Vec<RecordId>> {
    if k == 0 {
        return Vec::new();
    }

    let shuffled: Vec<Vec<RecordId>> = classes
        .iter()
        .map(|members| {
            let mut members = members.clone();
            members.shuffle(rng);
            members
        })
        .collect();

    let total: usize = shuffled.iter().map(Vec::len).sum();
    let mut folds: Vec<Vec<RecordId>> = (0..k)
        .map(|_| Vec::with_capacity(total / k + classes.len()))
        .collect();
    let mut cursors = vec![0usize; shuffled.len()];

    let mut dealt = 0;
    while dealt < total {
        for fold in folds.iter_mut() {
            for (class, members) in shuffled.iter().enumerate() {
                if let Some(&id) = members.get(cursors[class]) {
                    fold.push(id);
                    cursors[class] += 1;
                    dealt += 1;
                }
            }
        }
    }

    folds
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn classes() -> Vec<Vec<RecordId>> {
        vec![(0..23).collect(), (100..107).collect(), (200..202).collect()]
    }

    #[test]
    fn test_partition_is_complete_and_disjoint() {
        let classes = classes();
        let mut rng = StdRng::seed_from_u64(1);
        let folds = stratified_folds(&classes, 5, &mut rng);

        let all: Vec<RecordId> = folds.iter().flatten().copied().collect();
        let unique: HashSet<RecordId> = all.iter().copied().collect();
        assert_eq!(all.len(), 32);
        assert_eq!(unique.len(), 32);
    }

    #[test]
    fn test_class_share_balanced() {
        let classes = classes();
        let mut rng = StdRng::seed_from_u64(2);
        let k = 5;
        let folds = stratified_folds(&classes, k, &mut rng);

        for members in &classes {
            let set: HashSet<RecordId> = members.iter().copied().collect();
            let floor = members.len() / k;
            for fold in &folds {
                let share = fold.iter().filter(|id| set.contains(id)).count();
                assert!(share == floor || share == floor + 1, "share {share}");
            }
        }
    }

    #[test]
    fn test_fold_sizes_within_class_count() {
        let classes = classes();
        let mut rng = StdRng::seed_from_u64(3);
        let folds = stratified_folds(&classes, 4, &mut rng);
        let sizes: Vec<usize> = folds.iter().map(Vec::len).collect();
        let spread = sizes.iter().max().unwrap() - sizes.iter().min().unwrap();
        assert!(spread <= classes.len());
    }

    #[test]
    fn test_reshuffle_changes_assignment() {
        let classes = classes();
        let mut rng = StdRng::seed_from_u64(4);
        let first = stratified_folds(&classes, 5, &mut rng);
        let second = stratified_folds(&classes, 5, &mut rng);
        assert_ne!(first, second);
    }

    #[test]
    fn test_more_folds_than_records() {
        let classes = vec![vec![1, 2], vec![3]];
        let mut rng = StdRng::seed_from_u64(5);
        let folds = stratified_folds(&classes, 4, &mut rng);
        assert_eq!(folds.len(), 4);
        assert_eq!(folds.iter().map(Vec::len).sum::<usize>(), 3);
        assert!(folds[3].is_empty());
    }

    #[test]
    fn test_zero_folds() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(stratified_folds(&classes(), 0, &mut rng).is_empty());
    }
}
