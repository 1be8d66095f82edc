//! Picked-flag selection over the run's 3-star cohort.
//!
//! A photo is picked only when it lands in the top slice of *both* the
//! aesthetic ranking and the sharpness ranking. Selecting nothing is a valid
//! outcome.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A 3-star photo eligible for the picked flag.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedCandidate {
    /// RAW file the flag will be written to
    pub file: PathBuf,
    pub nima: f64,
    pub sharpness: f64,
}

/// Outcome of a selection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickedSelection {
    /// Size of each top slice
    pub top_count: usize,
    /// Files in the top slice by aesthetic score
    pub nima_top: BTreeSet<PathBuf>,
    /// Files in the top slice by sharpness
    pub sharpness_top: BTreeSet<PathBuf>,
    /// Intersection of both slices, in path order
    pub picked: Vec<PathBuf>,
}

/// Dual-ranking selector.
#[derive(Debug, Clone)]
pub struct PickedSelector {
    top_percentage: f64,
}

impl PickedSelector {
    pub fn new(top_percentage: f64) -> Self {
        Self { top_percentage }
    }

    /// `max(1, floor(n * P / 100))`; zero only when there are no candidates.
    pub fn top_count(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let count = (n as f64 * self.top_percentage / 100.0).floor() as usize;
        count.clamp(1, n)
    }

    /// Select the picked subset.
    pub fn select(&self, candidates: &[PickedCandidate]) -> PickedSelection {
        let top_count = self.top_count(candidates.len());
        if top_count == 0 {
            return PickedSelection::default();
        }

        let nima_top = top_by(candidates, top_count, |c| c.nima);
        let sharpness_top = top_by(candidates, top_count, |c| c.sharpness);
        let picked = nima_top.intersection(&sharpness_top).cloned().collect();

        PickedSelection {
            top_count,
            nima_top,
            sharpness_top,
            picked,
        }
    }
}

/// First `count` files ranked by `score` descending, ties broken by path.
fn top_by<F>(candidates: &[PickedCandidate], count: usize, score: F) -> BTreeSet<PathBuf>
where
    F: Fn(&PickedCandidate) -> f64,
{
    let mut ranked: Vec<&PickedCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.file.cmp(&b.file))
    });
    ranked
        .into_iter()
        .take(count)
        .map(|c| c.file.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, nima: f64, sharpness: f64) -> PickedCandidate {
        PickedCandidate {
            file: PathBuf::from(format!("/shoot/{name}.NEF")),
            nima,
            sharpness,
        }
    }

    #[test]
    fn test_top_count() {
        let selector = PickedSelector::new(25.0);
        assert_eq!(selector.top_count(0), 0);
        assert_eq!(selector.top_count(1), 1);
        assert_eq!(selector.top_count(3), 1);
        assert_eq!(selector.top_count(10), 2);
        assert_eq!(selector.top_count(100), 25);
        assert_eq!(PickedSelector::new(100.0).top_count(7), 7);
    }

    #[test]
    fn test_empty_cohort_selects_nothing() {
        let selection = PickedSelector::new(25.0).select(&[]);
        assert_eq!(selection.top_count, 0);
        assert!(selection.picked.is_empty());
    }

    #[test]
    fn test_single_candidate_is_picked() {
        let selection = PickedSelector::new(25.0).select(&[candidate("a", 5.0, 8000.0)]);
        assert_eq!(selection.picked, vec![PathBuf::from("/shoot/a.NEF")]);
    }

    #[test]
    fn test_intersection_of_both_rankings() {
        // a: best on both, b: best nima only, c: best sharpness only
        let candidates: Vec<PickedCandidate> = vec![
            candidate("a", 6.5, 9800.0),
            candidate("b", 6.4, 7600.0),
            candidate("c", 4.9, 9900.0),
            candidate("d", 5.0, 7700.0),
            candidate("e", 5.1, 7800.0),
            candidate("f", 5.2, 7900.0),
            candidate("g", 5.3, 8000.0),
            candidate("h", 5.4, 8100.0),
            candidate("i", 5.5, 8200.0),
            candidate("j", 5.6, 8300.0),
        ];
        let selection = PickedSelector::new(25.0).select(&candidates);
        assert_eq!(selection.top_count, 2);
        assert_eq!(selection.nima_top.len(), 2);
        assert_eq!(selection.sharpness_top.len(), 2);
        assert!(selection.nima_top.contains(&PathBuf::from("/shoot/b.NEF")));
        assert!(selection.sharpness_top.contains(&PathBuf::from("/shoot/c.NEF")));
        assert_eq!(selection.picked, vec![PathBuf::from("/shoot/a.NEF")]);
    }

    #[test]
    fn test_disjoint_rankings_pick_nothing() {
        let candidates = vec![
            candidate("a", 6.0, 7600.0),
            candidate("b", 5.0, 9000.0),
            candidate("c", 5.5, 8000.0),
            candidate("d", 5.4, 8100.0),
        ];
        let selection = PickedSelector::new(25.0).select(&candidates);
        assert_eq!(selection.top_count, 1);
        assert!(selection.picked.is_empty());
    }

    #[test]
    fn test_ties_break_by_path() {
        let candidates = vec![
            candidate("b", 5.0, 8000.0),
            candidate("a", 5.0, 8000.0),
            candidate("c", 5.0, 8000.0),
            candidate("d", 5.0, 8000.0),
        ];
        let first = PickedSelector::new(25.0).select(&candidates);
        let mut reversed = candidates.clone();
        reversed.reverse();
        let second = PickedSelector::new(25.0).select(&reversed);

        assert_eq!(first.picked, vec![PathBuf::from("/shoot/a.NEF")]);
        assert_eq!(first, second);
    }
}
