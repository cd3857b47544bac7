//! Firing order and conflict resolution.
//!
//! Every rule in a set is matched and fired exactly once per pass; the
//! agenda only decides the order. The default strategy sorts by rule
//! name, ascending lexicographically. Callers may substitute any total
//! order (salience, declaration order) without touching the matcher or
//! the pass driver.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::rule::Rule;

/// Comparator type for custom conflict resolution.
pub type RuleComparator = Arc<dyn Fn(&Rule, &Rule) -> Ordering + Send + Sync>;

/// Strategy deciding the order rules fire in within one pass.
#[derive(Clone, Default)]
pub enum ConflictResolution {
    /// Ascending lexicographic order by rule name (the default).
    #[default]
    ByName,
    /// A caller-supplied total order over rules.
    Custom(RuleComparator),
}

impl ConflictResolution {
    /// Creates a custom strategy from a comparator.
    #[must_use]
    pub fn custom(
        comparator: impl Fn(&Rule, &Rule) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(Arc::new(comparator))
    }

    /// Compares two rules under this strategy.
    #[must_use]
    pub fn compare(&self, a: &Rule, b: &Rule) -> Ordering {
        match self {
            Self::ByName => a.name().cmp(b.name()),
            Self::Custom(comparator) => comparator(a, b),
        }
    }
}

impl fmt::Debug for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName => write!(f, "ByName"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Computes the firing order for one pass.
pub struct Agenda;

impl Agenda {
    /// Returns indices into `rules` in firing order.
    ///
    /// The sort is stable, so rules a custom comparator considers equal
    /// keep their declaration order.
    #[must_use]
    pub fn order(rules: &[Rule], resolution: &ConflictResolution) -> Vec<usize> {
        let mut order: Vec<usize> = (0..rules.len()).collect();
        order.sort_by(|&a, &b| resolution.compare(&rules[a], &rules[b]));
        order
    }
}
