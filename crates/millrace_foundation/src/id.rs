//! Stable fact identities.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identity for a fact.
///
/// Identities are allocated from a process-wide counter and never reused,
/// so two fact handles designate the same fact exactly when their ids are
/// equal, no matter how the fact's attributes change. This is the
/// reference-equality half of the fact contract: attribute values mutate,
/// identity never does.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

impl FactId {
    /// Allocates a fresh, process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw index of this identity.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactId({})", self.0)
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fact#{}", self.0)
    }
}
