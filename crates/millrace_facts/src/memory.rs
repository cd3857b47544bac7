//! Working memory: the live fact collection for one firing pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use millrace_foundation::FactId;

use crate::fact::Fact;

/// The live collection of facts visible to matching during one firing
/// pass.
///
/// Facts are grouped by type name and kept in insertion order, which is
/// the enumeration order the matcher guarantees. There is no
/// snapshotting: the matcher reads attribute values through the fact
/// handles at evaluation time, so mutations applied earlier in a pass
/// are always visible. Retraction is not supported; a working memory
/// only ever grows, and is discarded when its pass completes.
#[derive(Debug, Default)]
pub struct WorkingMemory {
    by_type: HashMap<Arc<str>, Vec<Fact>>,
    seen: HashSet<FactId>,
}

impl WorkingMemory {
    /// Creates an empty working memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fact. Re-inserting a fact already present (same
    /// identity) is a no-op.
    ///
    /// Returns true if the fact was newly inserted.
    pub fn insert(&mut self, fact: Fact) -> bool {
        if !self.seen.insert(fact.id()) {
            return false;
        }
        self.by_type
            .entry(Arc::clone(fact.fact_type().name_arc()))
            .or_default()
            .push(fact);
        true
    }

    /// Inserts every fact from an iterator, in order.
    pub fn extend(&mut self, facts: impl IntoIterator<Item = Fact>) {
        for fact in facts {
            self.insert(fact);
        }
    }

    /// Returns the facts of a given type, in insertion order.
    ///
    /// Types no fact was inserted for yield an empty slice.
    #[must_use]
    pub fn facts_of_type(&self, type_name: &str) -> &[Fact] {
        self.by_type.get(type_name).map_or(&[], Vec::as_slice)
    }

    /// Returns the total number of facts held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if no facts are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Returns true if the given fact is present.
    #[must_use]
    pub fn contains(&self, fact: &Fact) -> bool {
        self.seen.contains(&fact.id())
    }
}
