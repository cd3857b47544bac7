//! The stateless session.
//!
//! A session binds a rule set and exposes `fire`. Each fire call builds
//! a fresh working memory from the given facts, drives one firing pass,
//! and discards the memory and the firing log when it returns. Nothing
//! carries over between calls; results are observed entirely through
//! in-place mutation of the facts the caller retains handles to.

use std::sync::Arc;

use millrace_engine::{FiringPass, RuleSet};
use millrace_facts::{Fact, WorkingMemory};
use millrace_foundation::Result;

/// A stateless rule session.
///
/// Cloning is cheap (the rule set is shared). Distinct fire calls over
/// disjoint fact sets may run concurrently from clones on separate
/// threads; passing the same fact into two concurrent calls is a caller
/// obligation the engine does not police.
#[derive(Clone, Debug)]
pub struct StatelessSession {
    rule_set: Arc<RuleSet>,
}

impl StatelessSession {
    /// Creates a session over a rule set.
    #[must_use]
    pub fn new(rule_set: RuleSet) -> Self {
        Self {
            rule_set: Arc::new(rule_set),
        }
    }

    /// Returns the bound rule set.
    #[must_use]
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Inserts the given facts (of any mix of types) into a fresh
    /// working memory and performs one firing pass. Results are
    /// observable only through the caller's retained fact handles.
    ///
    /// # Errors
    /// Returns the first evaluation error a predicate or action raises;
    /// rules already processed keep their mutations.
    pub fn fire(&self, facts: impl IntoIterator<Item = Fact>) -> Result<()> {
        let mut memory = WorkingMemory::new();
        memory.extend(facts);

        FiringPass::new().run(&self.rule_set, &memory)?;
        Ok(())
    }
}
