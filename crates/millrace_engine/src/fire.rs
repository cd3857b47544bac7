//! The match-then-fire pass driver.
//!
//! One pass visits every rule exactly once, in agenda order. For each
//! rule the match set is fully enumerated against live working memory
//! before any of its actions run, then the actions fire in enumeration
//! order. Mutations apply immediately and are visible to the matching of
//! every later rule. There is no fixpoint iteration, no refraction, and
//! no rollback: if an action or a predicate fails, the pass aborts and
//! everything already fired keeps its effects.

use std::fmt;
use std::sync::Arc;

use millrace_facts::{Fact, WorkingMemory};
use millrace_foundation::{FactId, Result};

use crate::agenda::Agenda;
use crate::matcher::PatternMatcher;
use crate::rule::{MatchContext, RuleSet};

// =============================================================================
// Firing Log
// =============================================================================

/// Record of one activation, for observability.
#[derive(Clone, Debug)]
pub struct FiringRecord {
    /// Which rule fired.
    pub rule: Arc<str>,
    /// The bound facts, by identity, in variable declaration order.
    pub facts: Vec<FactId>,
}

/// Result of a completed pass.
#[derive(Clone, Debug)]
pub struct PassReport {
    /// Number of activations fired.
    pub activations: usize,
    /// The firing log, in firing order.
    pub records: Vec<FiringRecord>,
}

// =============================================================================
// Pass Driver
// =============================================================================

/// Pass state: a driver is idle between passes and firing within one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassState {
    /// No pass in progress.
    Idle,
    /// A pass is executing on the calling thread.
    Firing,
}

/// Drives firing passes over a rule set.
///
/// A driver is reusable; each `run` resets its log. The stateless
/// session layer creates one per fire call and discards it, which is
/// what makes the session stateless.
pub struct FiringPass {
    state: PassState,
    records: Vec<FiringRecord>,
}

impl Default for FiringPass {
    fn default() -> Self {
        Self::new()
    }
}

impl FiringPass {
    /// Creates an idle pass driver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PassState::Idle,
            records: Vec::new(),
        }
    }

    /// Returns the current pass state.
    #[must_use]
    pub const fn state(&self) -> PassState {
        self.state
    }

    /// Returns the firing log so far. After an aborted run this still
    /// holds the activations that fired before the error.
    #[must_use]
    pub fn records(&self) -> &[FiringRecord] {
        &self.records
    }

    /// Returns the number of activations fired so far.
    #[must_use]
    pub fn activations(&self) -> usize {
        self.records.len()
    }

    /// Executes one firing pass: order the rules, then for each rule
    /// fully enumerate its matches and fire them in enumeration order.
    ///
    /// # Errors
    /// Returns the first evaluation error a predicate or action raises.
    /// Rules already processed keep their mutations.
    pub fn run(&mut self, rule_set: &RuleSet, memory: &WorkingMemory) -> Result<PassReport> {
        self.records.clear();
        self.state = PassState::Firing;
        let result = self.drive(rule_set, memory);
        self.state = PassState::Idle;
        result?;
        Ok(PassReport {
            activations: self.records.len(),
            records: self.records.clone(),
        })
    }

    fn drive(&mut self, rule_set: &RuleSet, memory: &WorkingMemory) -> Result<()> {
        let order = Agenda::order(rule_set.rules(), rule_set.resolution());
        for index in order {
            let rule = &rule_set.rules()[index];

            // The match set is fixed before the first action runs, so an
            // action cannot add or remove matches of its own rule.
            let tuples = PatternMatcher::enumerate(rule, memory)?;
            for tuple in tuples {
                let context = MatchContext::new(rule.variables(), &tuple);
                (rule.action())(&context)?;
                self.records.push(FiringRecord {
                    rule: rule.name().into(),
                    facts: tuple.iter().map(Fact::id).collect(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FiringPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiringPass")
            .field("state", &self.state)
            .field("activations", &self.records.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
