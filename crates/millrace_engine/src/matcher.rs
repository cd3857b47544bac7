//! Tuple enumeration against working memory.
//!
//! For a rule with variables bound to types `T1..Tn`, the matcher
//! enumerates every tuple `(f1,...,fn)` with `fi` drawn from the working
//! memory's facts of `Ti`, keeping the tuples whose predicate evaluates
//! true. Enumeration is nested iteration in variable declaration order,
//! each level iterating its type's facts in insertion order. That order
//! is a contract: it is the firing order for multiple matches of one
//! rule.
//!
//! Two-variable rules with a hash-compatible equality join take an
//! indexed path that probes insertion-ordered buckets in outer-loop
//! order, producing the same tuples in the same order as the nested
//! loops while skipping non-matching keys. Which clause errors first may
//! differ between the two paths, but no action has run for the rule at
//! that point, so observable fact state is identical.

use std::collections::HashMap;

use millrace_facts::{Fact, WorkingMemory};
use millrace_foundation::{Error, Result, Value};

use crate::expr::{EqualityJoin, Expr};
use crate::rule::Rule;

/// A bound tuple, in the rule's variable declaration order.
pub type MatchTuple = Vec<Fact>;

/// Enumerates rule matches against a working memory.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Returns every tuple satisfying the rule's predicate, in the
    /// enumeration order described at module level.
    ///
    /// The index (when taken) is rebuilt on every call: matching always
    /// reads live fact state.
    ///
    /// # Errors
    /// Returns an evaluation error if the predicate touches an absent
    /// attribute or compares incompatible values.
    pub fn enumerate(rule: &Rule, memory: &WorkingMemory) -> Result<Vec<MatchTuple>> {
        let candidates: Vec<&[Fact]> = rule
            .variables()
            .iter()
            .map(|v| memory.facts_of_type(v.fact_type().name()))
            .collect();

        // An empty candidate list means no tuples and nothing evaluated.
        if candidates.iter().any(|c| c.is_empty()) {
            return Ok(Vec::new());
        }

        if candidates.len() == 2 {
            if let Some(join) = rule.predicate().equality_join() {
                return Self::enumerate_joined(rule, &candidates, join);
            }
        }
        Self::enumerate_product(rule, &candidates)
    }

    /// Indexed path: hash the inner candidates on their join key, then
    /// probe in outer insertion order.
    fn enumerate_joined(
        rule: &Rule,
        candidates: &[&[Fact]],
        join: EqualityJoin,
    ) -> Result<Vec<MatchTuple>> {
        let clause = &rule.predicate().clauses()[join.clause];
        let (outer_key, inner_key) = if join.lhs_variable == 0 {
            (&clause.lhs, &clause.rhs)
        } else {
            (&clause.rhs, &clause.lhs)
        };

        let mut index: HashMap<Value, Vec<usize>> = HashMap::new();
        for (position, fact) in candidates[1].iter().enumerate() {
            let key = join_key(inner_key, fact)?;
            index.entry(key).or_default().push(position);
        }

        let mut tuples = Vec::new();
        for outer in candidates[0] {
            let key = join_key(outer_key, outer)?;
            let Some(bucket) = index.get(&key) else {
                continue;
            };
            for &position in bucket {
                let tuple = vec![outer.clone(), candidates[1][position].clone()];
                // Residual clauses (and the join clause, cheaply) are
                // evaluated per tuple, exactly as the nested loops would.
                if rule.predicate().matches(&tuple)? {
                    tuples.push(tuple);
                }
            }
        }
        Ok(tuples)
    }

    /// General path: full nested iteration, last variable fastest.
    fn enumerate_product(rule: &Rule, candidates: &[&[Fact]]) -> Result<Vec<MatchTuple>> {
        let mut positions = vec![0usize; candidates.len()];
        let mut tuples = Vec::new();

        'next_tuple: loop {
            let tuple: MatchTuple = positions
                .iter()
                .zip(candidates)
                .map(|(&position, facts)| facts[position].clone())
                .collect();
            if rule.predicate().matches(&tuple)? {
                tuples.push(tuple);
            }

            let mut level = candidates.len();
            loop {
                if level == 0 {
                    break 'next_tuple;
                }
                level -= 1;
                positions[level] += 1;
                if positions[level] < candidates[level].len() {
                    break;
                }
                positions[level] = 0;
            }
        }

        Ok(tuples)
    }
}

/// Evaluates a join key for one fact, with the absent-attribute check
/// the predicate would otherwise apply at the comparison.
fn join_key(key: &Expr, fact: &Fact) -> Result<Value> {
    let value = key.eval_for(fact)?;
    if value.is_nil() {
        return Err(Error::absent_attribute(
            key.attribute_name().unwrap_or("<literal>"),
        ));
    }
    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================
