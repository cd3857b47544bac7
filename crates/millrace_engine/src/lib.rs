//! Rule model, condition compilation, pattern matching, and firing for
//! Millrace.
//!
//! This crate provides:
//! - [`condition`] - Compilation of condition text into a condition AST
//! - [`Predicate`] - Typed, resolved predicate expressions
//! - [`Rule`] / [`RuleSet`] - The immutable rule model
//! - [`Agenda`] / [`ConflictResolution`] - Firing order
//! - [`PatternMatcher`] - Tuple enumeration against working memory
//! - [`FiringPass`] - The match-then-fire pass driver

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod agenda;
pub mod condition;
pub mod expr;
pub mod fire;
pub mod matcher;
pub mod rule;

pub use agenda::{Agenda, ConflictResolution};
pub use condition::{CompareOp, Comparison, ConditionAst, Operand};
pub use expr::{Clause, Expr, Predicate};
pub use fire::{FiringPass, FiringRecord, PassReport, PassState};
pub use matcher::{MatchTuple, PatternMatcher};
pub use rule::{Action, MatchContext, PatternVariable, Rule, RuleSet};
