//! Rule-authoring front-ends and the stateless session for Millrace.
//!
//! This crate provides:
//! - [`RuleSetBuilder`] - Fluent, chainable rule set construction
//! - [`RuleSetDecl`] / [`RuleDecl`] - Declarative, data-first rule
//!   grouping
//! - [`StatelessSession`] - One firing pass per call, no retained state
//!
//! Both front-ends compile to the same engine rule model; a rule set
//! built either way fires identically.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod declarative;
mod session;

pub use builder::{RuleBuilder, RuleSetBuilder};
pub use declarative::{RuleDecl, RuleSetDecl};
pub use session::StatelessSession;
