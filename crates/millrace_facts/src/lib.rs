//! Fact schemas, caller-owned fact handles, and working memory for
//! Millrace.
//!
//! This crate provides:
//! - [`FactType`] / [`AttributeSchema`] - Schemas for typed facts
//! - [`Fact`] - Identity-bearing, interior-mutable fact handles
//! - [`WorkingMemory`] - The live fact collection for one firing pass

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod fact;
mod memory;
mod schema;

pub use fact::{Fact, FactBuilder};
pub use memory::WorkingMemory;
pub use schema::{AttributeSchema, FactType};
