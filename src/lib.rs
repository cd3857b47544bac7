//! Millrace - Deterministic forward-chaining production-rule engine
//!
//! This crate re-exports all layers of the Millrace system for
//! convenient access. For detailed documentation, see the individual
//! layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: millrace_runtime    — Rule-authoring front-ends, sessions
//! Layer 2: millrace_engine     — Conditions, predicates, matching, firing
//! Layer 1: millrace_facts      — Schemas, fact handles, working memory
//! Layer 0: millrace_foundation — Core types (Value, Type, FactId, Error)
//! ```

pub use millrace_engine as engine;
pub use millrace_facts as facts;
pub use millrace_foundation as foundation;
pub use millrace_runtime as runtime;
