//! Core types and values for Millrace.
//!
//! This crate provides:
//! - [`Value`] - The attribute value type for all fact data
//! - [`FactId`] - Stable, process-unique fact identities
//! - [`Type`] - Type descriptors for schema validation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod id;
mod types;
mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use id::FactId;
pub use types::Type;
pub use value::Value;

/// Result alias using the Millrace [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
