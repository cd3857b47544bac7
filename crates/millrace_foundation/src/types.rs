//! Type descriptors for schema validation and predicate checking.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type descriptor for attribute schemas.
///
/// Used to declare fact attribute types, validate values at fact
/// construction and mutation, and check predicate operands at rule set
/// construction.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// The nil type (only value: nil, representing an absent attribute).
    Nil,
    /// Boolean type.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// String type.
    String,
    /// Reference to another fact, compared by identity.
    FactRef,
    /// Homogeneous vector type.
    Vec(Box<Type>),
    /// Homogeneous map type.
    Map(Box<Type>, Box<Type>),
    /// Optional type (value or nil).
    Option(Box<Type>),
    /// Any type (accepts any value).
    Any,
}

impl Type {
    /// Creates a vector type with the given element type.
    #[must_use]
    pub fn vec(element: Type) -> Self {
        Self::Vec(Box::new(element))
    }

    /// Creates a map type with the given key and value types.
    #[must_use]
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(Box::new(key), Box::new(value))
    }

    /// Creates an optional type.
    #[must_use]
    pub fn option(inner: Type) -> Self {
        Self::Option(Box::new(inner))
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true if this type admits nil.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nil | Self::Option(_) | Self::Any)
    }

    /// Returns true if this type is numeric (`Int` or `Float`).
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Checks if a value of `value_type` is accepted where this type is
    /// declared.
    ///
    /// - `Any` accepts all types
    /// - `Option(T)` accepts `Nil` and whatever `T` accepts
    /// - `Float` accepts `Int` (numeric promotion)
    /// - Collection types check element types recursively, with
    ///   `Vec(Any)`/`Map(Any, Any)` standing in for runtime values whose
    ///   element types are not statically known
    #[must_use]
    pub fn accepts(&self, value_type: &Type) -> bool {
        if matches!(self, Self::Any) {
            return true;
        }

        if let Self::Option(inner) = self {
            return matches!(value_type, Self::Nil) || inner.accepts(value_type);
        }

        match (self, value_type) {
            (Self::Nil, Self::Nil)
            | (Self::Bool, Self::Bool)
            | (Self::Int | Self::Float, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::String, Self::String)
            | (Self::FactRef, Self::FactRef) => true,

            (Self::Vec(expected), Self::Vec(actual)) => {
                actual.is_any() || expected.accepts(actual)
            }
            (Self::Map(expected_k, expected_v), Self::Map(actual_k, actual_v)) => {
                (actual_k.is_any() && actual_v.is_any())
                    || (expected_k.accepts(actual_k) && expected_v.accepts(actual_v))
            }

            _ => false,
        }
    }

    /// Strips `Option` wrappers, yielding the inner type.
    ///
    /// Comparability is decided on the unwrapped type; a nil encountered
    /// at evaluation time is still an evaluation error.
    #[must_use]
    pub fn unwrapped(&self) -> &Type {
        match self {
            Self::Option(inner) => inner.unwrapped(),
            other => other,
        }
    }

    /// Returns true if `==`/`!=` between values of the two types is
    /// defined.
    ///
    /// Equality is defined for two numerics (with cross `Int`/`Float`
    /// comparison), and otherwise for operands of the same kind. `Any`
    /// defers the decision to evaluation time.
    #[must_use]
    pub fn eq_comparable(&self, other: &Type) -> bool {
        let (a, b) = (self.unwrapped(), other.unwrapped());
        if a.is_any() || b.is_any() {
            return true;
        }
        if a.is_numeric() && b.is_numeric() {
            return true;
        }
        matches!(
            (a, b),
            (Type::Bool, Type::Bool)
                | (Type::String, Type::String)
                | (Type::FactRef, Type::FactRef)
                | (Type::Vec(_), Type::Vec(_))
                | (Type::Map(_, _), Type::Map(_, _))
        )
    }

    /// Returns true if `<`, `<=`, `>`, `>=` between values of the two
    /// types is defined.
    ///
    /// Ordering is defined for numeric and string operands only; `Any`
    /// defers the decision to evaluation time.
    #[must_use]
    pub fn ord_comparable(&self, other: &Type) -> bool {
        let (a, b) = (self.unwrapped(), other.unwrapped());
        if a.is_any() || b.is_any() {
            return true;
        }
        (a.is_numeric() && b.is_numeric()) || matches!((a, b), (Type::String, Type::String))
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::FactRef => write!(f, "fact-ref"),
            Self::Vec(t) => write!(f, "vec<{t:?}>"),
            Self::Map(k, v) => write!(f, "map<{k:?}, {v:?}>"),
            Self::Option(t) => write!(f, "option<{t:?}>"),
            Self::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
