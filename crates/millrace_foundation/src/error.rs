//! Error types for the Millrace engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Errors fall into two categories with different propagation rules:
//! definition errors abort rule set construction entirely (no partial
//! rule set is usable), while evaluation errors abort an in-progress fire
//! call, leaving mutations from already-processed rules in place.

use std::fmt;

use thiserror::Error;

use crate::types::Type;

/// The main error type for Millrace operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns true if this is a definition error (detected at rule set
    /// construction, before any fire call).
    #[must_use]
    pub const fn is_definition(&self) -> bool {
        self.kind.is_definition()
    }

    /// Returns true if this is an evaluation error (detected during a
    /// fire call).
    #[must_use]
    pub const fn is_evaluation(&self) -> bool {
        !self.kind.is_definition()
    }

    /// Creates a duplicate rule name error.
    #[must_use]
    pub fn duplicate_rule(rule: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateRule { rule: rule.into() })
    }

    /// Creates an error for a rule declaring no pattern variables.
    #[must_use]
    pub fn no_variables(rule: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoVariables { rule: rule.into() })
    }

    /// Creates a duplicate pattern variable error.
    #[must_use]
    pub fn duplicate_variable(variable: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateVariable {
            variable: variable.into(),
        })
    }

    /// Creates an error for a condition referencing an undeclared
    /// pattern variable.
    #[must_use]
    pub fn unknown_variable(variable: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownVariable {
            variable: variable.into(),
        })
    }

    /// Creates an unknown attribute error.
    #[must_use]
    pub fn unknown_attribute(
        fact_type: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnknownAttribute {
            fact_type: fact_type.into(),
            attribute: attribute.into(),
        })
    }

    /// Creates a duplicate attribute error.
    #[must_use]
    pub fn duplicate_attribute(
        fact_type: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::DuplicateAttribute {
            fact_type: fact_type.into(),
            attribute: attribute.into(),
        })
    }

    /// Creates a statically-incomparable operand types error.
    #[must_use]
    pub fn incomparable(lhs: Type, rhs: Type) -> Self {
        Self::new(ErrorKind::Incomparable { lhs, rhs })
    }

    /// Creates a condition parse error.
    #[must_use]
    pub fn condition_parse(message: impl Into<String>, offset: usize) -> Self {
        Self::new(ErrorKind::ConditionParse {
            message: message.into(),
            offset,
        })
    }

    /// Creates an absent attribute evaluation error.
    #[must_use]
    pub fn absent_attribute(attribute: impl Into<String>) -> Self {
        Self::new(ErrorKind::AbsentAttribute {
            attribute: attribute.into(),
        })
    }

    /// Creates a runtime-incomparable values error.
    #[must_use]
    pub fn incomparable_values(lhs: Type, rhs: Type) -> Self {
        Self::new(ErrorKind::IncomparableValues { lhs, rhs })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates an immutable attribute mutation error.
    #[must_use]
    pub fn immutable_attribute(attribute: impl Into<String>) -> Self {
        Self::new(ErrorKind::ImmutableAttribute {
            attribute: attribute.into(),
        })
    }

    /// Creates an unbound variable error (an action looked up a variable
    /// that is not bound in its match).
    #[must_use]
    pub fn unbound_variable(variable: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnboundVariable {
            variable: variable.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    // -------------------------------------------------------------------
    // Definition errors
    // -------------------------------------------------------------------
    /// Two rules in one rule set share a name.
    #[error("duplicate rule name: {rule}")]
    DuplicateRule {
        /// The offending rule name.
        rule: String,
    },

    /// A rule declares no pattern variables.
    #[error("rule {rule} declares no pattern variables")]
    NoVariables {
        /// The offending rule name.
        rule: String,
    },

    /// A rule declares the same pattern variable twice.
    #[error("duplicate pattern variable: {variable}")]
    DuplicateVariable {
        /// The duplicated variable name.
        variable: String,
    },

    /// A condition references a pattern variable the rule does not
    /// declare.
    #[error("unknown pattern variable: {variable}")]
    UnknownVariable {
        /// The unresolved variable name.
        variable: String,
    },

    /// An attribute name does not exist on a fact type.
    #[error("unknown attribute: {attribute} on {fact_type}")]
    UnknownAttribute {
        /// The fact type that was consulted.
        fact_type: String,
        /// The attribute name that was not found.
        attribute: String,
    },

    /// A fact type declares the same attribute twice.
    #[error("duplicate attribute: {attribute} on {fact_type}")]
    DuplicateAttribute {
        /// The fact type being defined.
        fact_type: String,
        /// The duplicated attribute name.
        attribute: String,
    },

    /// Two operand types can never be compared by the requested operator.
    #[error("operand types are not comparable: {lhs} vs {rhs}")]
    Incomparable {
        /// Declared type of the left operand.
        lhs: Type,
        /// Declared type of the right operand.
        rhs: Type,
    },

    /// A condition string failed to parse.
    #[error("condition parse error at offset {offset}: {message}")]
    ConditionParse {
        /// Description of the parse error.
        message: String,
        /// Byte offset into the condition text.
        offset: usize,
    },

    // -------------------------------------------------------------------
    // Evaluation errors
    // -------------------------------------------------------------------
    /// A comparison or mutation touched an absent (nil) attribute.
    #[error("attribute {attribute} is absent")]
    AbsentAttribute {
        /// The absent attribute's name.
        attribute: String,
    },

    /// Two runtime values could not be compared.
    #[error("values are not comparable: {lhs} vs {rhs}")]
    IncomparableValues {
        /// Runtime type of the left value.
        lhs: Type,
        /// Runtime type of the right value.
        rhs: Type,
    },

    /// A value's type does not match what the schema requires.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// An action tried to write an attribute not declared mutable.
    #[error("attribute {attribute} is not mutable")]
    ImmutableAttribute {
        /// The attribute that was written.
        attribute: String,
    },

    /// An action looked up a variable not bound in its match.
    #[error("variable {variable} is not bound in this match")]
    UnboundVariable {
        /// The variable name the action asked for.
        variable: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns true if this kind belongs to the definition category.
    #[must_use]
    pub const fn is_definition(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRule { .. }
                | Self::NoVariables { .. }
                | Self::DuplicateVariable { .. }
                | Self::UnknownVariable { .. }
                | Self::UnknownAttribute { .. }
                | Self::DuplicateAttribute { .. }
                | Self::Incomparable { .. }
                | Self::ConditionParse { .. }
        )
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the rule being constructed or fired.
    pub rule: Option<String>,
    /// The condition text involved, if any.
    pub condition: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rule name.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Sets the condition text.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "in rule {rule}")?;
        }
        if let Some(condition) = &self.condition {
            if self.rule.is_some() {
                write!(f, ", ")?;
            }
            write!(f, "condition `{condition}`")?;
        }
        Ok(())
    }
}
