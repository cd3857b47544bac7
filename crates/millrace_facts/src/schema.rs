//! Schema definitions for fact types.
//!
//! A fact type names its attributes and fixes their order; the position
//! of an attribute within its type is the slot that compiled predicate
//! expressions address at match time.

use std::sync::Arc;

use millrace_foundation::{Error, Result, Type, Value};

/// Schema definition for a fact type.
#[derive(Clone, Debug, PartialEq)]
pub struct FactType {
    /// Type name (e.g. `Report`, `Diagnosis`).
    name: Arc<str>,
    /// Attribute definitions, in declaration order.
    attributes: Vec<AttributeSchema>,
}

impl FactType {
    /// Creates a new fact type with no attributes.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute to the schema.
    ///
    /// # Errors
    /// Returns a definition error if the attribute name is already
    /// declared, or if the attribute's default value does not fit its
    /// declared type.
    pub fn with_attribute(mut self, attribute: AttributeSchema) -> Result<Self> {
        if self.slot(&attribute.name).is_some() {
            return Err(Error::duplicate_attribute(
                self.name.as_ref(),
                attribute.name.as_ref(),
            ));
        }
        if let Some(default) = &attribute.default {
            let actual = default.value_type();
            if !attribute.ty.accepts(&actual) {
                return Err(Error::type_mismatch(attribute.ty.clone(), actual));
            }
        }
        self.attributes.push(attribute);
        Ok(self)
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared type name.
    #[must_use]
    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    /// Returns the attribute definitions in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    /// Returns the attribute schema by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name.as_ref() == name)
    }

    /// Returns the slot index of an attribute by name.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name.as_ref() == name)
    }
}

/// Schema definition for a single fact attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSchema {
    /// Attribute name.
    name: Arc<str>,
    /// Attribute type.
    ty: Type,
    /// Default value used when construction omits the attribute.
    default: Option<Value>,
    /// Whether rule actions may write this attribute.
    mutable: bool,
}

impl AttributeSchema {
    /// Creates a read-only attribute: set once at fact construction,
    /// never written by actions.
    #[must_use]
    pub fn readonly(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            mutable: false,
        }
    }

    /// Creates a mutable attribute, writable by rule actions.
    #[must_use]
    pub fn mutable(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
            mutable: true,
        }
    }

    /// Sets the default value used when construction omits this
    /// attribute. Validated against the attribute type when the
    /// attribute is added to a [`FactType`].
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute type.
    #[must_use]
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the default value, if declared.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns true if rule actions may write this attribute.
    #[must_use]
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }
}
