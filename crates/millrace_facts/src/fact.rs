//! Caller-owned fact handles.
//!
//! A [`Fact`] is a cheaply-cloned handle to a typed, identity-bearing
//! attribute record. The engine never creates or destroys facts; it only
//! reads attributes during matching and writes them through rule
//! actions. All clones of a handle observe the same live state, so a
//! caller that retains a handle sees every mutation a firing pass
//! applied.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use millrace_foundation::{Error, FactId, Result, Value};

use crate::schema::FactType;

/// A typed, mutable, identity-bearing fact.
///
/// Handle equality is identity equality: two handles are equal exactly
/// when they designate the same fact, regardless of attribute values.
#[derive(Clone)]
pub struct Fact {
    inner: Arc<FactInner>,
}

struct FactInner {
    id: FactId,
    fact_type: Arc<FactType>,
    slots: RwLock<Vec<Value>>,
}

impl Fact {
    /// Starts building a fact of the given type.
    #[must_use]
    pub fn builder(fact_type: &Arc<FactType>) -> FactBuilder {
        FactBuilder {
            fact_type: Arc::clone(fact_type),
            values: Vec::new(),
        }
    }

    /// Returns this fact's stable identity.
    #[must_use]
    pub fn id(&self) -> FactId {
        self.inner.id
    }

    /// Returns this fact's type.
    #[must_use]
    pub fn fact_type(&self) -> &Arc<FactType> {
        &self.inner.fact_type
    }

    /// Returns this fact's type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.inner.fact_type.name()
    }

    /// Returns a reference value designating this fact, for storing in
    /// another fact's attribute.
    #[must_use]
    pub fn as_value(&self) -> Value {
        Value::FactRef(self.inner.id)
    }

    /// Reads an attribute by name.
    ///
    /// An attribute that was never set (and has no default) reads as
    /// [`Value::Nil`].
    ///
    /// # Errors
    /// Returns an error if the attribute is not declared on this fact's
    /// type.
    pub fn get(&self, attribute: &str) -> Result<Value> {
        let slot = self.resolve(attribute)?;
        Ok(self.read_slots()[slot].clone())
    }

    /// Writes an attribute by name.
    ///
    /// # Errors
    /// Returns an error if the attribute is not declared, is not
    /// mutable, or the value does not fit the declared type.
    pub fn set(&self, attribute: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let slot = self.resolve(attribute)?;
        let schema = &self.inner.fact_type.attributes()[slot];
        if !schema.is_mutable() {
            return Err(Error::immutable_attribute(attribute));
        }
        let actual = value.value_type();
        if !schema.ty().accepts(&actual) {
            return Err(Error::type_mismatch(schema.ty().clone(), actual));
        }
        self.write_slots()[slot] = value;
        Ok(())
    }

    /// Reads the value in the given slot, as resolved by this fact's
    /// type. Used by compiled predicate expressions.
    #[must_use]
    pub fn value_at(&self, slot: usize) -> Option<Value> {
        self.read_slots().get(slot).cloned()
    }

    fn resolve(&self, attribute: &str) -> Result<usize> {
        self.inner.fact_type.slot(attribute).ok_or_else(|| {
            Error::unknown_attribute(self.type_name(), attribute)
        })
    }

    // A poisoned lock means a panic elsewhere while holding the guard;
    // the slot vector itself is still structurally valid.
    fn read_slots(&self) -> RwLockReadGuard<'_, Vec<Value>> {
        self.inner
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_slots(&self) -> RwLockWriteGuard<'_, Vec<Value>> {
        self.inner
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl PartialEq for Fact {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Fact {}

impl Hash for Fact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fact({}, {})", self.type_name(), self.inner.id)
    }
}

/// Builder for a [`Fact`], validating attributes against the schema.
pub struct FactBuilder {
    fact_type: Arc<FactType>,
    values: Vec<(String, Value)>,
}

impl FactBuilder {
    /// Sets an attribute's initial value.
    ///
    /// Initialization may set read-only attributes; mutability only
    /// restricts writes after construction.
    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((attribute.into(), value.into()));
        self
    }

    /// Builds the fact, allocating a fresh identity.
    ///
    /// Attributes not given a value take their declared default, or nil
    /// when the schema declares none.
    ///
    /// # Errors
    /// Returns an error if a set attribute is not declared on the type,
    /// or a value does not fit its declared type.
    pub fn build(self) -> Result<Fact> {
        let mut slots: Vec<Value> = self
            .fact_type
            .attributes()
            .iter()
            .map(|a| a.default().cloned().unwrap_or(Value::Nil))
            .collect();

        for (name, value) in self.values {
            let slot = self.fact_type.slot(&name).ok_or_else(|| {
                Error::unknown_attribute(self.fact_type.name(), name.as_str())
            })?;
            let schema = &self.fact_type.attributes()[slot];
            let actual = value.value_type();
            if !schema.ty().accepts(&actual) {
                return Err(Error::type_mismatch(schema.ty().clone(), actual));
            }
            slots[slot] = value;
        }

        Ok(Fact {
            inner: Arc::new(FactInner {
                id: FactId::next(),
                fact_type: self.fact_type,
                slots: RwLock::new(slots),
            }),
        })
    }
}
