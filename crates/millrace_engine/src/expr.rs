//! Typed predicate expressions.
//!
//! A parsed condition AST is resolved against a rule's declared pattern
//! variables into an expression tree that addresses variables by
//! declaration position and attributes by slot. Resolution happens once,
//! at rule set construction, and performs the definition-time checks:
//! unknown variables, unknown attributes, and operand types no operator
//! can compare. Evaluation reads live fact state per tuple; comparing an
//! absent attribute or dynamically incompatible values is an evaluation
//! error, never a silent false.

use std::cmp::Ordering;
use std::sync::Arc;

use millrace_facts::Fact;
use millrace_foundation::{Error, Result, Type, Value};

use crate::condition::{CompareOp, Comparison, ConditionAst, Operand};
use crate::rule::PatternVariable;

// =============================================================================
// Expressions
// =============================================================================

/// A resolved operand expression.
#[derive(Clone, Debug)]
pub enum Expr {
    /// A literal value.
    Literal(Value),
    /// An attribute read, addressed by variable position and attribute
    /// slot.
    Attribute {
        /// Position of the pattern variable in the rule's declaration
        /// order.
        variable: usize,
        /// Attribute slot within the variable's fact type.
        slot: usize,
        /// Attribute name, kept for diagnostics.
        name: Arc<str>,
    },
}

impl Expr {
    /// Returns the declared type of this expression.
    fn static_type(&self, variables: &[PatternVariable]) -> Type {
        match self {
            Self::Literal(v) => v.value_type(),
            Self::Attribute { variable, slot, .. } => variables[*variable]
                .fact_type()
                .attributes()[*slot]
                .ty()
                .clone(),
        }
    }

    /// Evaluates this expression against a bound tuple.
    fn eval(&self, tuple: &[Fact]) -> Result<Value> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::Attribute {
                variable, slot, ..
            } => {
                let fact = tuple.get(*variable).ok_or_else(|| {
                    Error::internal(format!("tuple has no binding at position {variable}"))
                })?;
                Self::read_slot(fact, *slot)
            }
        }
    }

    /// Evaluates this expression against a single fact, disregarding the
    /// variable position. The caller guarantees the expression only
    /// references the variable the fact is bound to (used for join-key
    /// extraction).
    pub(crate) fn eval_for(&self, fact: &Fact) -> Result<Value> {
        match self {
            Self::Literal(v) => Ok(v.clone()),
            Self::Attribute { slot, .. } => Self::read_slot(fact, *slot),
        }
    }

    fn read_slot(fact: &Fact, slot: usize) -> Result<Value> {
        fact.value_at(slot).ok_or_else(|| {
            Error::internal(format!(
                "slot {slot} out of range on {}",
                fact.type_name()
            ))
        })
    }

    /// Returns the attribute name if this is an attribute read.
    pub(crate) fn attribute_name(&self) -> Option<&str> {
        match self {
            Self::Attribute { name, .. } => Some(name),
            Self::Literal(_) => None,
        }
    }
}

// =============================================================================
// Clauses
// =============================================================================

/// One resolved comparison clause.
#[derive(Clone, Debug)]
pub struct Clause {
    /// Comparison operator.
    pub op: CompareOp,
    /// Left operand.
    pub lhs: Expr,
    /// Right operand.
    pub rhs: Expr,
}

impl Clause {
    /// Evaluates this clause against a bound tuple.
    fn eval(&self, tuple: &[Fact]) -> Result<bool> {
        let lhs = self.lhs.eval(tuple)?;
        let rhs = self.rhs.eval(tuple)?;

        // Literals cannot be nil (the grammar has no nil literal), so an
        // absent operand always names an attribute.
        if lhs.is_nil() {
            return Err(absent(&self.lhs));
        }
        if rhs.is_nil() {
            return Err(absent(&self.rhs));
        }

        compare(self.op, &lhs, &rhs)
    }
}

fn absent(expr: &Expr) -> Error {
    Error::absent_attribute(expr.attribute_name().unwrap_or("<literal>"))
}

/// Compares two runtime values under an operator.
///
/// # Errors
/// Returns an evaluation error when the operator is undefined for the
/// value pair.
fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool> {
    match op {
        CompareOp::Eq => equality(lhs, rhs),
        CompareOp::Ne => equality(lhs, rhs).map(|eq| !eq),
        CompareOp::Lt => ordering(lhs, rhs).map(|ord| ord == Ordering::Less),
        CompareOp::Le => ordering(lhs, rhs).map(|ord| ord != Ordering::Greater),
        CompareOp::Gt => ordering(lhs, rhs).map(|ord| ord == Ordering::Greater),
        CompareOp::Ge => ordering(lhs, rhs).map(|ord| ord != Ordering::Less),
    }
}

fn equality(lhs: &Value, rhs: &Value) -> Result<bool> {
    match (lhs, rhs) {
        // Numeric cross comparison: 100 == 100.0
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            Ok(lhs.partial_cmp(rhs) == Some(Ordering::Equal))
        }
        (Value::Bool(_), Value::Bool(_))
        | (Value::String(_), Value::String(_))
        | (Value::FactRef(_), Value::FactRef(_))
        | (Value::Vec(_), Value::Vec(_))
        | (Value::Map(_), Value::Map(_)) => Ok(lhs == rhs),
        _ => Err(Error::incomparable_values(
            lhs.value_type(),
            rhs.value_type(),
        )),
    }
}

fn ordering(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    let ord = match (lhs, rhs) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_))
        | (Value::String(_), Value::String(_)) => lhs.partial_cmp(rhs),
        _ => None,
    };
    // NaN operands order against nothing and land here as well.
    ord.ok_or_else(|| Error::incomparable_values(lhs.value_type(), rhs.value_type()))
}

// =============================================================================
// Predicates
// =============================================================================

/// A fully resolved predicate: the conjunction of a rule's comparison
/// clauses. An empty predicate matches every tuple.
#[derive(Clone, Debug, Default)]
pub struct Predicate {
    clauses: Vec<Clause>,
    join: Option<EqualityJoin>,
}

/// An equality clause joining two distinct variables, usable as an index
/// key at match time.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EqualityJoin {
    /// Index of the join clause within the predicate.
    pub clause: usize,
    /// Variable position the left operand reads.
    pub lhs_variable: usize,
    /// Variable position the right operand reads.
    pub rhs_variable: usize,
}

impl Predicate {
    /// Creates an empty predicate (matches everything).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolves parsed conditions against the declared pattern
    /// variables.
    ///
    /// # Errors
    /// Returns a definition error for an unknown variable, an unknown
    /// attribute, or operand types the operator can never compare.
    pub fn resolve(
        conditions: &[ConditionAst],
        variables: &[PatternVariable],
    ) -> Result<Self> {
        let mut clauses = Vec::new();
        for condition in conditions {
            for comparison in &condition.comparisons {
                clauses.push(resolve_comparison(comparison, variables)?);
            }
        }
        let join = find_equality_join(&clauses, variables);
        Ok(Self { clauses, join })
    }

    /// Returns the resolved clauses.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Returns true if this predicate has no clauses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluates the conjunction against a bound tuple.
    ///
    /// # Errors
    /// Returns an evaluation error if any clause touches an absent
    /// attribute or compares incompatible values.
    pub fn matches(&self, tuple: &[Fact]) -> Result<bool> {
        for clause in &self.clauses {
            if !clause.eval(tuple)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns the clause usable as a hash-join index, if any. Computed
    /// once at resolution.
    pub(crate) fn equality_join(&self) -> Option<EqualityJoin> {
        self.join
    }
}

/// Finds the first equality clause relating two distinct variables whose
/// key types hash consistently with join equality.
///
/// Float keys are excluded: the numeric cross comparison (`100 ==
/// 100.0`) that equality uses does not agree with hashing, and a hash
/// bucket probe would miss pairs the nested-loop contract requires.
fn find_equality_join(
    clauses: &[Clause],
    variables: &[PatternVariable],
) -> Option<EqualityJoin> {
    clauses.iter().enumerate().find_map(|(index, clause)| {
        if clause.op != CompareOp::Eq {
            return None;
        }
        let (Expr::Attribute { variable: a, .. }, Expr::Attribute { variable: b, .. }) =
            (&clause.lhs, &clause.rhs)
        else {
            return None;
        };
        if a == b {
            return None;
        }
        let lhs_type = clause.lhs.static_type(variables);
        let rhs_type = clause.rhs.static_type(variables);
        let (lhs_type, rhs_type) = (lhs_type.unwrapped(), rhs_type.unwrapped());
        let indexable = lhs_type == rhs_type
            && matches!(
                lhs_type,
                Type::Int | Type::Bool | Type::String | Type::FactRef
            );
        indexable.then_some(EqualityJoin {
            clause: index,
            lhs_variable: *a,
            rhs_variable: *b,
        })
    })
}

fn resolve_comparison(
    comparison: &Comparison,
    variables: &[PatternVariable],
) -> Result<Clause> {
    let lhs = resolve_operand(&comparison.lhs, variables)?;
    let rhs = resolve_operand(&comparison.rhs, variables)?;

    let lhs_type = lhs.static_type(variables);
    let rhs_type = rhs.static_type(variables);
    let comparable = if comparison.op.is_relational() {
        lhs_type.ord_comparable(&rhs_type)
    } else {
        lhs_type.eq_comparable(&rhs_type)
    };
    if !comparable {
        return Err(Error::incomparable(lhs_type, rhs_type));
    }

    Ok(Clause {
        op: comparison.op,
        lhs,
        rhs,
    })
}

fn resolve_operand(operand: &Operand, variables: &[PatternVariable]) -> Result<Expr> {
    match operand {
        Operand::Literal(value) => Ok(Expr::Literal(value.clone())),
        Operand::Field {
            variable,
            attribute,
        } => {
            let position = variables
                .iter()
                .position(|v| v.name() == variable)
                .ok_or_else(|| Error::unknown_variable(variable.as_str()))?;
            let fact_type = variables[position].fact_type();
            let slot = fact_type.slot(attribute).ok_or_else(|| {
                Error::unknown_attribute(fact_type.name(), attribute.as_str())
            })?;
            Ok(Expr::Attribute {
                variable: position,
                slot,
                name: attribute.as_str().into(),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
