//! The immutable rule model.
//!
//! A rule is a name, an ordered list of pattern variables (each bound to
//! one fact type), a predicate compiled from its condition text, and an
//! action closure. A rule set owns its rules and a conflict-resolution
//! strategy; construction validates everything up front, so a rule set
//! that exists is a rule set that can fire.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use millrace_facts::{Fact, FactType};
use millrace_foundation::{Error, ErrorContext, Result};

use crate::agenda::ConflictResolution;
use crate::condition;
use crate::expr::Predicate;

// =============================================================================
// Pattern Variables
// =============================================================================

/// A named binding slot in a rule, bound to exactly one fact type.
///
/// Several variables in one rule may bind to the same type; each then
/// ranges independently over that type's facts.
#[derive(Clone, Debug)]
pub struct PatternVariable {
    name: Arc<str>,
    fact_type: Arc<FactType>,
}

impl PatternVariable {
    /// Creates a pattern variable. By convention names carry a `$`
    /// prefix (`$d`, `$r`), matching how conditions reference them.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, fact_type: Arc<FactType>) -> Self {
        Self {
            name: name.into(),
            fact_type,
        }
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fact type this variable binds to.
    #[must_use]
    pub fn fact_type(&self) -> &Arc<FactType> {
        &self.fact_type
    }
}

// =============================================================================
// Match Context
// =============================================================================

/// The bound variables of one match, handed to a rule's action.
pub struct MatchContext<'a> {
    variables: &'a [PatternVariable],
    tuple: &'a [Fact],
}

impl<'a> MatchContext<'a> {
    /// Creates a context over a bound tuple. The tuple is in the rule's
    /// variable declaration order.
    #[must_use]
    pub fn new(variables: &'a [PatternVariable], tuple: &'a [Fact]) -> Self {
        Self { variables, tuple }
    }

    /// Returns the fact bound to a variable.
    ///
    /// # Errors
    /// Returns an evaluation error if the variable is not bound in this
    /// match.
    pub fn get(&self, variable: &str) -> Result<Fact> {
        self.variables
            .iter()
            .position(|v| v.name() == variable)
            .and_then(|position| self.tuple.get(position).cloned())
            .ok_or_else(|| Error::unbound_variable(variable))
    }

    /// Returns the bound facts in variable declaration order.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        self.tuple
    }
}

// =============================================================================
// Rules
// =============================================================================

/// An action: a closure over the bound variables that mutates matched
/// facts in place. Actions must not insert or remove facts.
pub type Action = Arc<dyn Fn(&MatchContext<'_>) -> Result<()> + Send + Sync>;

/// An immutable production rule.
#[derive(Clone)]
pub struct Rule {
    name: Arc<str>,
    variables: Vec<PatternVariable>,
    predicate: Predicate,
    action: Action,
}

impl Rule {
    /// Constructs a rule, compiling and resolving its condition text.
    ///
    /// # Errors
    /// Returns a definition error if the rule declares no variables,
    /// declares a variable twice, or any condition fails to parse or
    /// resolve against the declared variables.
    pub fn new(
        name: impl Into<Arc<str>>,
        variables: Vec<PatternVariable>,
        conditions: &[impl AsRef<str>],
        action: Action,
    ) -> Result<Self> {
        let name = name.into();

        if variables.is_empty() {
            return Err(Error::no_variables(name.as_ref()));
        }
        let mut seen = HashSet::new();
        for variable in &variables {
            if !seen.insert(variable.name()) {
                return Err(Error::duplicate_variable(variable.name())
                    .with_context(ErrorContext::new().with_rule(name.as_ref())));
            }
        }

        let mut asts = Vec::with_capacity(conditions.len());
        for text in conditions {
            let text = text.as_ref();
            let ast = condition::parse(text).map_err(|e| {
                e.with_context(
                    ErrorContext::new()
                        .with_rule(name.as_ref())
                        .with_condition(text),
                )
            })?;
            asts.push(ast);
        }

        let predicate = Predicate::resolve(&asts, &variables)
            .map_err(|e| e.with_context(ErrorContext::new().with_rule(name.as_ref())))?;

        Ok(Self {
            name,
            variables,
            predicate,
            action,
        })
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the pattern variables in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[PatternVariable] {
        &self.variables
    }

    /// Returns the compiled predicate.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub(crate) fn action(&self) -> &Action {
        &self.action
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field(
                "variables",
                &self.variables.iter().map(PatternVariable::name).collect::<Vec<_>>(),
            )
            .field("clauses", &self.predicate.clauses().len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Rule Sets
// =============================================================================

/// An ordered collection of rules plus a conflict-resolution strategy.
#[derive(Clone, Debug)]
pub struct RuleSet {
    name: Arc<str>,
    rules: Vec<Rule>,
    resolution: ConflictResolution,
}

impl RuleSet {
    /// Constructs a rule set from already-built rules.
    ///
    /// Construction is atomic: any definition error leaves no usable
    /// rule set behind.
    ///
    /// # Errors
    /// Returns a definition error if two rules share a name.
    pub fn new(
        name: impl Into<Arc<str>>,
        rules: Vec<Rule>,
        resolution: ConflictResolution,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name()) {
                return Err(Error::duplicate_rule(rule.name()));
            }
        }
        Ok(Self {
            name: name.into(),
            rules,
            resolution,
        })
    }

    /// Returns the rule set name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the conflict-resolution strategy.
    #[must_use]
    pub fn resolution(&self) -> &ConflictResolution {
        &self.resolution
    }
}

// =============================================================================
// Tests
// =============================================================================
