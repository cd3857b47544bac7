//! Declarative, data-first rule grouping.
//!
//! The declarative front-end describes a rule set as plain data: the set
//! name, a default sort, and one declaration per rule carrying its name,
//! an optional condition, an explicit pattern-variable list, and the
//! action. It suits rule sets assembled by other code (configuration
//! layers, code generators) where the fluent chain of
//! [`crate::RuleSetBuilder`] would be awkward. Both front-ends compile
//! to the same rule model.
//!
//! Pattern variables are always declared explicitly; nothing is inferred
//! from the action's shape.

use std::sync::Arc;

use millrace_engine::{
    Action, ConflictResolution, MatchContext, PatternVariable, Rule, RuleSet,
};
use millrace_facts::FactType;
use millrace_foundation::Result;

/// Declaration of one rule.
pub struct RuleDecl {
    name: Arc<str>,
    variables: Vec<PatternVariable>,
    conditions: Vec<String>,
    action: Action,
}

impl RuleDecl {
    /// Declares a rule with its action.
    #[must_use]
    pub fn new<F>(name: impl Into<Arc<str>>, action: F) -> Self
    where
        F: Fn(&MatchContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            variables: Vec::new(),
            conditions: Vec::new(),
            action: Arc::new(action),
        }
    }

    /// Declares a pattern variable, in matching nest order.
    #[must_use]
    pub fn with_variable(
        mut self,
        variable: impl Into<Arc<str>>,
        fact_type: &Arc<FactType>,
    ) -> Self {
        self.variables
            .push(PatternVariable::new(variable, Arc::clone(fact_type)));
        self
    }

    /// Adds a condition. Conditions accumulate as a conjunction, so one
    /// `&&`-joined string and several separate conditions read the same.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }
}

/// Declaration of a rule set.
pub struct RuleSetDecl {
    name: Arc<str>,
    resolution: ConflictResolution,
    rules: Vec<RuleDecl>,
}

impl RuleSetDecl {
    /// Declares a rule set with the default sort (ascending
    /// lexicographic by rule name).
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            resolution: ConflictResolution::ByName,
            rules: Vec::new(),
        }
    }

    /// Sets the default sort for the set.
    #[must_use]
    pub fn with_resolution(mut self, resolution: ConflictResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Adds a rule declaration.
    #[must_use]
    pub fn with_rule(mut self, rule: RuleDecl) -> Self {
        self.rules.push(rule);
        self
    }

    /// Compiles every declaration into the engine rule model.
    ///
    /// Compilation is atomic: a definition error in any declaration
    /// means no rule set at all.
    ///
    /// # Errors
    /// Returns the first definition error encountered.
    pub fn compile(self) -> Result<RuleSet> {
        let mut rules = Vec::with_capacity(self.rules.len());
        for decl in self.rules {
            rules.push(Rule::new(
                decl.name,
                decl.variables,
                &decl.conditions,
                decl.action,
            )?);
        }
        RuleSet::new(self.name, rules, self.resolution)
    }
}
