//! Fluent rule set construction.
//!
//! The builder mirrors how rule sets read: name the set, then for each
//! rule name it, bind its variables, state its conditions, and give it
//! an action.
//!
//! ```
//! # use std::sync::Arc;
//! # use millrace_facts::{AttributeSchema, FactType};
//! # use millrace_foundation::{Type, Value};
//! # use millrace_runtime::RuleSetBuilder;
//! # let diagnosis = Arc::new(
//! #     FactType::new("Diagnosis")
//! #         .with_attribute(AttributeSchema::readonly("patient", Type::FactRef)).unwrap()
//! #         .with_attribute(AttributeSchema::mutable("hasFever", Type::Bool)).unwrap(),
//! # );
//! # let report = Arc::new(
//! #     FactType::new("Report")
//! #         .with_attribute(AttributeSchema::readonly("patient", Type::FactRef)).unwrap()
//! #         .with_attribute(AttributeSchema::readonly("temperature", Type::Int)).unwrap(),
//! # );
//! let rule_set = RuleSetBuilder::new("Disease Rule Set")
//!     .new_rule("Fever Rule")
//!     .for_each("$d", &diagnosis)
//!     .for_each("$r", &report)
//!     .when("$d.patient == $r.patient")
//!     .when("$r.temperature >= 100")
//!     .execute(|ctx| ctx.get("$d")?.set("hasFever", Value::Bool(true)))
//!     .build()?;
//! # Ok::<(), millrace_foundation::Error>(())
//! ```
//!
//! Validation is deferred to [`RuleSetBuilder::build`] and is atomic: a
//! definition error in any rule means no rule set at all.

use std::sync::Arc;

use millrace_engine::{Action, ConflictResolution, MatchContext, PatternVariable, Rule, RuleSet};
use millrace_facts::FactType;
use millrace_foundation::Result;

/// Fluent builder for a [`RuleSet`].
pub struct RuleSetBuilder {
    name: Arc<str>,
    resolution: ConflictResolution,
    pending: Vec<PendingRule>,
}

struct PendingRule {
    name: Arc<str>,
    variables: Vec<PatternVariable>,
    conditions: Vec<String>,
    action: Action,
}

impl RuleSetBuilder {
    /// Starts a rule set with the default conflict resolution (ascending
    /// lexicographic by rule name).
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            resolution: ConflictResolution::ByName,
            pending: Vec::new(),
        }
    }

    /// Sets the conflict-resolution strategy.
    #[must_use]
    pub fn with_resolution(mut self, resolution: ConflictResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Starts a new rule. Finish it with [`RuleBuilder::execute`].
    #[must_use]
    pub fn new_rule(self, name: impl Into<Arc<str>>) -> RuleBuilder {
        RuleBuilder {
            set: self,
            name: name.into(),
            variables: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Validates every rule and builds the set.
    ///
    /// # Errors
    /// Returns the first definition error: a rule without variables, a
    /// duplicate rule or variable name, or a condition that fails to
    /// parse or resolve.
    pub fn build(self) -> Result<RuleSet> {
        let mut rules = Vec::with_capacity(self.pending.len());
        for pending in self.pending {
            rules.push(Rule::new(
                pending.name,
                pending.variables,
                &pending.conditions,
                pending.action,
            )?);
        }
        RuleSet::new(self.name, rules, self.resolution)
    }
}

/// Builder for a single rule within a [`RuleSetBuilder`] chain.
pub struct RuleBuilder {
    set: RuleSetBuilder,
    name: Arc<str>,
    variables: Vec<PatternVariable>,
    conditions: Vec<String>,
}

impl RuleBuilder {
    /// Binds a pattern variable to a fact type. Call once per variable,
    /// in the declaration order matching should nest in.
    #[must_use]
    pub fn for_each(mut self, variable: impl Into<Arc<str>>, fact_type: &Arc<FactType>) -> Self {
        self.variables
            .push(PatternVariable::new(variable, Arc::clone(fact_type)));
        self
    }

    /// Adds a condition. Conditions accumulate as a conjunction.
    #[must_use]
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Finishes the rule with its action and returns the set builder
    /// for chaining.
    #[must_use]
    pub fn execute<F>(self, action: F) -> RuleSetBuilder
    where
        F: Fn(&MatchContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let mut set = self.set;
        set.pending.push(PendingRule {
            name: self.name,
            variables: self.variables,
            conditions: self.conditions,
            action: Arc::new(action),
        });
        set
    }
}
