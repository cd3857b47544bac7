//! Integration tests for the firing pass: sequencing, the firing log,
//! and abort behavior.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use millrace_engine::{
    ConflictResolution, FiringPass, PatternVariable, Rule, RuleSet,
};
use millrace_facts::{AttributeSchema, Fact, FactType, WorkingMemory};
use millrace_foundation::{Type, Value};

fn gauge_type() -> Arc<FactType> {
    Arc::new(
        FactType::new("Gauge")
            .with_attribute(AttributeSchema::mutable("n", Type::Int).with_default(Value::Int(0)))
            .unwrap(),
    )
}

#[test]
fn a_pass_visits_every_rule_once_in_name_order() {
    let ty = gauge_type();
    let gauge = Fact::builder(&ty).build().unwrap();
    let mut memory = WorkingMemory::new();
    memory.insert(gauge.clone());

    // Each rule appends a digit by arithmetic: the final value spells
    // the firing order.
    let appender = |digit: i64| -> millrace_engine::Action {
        Arc::new(move |ctx| {
            let gauge = ctx.get("$g")?;
            let n = gauge.get("n")?.as_int().unwrap_or(0);
            gauge.set("n", Value::Int(n * 10 + digit))
        })
    };
    let make = |name: &str, digit: i64, ty: &Arc<FactType>| {
        Rule::new(
            name,
            vec![PatternVariable::new("$g", Arc::clone(ty))],
            &[] as &[&str],
            appender(digit),
        )
        .unwrap()
    };

    let rules = RuleSet::new(
        "ordered",
        vec![make("c", 3, &ty), make("a", 1, &ty), make("b", 2, &ty)],
        ConflictResolution::ByName,
    )
    .unwrap();

    let report = FiringPass::new().run(&rules, &memory).unwrap();
    assert_eq!(report.activations, 3);
    assert_eq!(gauge.get("n").unwrap(), Value::Int(123));
}

#[test]
fn the_firing_log_names_rules_and_facts() {
    let ty = gauge_type();
    let gauges: Vec<Fact> = (0..2).map(|_| Fact::builder(&ty).build().unwrap()).collect();
    let mut memory = WorkingMemory::new();
    memory.extend(gauges.iter().cloned());

    let rule = Rule::new(
        "observe",
        vec![PatternVariable::new("$g", ty)],
        &[] as &[&str],
        Arc::new(|_| Ok(())),
    )
    .unwrap();
    let rules = RuleSet::new("log", vec![rule], ConflictResolution::ByName).unwrap();

    let report = FiringPass::new().run(&rules, &memory).unwrap();
    assert_eq!(report.records.len(), 2);
    for (record, gauge) in report.records.iter().zip(&gauges) {
        assert_eq!(record.rule.as_ref(), "observe");
        assert_eq!(record.facts, vec![gauge.id()]);
    }
}

#[test]
fn no_rule_fires_twice_even_when_its_condition_still_holds() {
    // A rule whose action leaves its own condition satisfied fires once
    // per match, not to fixpoint.
    let ty = gauge_type();
    let gauge = Fact::builder(&ty).build().unwrap();
    let mut memory = WorkingMemory::new();
    memory.insert(gauge.clone());

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let rule = Rule::new(
        "increment",
        vec![PatternVariable::new("$g", ty)],
        &["$g.n < 100"],
        Arc::new(move |ctx| {
            counter.fetch_add(1, Ordering::Relaxed);
            let gauge = ctx.get("$g")?;
            let n = gauge.get("n")?.as_int().unwrap_or(0);
            gauge.set("n", Value::Int(n + 1))
        }),
    )
    .unwrap();
    let rules = RuleSet::new("once", vec![rule], ConflictResolution::ByName).unwrap();

    FiringPass::new().run(&rules, &memory).unwrap();
    assert_eq!(fired.load(Ordering::Relaxed), 1);
    assert_eq!(gauge.get("n").unwrap(), Value::Int(1));
}

#[test]
fn action_errors_abort_the_pass_and_keep_prior_effects() {
    let ty = gauge_type();
    let gauge = Fact::builder(&ty).build().unwrap();
    let mut memory = WorkingMemory::new();
    memory.insert(gauge.clone());

    let rules = RuleSet::new(
        "aborting",
        vec![
            Rule::new(
                "a_set",
                vec![PatternVariable::new("$g", Arc::clone(&ty))],
                &[] as &[&str],
                Arc::new(|ctx| ctx.get("$g")?.set("n", Value::Int(7))),
            )
            .unwrap(),
            Rule::new(
                "b_fail",
                vec![PatternVariable::new("$g", ty)],
                &[] as &[&str],
                // An action asking for a variable the rule never bound.
                Arc::new(|ctx| ctx.get("$missing").map(|_| ())),
            )
            .unwrap(),
        ],
        ConflictResolution::ByName,
    )
    .unwrap();

    let err = FiringPass::new().run(&rules, &memory).unwrap_err();
    assert!(err.is_evaluation());
    assert_eq!(gauge.get("n").unwrap(), Value::Int(7));
}

#[test]
fn actions_may_not_write_readonly_attributes() {
    let ty = Arc::new(
        FactType::new("Sealed")
            .with_attribute(AttributeSchema::readonly("n", Type::Int).with_default(Value::Int(1)))
            .unwrap(),
    );
    let fact = Fact::builder(&ty).build().unwrap();
    let mut memory = WorkingMemory::new();
    memory.insert(fact.clone());

    let rule = Rule::new(
        "tamper",
        vec![PatternVariable::new("$s", ty)],
        &[] as &[&str],
        Arc::new(|ctx| ctx.get("$s")?.set("n", Value::Int(2))),
    )
    .unwrap();
    let rules = RuleSet::new("sealed", vec![rule], ConflictResolution::ByName).unwrap();

    let err = FiringPass::new().run(&rules, &memory).unwrap_err();
    assert!(err.is_evaluation());
    assert_eq!(fact.get("n").unwrap(), Value::Int(1));
}
