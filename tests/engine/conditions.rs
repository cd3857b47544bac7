//! Integration tests for condition compilation and definition errors.

use std::sync::Arc;

use millrace_engine::{Action, PatternVariable, Rule};
use millrace_facts::{AttributeSchema, FactType};
use millrace_foundation::{ErrorKind, Type};

fn report_type() -> Arc<FactType> {
    Arc::new(
        FactType::new("Report")
            .with_attribute(AttributeSchema::readonly("patient", Type::FactRef))
            .unwrap()
            .with_attribute(AttributeSchema::readonly("temperature", Type::Int))
            .unwrap()
            .with_attribute(AttributeSchema::readonly("hasCough", Type::Bool))
            .unwrap(),
    )
}

fn diagnosis_type() -> Arc<FactType> {
    Arc::new(
        FactType::new("Diagnosis")
            .with_attribute(AttributeSchema::readonly("patient", Type::FactRef))
            .unwrap()
            .with_attribute(AttributeSchema::mutable("hasFever", Type::Bool))
            .unwrap(),
    )
}

fn noop() -> Action {
    Arc::new(|_| Ok(()))
}

fn try_rule(conditions: &[&str]) -> Result<Rule, millrace_foundation::Error> {
    Rule::new(
        "under test",
        vec![
            PatternVariable::new("$d", diagnosis_type()),
            PatternVariable::new("$r", report_type()),
        ],
        conditions,
        noop(),
    )
}

#[test]
fn accepts_the_reference_conditions() {
    // The condition shapes the disease rule set uses.
    for condition in [
        "$d.patient == $r.patient && $r.temperature >= 100",
        "$d.patient == $r.patient && $r.temperature < 100",
        "$d.patient == $r.patient && $r.hasCough == true",
        "$d.patient == $r.patient && $r.hasCough == false",
    ] {
        let rule = try_rule(&[condition]).unwrap();
        assert_eq!(rule.predicate().clauses().len(), 2, "{condition}");
    }
}

#[test]
fn conditions_compile_once_at_construction() {
    // A malformed condition never reaches matching: it fails the build.
    let err = try_rule(&["$r.temperature >="]).unwrap_err();
    assert!(err.is_definition());
    assert!(matches!(err.kind, ErrorKind::ConditionParse { .. }));
}

#[test]
fn undeclared_variables_fail_the_build() {
    let err = try_rule(&["$p.temperature >= 100"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownVariable { .. }));
}

#[test]
fn unknown_attributes_fail_the_build() {
    let err = try_rule(&["$r.pulse >= 100"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownAttribute { .. }));
}

#[test]
fn untypeable_comparisons_fail_the_build() {
    // A fact reference has no ordering.
    let err = try_rule(&["$d.patient < $r.patient"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Incomparable { .. }));

    // A boolean cannot be compared to an integer.
    let err = try_rule(&["$r.hasCough == 0"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Incomparable { .. }));
}

#[test]
fn definition_errors_name_the_rule() {
    let err = try_rule(&["$r.pulse >= 100"]).unwrap_err();
    let context = err.context.expect("context attached");
    assert_eq!(context.rule.as_deref(), Some("under test"));
}

#[test]
fn separate_conditions_and_conjoined_text_are_equivalent() {
    let split = try_rule(&["$d.patient == $r.patient", "$r.temperature >= 100"]).unwrap();
    let joined = try_rule(&["$d.patient == $r.patient && $r.temperature >= 100"]).unwrap();

    assert_eq!(
        split.predicate().clauses().len(),
        joined.predicate().clauses().len()
    );
}
