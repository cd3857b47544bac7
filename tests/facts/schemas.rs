//! Integration tests for fact schemas and fact handles.

use std::sync::Arc;

use millrace_facts::{AttributeSchema, Fact, FactType};
use millrace_foundation::{Type, Value};

fn patient_type() -> Arc<FactType> {
    Arc::new(
        FactType::new("Patient")
            .with_attribute(AttributeSchema::readonly("name", Type::String))
            .unwrap(),
    )
}

fn report_type() -> Arc<FactType> {
    Arc::new(
        FactType::new("Report")
            .with_attribute(AttributeSchema::readonly("patient", Type::FactRef))
            .unwrap()
            .with_attribute(AttributeSchema::readonly("temperature", Type::Int))
            .unwrap()
            .with_attribute(
                AttributeSchema::readonly("hasCough", Type::Bool).with_default(Value::Bool(false)),
            )
            .unwrap(),
    )
}

#[test]
fn facts_link_by_reference() {
    let patient = Fact::builder(&patient_type())
        .with("name", "patient-0")
        .build()
        .unwrap();
    let report = Fact::builder(&report_type())
        .with("patient", patient.as_value())
        .with("temperature", 100)
        .build()
        .unwrap();

    assert_eq!(report.get("patient").unwrap(), Value::FactRef(patient.id()));
}

#[test]
fn defaults_fill_omitted_attributes() {
    let report = Fact::builder(&report_type())
        .with("temperature", 97)
        .build()
        .unwrap();

    assert_eq!(report.get("hasCough").unwrap(), Value::Bool(false));
    // No default declared: reads as nil.
    assert!(report.get("patient").unwrap().is_nil());
}

#[test]
fn identity_survives_mutation() {
    let diagnosis_type = Arc::new(
        FactType::new("Diagnosis")
            .with_attribute(AttributeSchema::mutable("hasFever", Type::Bool))
            .unwrap(),
    );
    let diagnosis = Fact::builder(&diagnosis_type).build().unwrap();
    let id = diagnosis.id();

    diagnosis.set("hasFever", Value::Bool(true)).unwrap();
    assert_eq!(diagnosis.id(), id);
    diagnosis.set("hasFever", Value::Bool(false)).unwrap();
    assert_eq!(diagnosis.id(), id);
}

#[test]
fn schema_violations_surface_as_errors() {
    let report_type = report_type();

    // Unknown attribute at construction.
    assert!(Fact::builder(&report_type).with("pulse", 70).build().is_err());

    // Wrong type at construction.
    assert!(
        Fact::builder(&report_type)
            .with("temperature", "hot")
            .build()
            .is_err()
    );

    // Readonly attribute after construction.
    let report = Fact::builder(&report_type)
        .with("temperature", 99)
        .build()
        .unwrap();
    assert!(report.set("temperature", Value::Int(100)).is_err());
}

#[test]
fn same_name_attributes_live_in_distinct_types() {
    // Both types declare `patient`; the slots are independent.
    let report = Fact::builder(&report_type()).build().unwrap();
    let other_type = Arc::new(
        FactType::new("Visit")
            .with_attribute(AttributeSchema::readonly("room", Type::Int))
            .unwrap()
            .with_attribute(AttributeSchema::readonly("patient", Type::FactRef))
            .unwrap(),
    );
    let visit = Fact::builder(&other_type).with("room", 12).build().unwrap();

    assert_eq!(report.fact_type().slot("patient"), Some(0));
    assert_eq!(visit.fact_type().slot("patient"), Some(1));
    assert_eq!(visit.get("room").unwrap(), Value::Int(12));
}
