//! The disease classification scenarios.

use millrace_engine::ConflictResolution;
use millrace_facts::Fact;
use millrace_runtime::StatelessSession;

use crate::fixtures::{DiseaseFixture, flags};

/// Builds one report and one diagnosis per patient, fires, and returns
/// the diagnoses.
fn run_ward(
    fixture: &DiseaseFixture,
    session: &StatelessSession,
    reports: &[(i64, bool)],
) -> Vec<Fact> {
    let mut batch = Vec::new();
    let mut diagnoses = Vec::new();
    for (i, &(temperature, has_cough)) in reports.iter().enumerate() {
        let patient = fixture.patient(&format!("patient-{i}"));
        let report = fixture.report(&patient, temperature, has_cough);
        let diagnosis = fixture.diagnosis(&patient);
        batch.push(report);
        diagnoses.push(diagnosis);
    }
    batch.extend(diagnoses.iter().cloned());

    session.fire(batch).unwrap();
    diagnoses
}

#[test]
fn should_report_all_fever_no_cough() {
    let fixture = DiseaseFixture::new();
    let session = StatelessSession::new(fixture.rules());

    let diagnoses = run_ward(&fixture, &session, &[(100, false); 10]);
    for diagnosis in &diagnoses {
        assert_eq!(flags(diagnosis), (true, false));
    }
}

#[test]
fn should_report_all_cough_no_fever() {
    let fixture = DiseaseFixture::new();
    let session = StatelessSession::new(fixture.rules());

    let diagnoses = run_ward(&fixture, &session, &[(97, true); 10]);
    for diagnosis in &diagnoses {
        assert_eq!(flags(diagnosis), (false, true));
    }
}

#[test]
fn should_report_all_cough_all_fever() {
    let fixture = DiseaseFixture::new();
    let session = StatelessSession::new(fixture.rules());

    let diagnoses = run_ward(&fixture, &session, &[(100, true); 10]);
    for diagnosis in &diagnoses {
        assert_eq!(flags(diagnosis), (true, true));
    }
}

#[test]
fn should_fire_disease_classification_rules() {
    let fixture = DiseaseFixture::new();
    let session = StatelessSession::new(fixture.rules());

    // 10 fever-only, 10 cough-only, 10 with both.
    let mut reports = vec![(100, false); 10];
    reports.extend(vec![(97, true); 10]);
    reports.extend(vec![(100, true); 10]);
    let diagnoses = run_ward(&fixture, &session, &reports);

    let outcomes: Vec<(bool, bool)> = diagnoses.iter().map(flags).collect();
    let fever = outcomes.iter().filter(|&&(fever, _)| fever).count();
    let cough = outcomes.iter().filter(|&&(_, cough)| cough).count();
    let both = outcomes.iter().filter(|&&(f, c)| f && c).count();
    let fever_only = outcomes.iter().filter(|&&(f, c)| f && !c).count();
    let cough_only = outcomes.iter().filter(|&&(f, c)| !f && c).count();

    assert_eq!(fever, 20);
    assert_eq!(cough, 20);
    assert_eq!(both, 10);
    assert_eq!(fever_only, 10);
    assert_eq!(cough_only, 10);
}

#[test]
fn declarative_front_end_fires_identically() {
    let fixture = DiseaseFixture::new();
    let fluent = StatelessSession::new(fixture.rules());
    let declarative = StatelessSession::new(fixture.rules_declarative());

    let reports = [(100, false), (97, true), (100, true), (98, false)];
    let from_fluent = run_ward(&fixture, &fluent, &reports);
    let from_declarative = run_ward(&fixture, &declarative, &reports);

    for (a, b) in from_fluent.iter().zip(&from_declarative) {
        assert_eq!(flags(a), flags(b));
    }
}

#[test]
fn reset_makes_stale_flags_irrelevant() {
    // Whatever the diagnosis said before the pass, the reset rule runs
    // first and the outcome depends only on the report.
    let fixture = DiseaseFixture::new();
    let session = StatelessSession::new(fixture.rules());

    for preset in [false, true] {
        let patient = fixture.patient("patient-0");
        let report = fixture.report(&patient, 97, true);
        let diagnosis = fixture.diagnosis(&patient);
        diagnosis.set("hasFever", preset).unwrap();
        diagnosis.set("hasCough", preset).unwrap();

        session.fire([report, diagnosis.clone()]).unwrap();
        assert_eq!(flags(&diagnosis), (false, true), "preset {preset}");
    }
}

#[test]
fn identical_inputs_give_identical_outcomes() {
    // Distinct fact identities, equal attribute values: the final
    // attribute values must agree.
    let fixture = DiseaseFixture::new();
    let session = StatelessSession::new(fixture.rules());

    let reports = [(100, false), (97, true), (101, true), (96, false)];
    let first: Vec<_> = run_ward(&fixture, &session, &reports)
        .iter()
        .map(flags)
        .collect();
    let second: Vec<_> = run_ward(&fixture, &session, &reports)
        .iter()
        .map(flags)
        .collect();

    assert_eq!(first, second);
}

#[test]
fn rule_order_is_observable() {
    // Reversing the agenda runs the reset rule last, wiping what the
    // fever and cough rules set: the engine is sequential, not a
    // fixpoint system.
    let fixture = DiseaseFixture::new();
    let forward = StatelessSession::new(fixture.rules());
    let reversed = StatelessSession::new(fixture.rules_with_resolution(
        ConflictResolution::custom(|a, b| b.name().cmp(a.name())),
    ));

    let patient = fixture.patient("patient-0");
    let report = fixture.report(&patient, 100, false);
    let diagnosis = fixture.diagnosis(&patient);

    forward.fire([report.clone(), diagnosis.clone()]).unwrap();
    assert_eq!(flags(&diagnosis), (true, false));

    reversed.fire([report, diagnosis.clone()]).unwrap();
    // rule1_set_no_disease fired last and cleared the fever flag.
    assert_eq!(flags(&diagnosis), (false, false));
}
