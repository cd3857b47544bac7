//! Property tests over the full stack.

use millrace_runtime::StatelessSession;
use proptest::prelude::*;

use crate::fixtures::{DiseaseFixture, flags};

proptest! {
    /// For arbitrary report batches, every diagnosis ends up reflecting
    /// exactly its own patient's report, regardless of batch size or
    /// composition.
    #[test]
    fn diagnoses_track_their_own_reports(
        reports in proptest::collection::vec((90i64..110, any::<bool>()), 0..25)
    ) {
        let fixture = DiseaseFixture::new();
        let session = StatelessSession::new(fixture.rules());

        let mut batch = Vec::new();
        let mut expected = Vec::new();
        let mut diagnoses = Vec::new();
        for (i, &(temperature, has_cough)) in reports.iter().enumerate() {
            let patient = fixture.patient(&format!("patient-{i}"));
            batch.push(fixture.report(&patient, temperature, has_cough));
            diagnoses.push(fixture.diagnosis(&patient));
            expected.push((temperature >= 100, has_cough));
        }
        batch.extend(diagnoses.iter().cloned());

        session.fire(batch).unwrap();

        for (diagnosis, expected) in diagnoses.iter().zip(&expected) {
            prop_assert_eq!(&flags(diagnosis), expected);
        }
    }

    /// Firing the same batch twice is idempotent: a second pass over
    /// already-classified diagnoses reaches the same fixed values.
    #[test]
    fn refiring_is_idempotent(
        reports in proptest::collection::vec((90i64..110, any::<bool>()), 1..10)
    ) {
        let fixture = DiseaseFixture::new();
        let session = StatelessSession::new(fixture.rules());

        let mut batch = Vec::new();
        let mut diagnoses = Vec::new();
        for (i, &(temperature, has_cough)) in reports.iter().enumerate() {
            let patient = fixture.patient(&format!("patient-{i}"));
            batch.push(fixture.report(&patient, temperature, has_cough));
            diagnoses.push(fixture.diagnosis(&patient));
        }
        batch.extend(diagnoses.iter().cloned());

        session.fire(batch.clone()).unwrap();
        let first: Vec<_> = diagnoses.iter().map(flags).collect();

        session.fire(batch).unwrap();
        let second: Vec<_> = diagnoses.iter().map(flags).collect();

        prop_assert_eq!(first, second);
    }
}
