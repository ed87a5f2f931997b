//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_spec;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = PipelineSpec> {
    (
        1usize..128,     // extraction batch size
        1usize..200,     // batch count
        0.0f32..=1.0,    // psi
        2usize..10,      // folds
        prop::collection::vec(1e-3f64..1e8, 1..12), // alphas
    )
        .prop_map(|(batch_size, n_batches, psi, folds, alphas)| {
            let mut spec = PipelineSpec::default();
            spec.extraction.batch_size = batch_size;
            spec.extraction.n_batches = n_batches;
            spec.generation.psi = psi;
            spec.encoding.folds = folds;
            spec.encoding.alphas = alphas;
            spec
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn prop_psi_outside_unit_interval_fails(spec in arb_valid_spec(), psi in 1.0001f32..100.0) {
        let mut spec = spec;
        spec.generation.psi = psi;
        prop_assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidPsi(_))));
        spec.generation.psi = -psi;
        prop_assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidPsi(_))));
    }

    #[test]
    fn prop_non_positive_alpha_fails(spec in arb_valid_spec(), bad in -1e6f64..=0.0) {
        let mut spec = spec;
        spec.encoding.alphas.push(bad);
        prop_assert!(matches!(validate_spec(&spec), Err(ValidationError::InvalidAlpha(_))));
    }

    #[test]
    fn prop_yaml_round_trip_preserves_spec(spec in arb_valid_spec()) {
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let parsed: PipelineSpec = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, spec);
    }
}
