//! Aggregation: fail-closed on required loss, ranking, merging, and composite confidence.

use harvest_core::config::AggregationConfig;
use harvest_core::errors::{HarvestError, MissingInput};
use harvest_core::models::{
    AdvisorErrorKind, AdvisorId, AdvisorOutcome, AdvisorReport, AdvisorResult, DegradationAction,
    PartialFailure,
};
use harvest_core::Intent;
use harvest_orchestrator::aggregation::confidence::{composite, penalty_multiplier};
use harvest_orchestrator::Aggregator;
use test_fixtures::{policy_with, proceed_everywhere, result_with};

fn completed(order: usize, id: &str, required: bool, result: AdvisorResult) -> AdvisorReport {
    AdvisorReport {
        advisor: AdvisorId::new(id),
        order,
        required,
        outcome: AdvisorOutcome::Completed { result },
        elapsed_ms: 5,
    }
}

fn timed_out(order: usize, id: &str, required: bool) -> AdvisorReport {
    AdvisorReport {
        advisor: AdvisorId::new(id),
        order,
        required,
        outcome: AdvisorOutcome::Failed {
            failure: PartialFailure::Timeout { after_ms: 4_000 },
        },
        elapsed_ms: 4_000,
    }
}

fn config(penalty: f64, floor: f64, max: usize) -> AggregationConfig {
    AggregationConfig {
        max_suggestions: max,
        confidence_floor: floor,
        degradation_penalty: penalty,
    }
}

#[test]
fn ranks_by_suitability_times_confidence() {
    let reports = vec![
        completed(0, "crop", true, result_with(&[("maize", 0.9), ("beans", 0.5)], 0.6)),
        completed(1, "soil", false, result_with(&[("lime", 0.8)], 0.9)),
    ];
    let aggregate = Aggregator::new(config(0.8, 0.1, 10))
        .aggregate(&Intent::CropRecommendation, &reports, &proceed_everywhere(&[]))
        .unwrap();

    let titles: Vec<&str> = aggregate
        .suggestions
        .iter()
        .map(|s| s.suggestion.title.as_str())
        .collect();
    // lime 0.72, maize 0.54, beans 0.30
    assert_eq!(titles, ["lime", "maize", "beans"]);
    assert_eq!(
        aggregate.suggestions.iter().map(|s| s.rank).collect::<Vec<_>>(),
        [1, 2, 3]
    );
}

#[test]
fn equal_scores_fall_back_to_registration_order() {
    let reports = vec![
        completed(0, "first", false, result_with(&[("a", 0.5)], 0.8)),
        completed(1, "second", false, result_with(&[("b", 0.8)], 0.5)),
    ];
    // Reverse completion order must not matter.
    let reversed: Vec<AdvisorReport> = reports.iter().rev().cloned().collect();

    let aggregator = Aggregator::new(config(0.8, 0.1, 10));
    let policy = proceed_everywhere(&[]);
    for input in [reports, reversed] {
        let aggregate = aggregator
            .aggregate(&Intent::CropRecommendation, &input, &policy)
            .unwrap();
        assert_eq!(aggregate.suggestions[0].suggestion.title, "a");
        assert_eq!(aggregate.suggestions[1].suggestion.title, "b");
    }
}

#[test]
fn same_title_from_two_advisors_is_merged() {
    let reports = vec![
        completed(0, "crop", false, result_with(&[("Maize", 0.6)], 0.8)),
        completed(1, "market", false, result_with(&[(" maize ", 0.9)], 0.8)),
    ];
    let aggregate = Aggregator::new(config(0.8, 0.1, 10))
        .aggregate(&Intent::CropRecommendation, &reports, &proceed_everywhere(&[]))
        .unwrap();

    assert_eq!(aggregate.suggestions.len(), 1);
    let merged = &aggregate.suggestions[0];
    assert_eq!(merged.advisor.as_str(), "market");
    assert_eq!(merged.also_suggested_by, vec![AdvisorId::new("crop")]);
    assert!((merged.score - 0.72).abs() < 1e-9);
}

#[test]
fn cap_applies_after_ranking() {
    let reports = vec![
        completed(0, "a", false, result_with(&[("low", 0.1), ("mid", 0.5)], 1.0)),
        completed(1, "b", false, result_with(&[("high", 0.9)], 1.0)),
    ];
    let aggregate = Aggregator::new(config(0.8, 0.1, 2))
        .aggregate(&Intent::CropRecommendation, &reports, &proceed_everywhere(&[]))
        .unwrap();
    let titles: Vec<&str> = aggregate
        .suggestions
        .iter()
        .map(|s| s.suggestion.title.as_str())
        .collect();
    assert_eq!(titles, ["high", "mid"]);
}

#[test]
fn required_loss_with_fail_request_is_insufficient_data() {
    let policy = policy_with(
        &[],
        &[(
            "crop_recommendation",
            "advisor:crop",
            DegradationAction::FailRequest,
        )],
    );
    let reports = vec![
        timed_out(0, "crop", true),
        completed(1, "sustainability", false, result_with(&[("cover crop", 0.7)], 0.7)),
    ];
    let err = Aggregator::new(config(0.8, 0.1, 10))
        .aggregate(&Intent::CropRecommendation, &reports, &policy)
        .unwrap_err();

    match err {
        HarvestError::InsufficientData {
            missing, reason, ..
        } => {
            assert_eq!(missing, MissingInput::Advisor(AdvisorId::new("crop")));
            assert!(reason.contains("timed out"));
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn required_loss_the_policy_allows_is_penalised() {
    let policy = proceed_everywhere(&["crop"]);
    let reports = vec![
        timed_out(0, "crop", true),
        completed(1, "sustainability", false, result_with(&[("cover crop", 0.7)], 0.5)),
    ];
    let aggregate = Aggregator::new(config(0.5, 0.1, 10))
        .aggregate(&Intent::CropRecommendation, &reports, &policy)
        .unwrap();
    assert_eq!(aggregate.penalized, 1);
    assert!((aggregate.confidence.value() - 0.25).abs() < 1e-9);
}

#[test]
fn unmapped_required_advisor_is_a_configuration_error() {
    let reports = vec![timed_out(0, "crop", true)];
    let err = Aggregator::new(config(0.8, 0.1, 10))
        .aggregate(
            &Intent::CropRecommendation,
            &reports,
            &harvest_policy::DeclarativePolicy::new(),
        )
        .unwrap_err();
    assert_eq!(err.kind(), "configuration");
}

#[test]
fn all_optional_advisors_lost_is_insufficient_data() {
    let reports = vec![
        timed_out(0, "a", false),
        AdvisorReport {
            advisor: AdvisorId::new("b"),
            order: 1,
            required: false,
            outcome: AdvisorOutcome::Failed {
                failure: PartialFailure::error(AdvisorErrorKind::Internal, "bug"),
            },
            elapsed_ms: 1,
        },
    ];
    let err = Aggregator::new(config(0.8, 0.1, 10))
        .aggregate(&Intent::SustainabilityAdvice, &reports, &proceed_everywhere(&[]))
        .unwrap_err();
    match err {
        HarvestError::InsufficientData { missing, .. } => {
            assert_eq!(missing, MissingInput::Advisor(AdvisorId::new("a")));
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn confidence_is_weighted_by_suggestion_count() {
    let weights = [(0.9, 3), (0.5, 1)];
    let c = composite(&weights, 0, &config(0.8, 0.1, 10));
    assert!((c.value() - 0.8).abs() < 1e-9);
}

#[test]
fn confidence_uses_plain_mean_when_nothing_was_suggested() {
    let weights = [(0.9, 0), (0.5, 0)];
    let c = composite(&weights, 0, &config(0.8, 0.1, 10));
    assert!((c.value() - 0.7).abs() < 1e-9);
}

#[test]
fn confidence_never_drops_below_floor() {
    let weights = [(0.3, 2)];
    let c = composite(&weights, 5, &config(0.5, 0.2, 10));
    assert_eq!(c.value(), 0.2);
}

#[test]
fn penalty_compounds_per_lost_advisor() {
    assert_eq!(penalty_multiplier(0.8, 0), 1.0);
    assert!((penalty_multiplier(0.8, 2) - 0.64).abs() < 1e-12);
}

#[test]
fn losing_one_of_two_optional_advisors_lowers_confidence() {
    let aggregator = Aggregator::new(config(0.8, 0.1, 10));
    let policy = proceed_everywhere(&[]);
    let both = vec![
        completed(0, "a", false, result_with(&[("x", 0.8)], 0.7)),
        completed(1, "b", false, result_with(&[("y", 0.8)], 0.7)),
    ];
    let one = vec![
        completed(0, "a", false, result_with(&[("x", 0.8)], 0.7)),
        timed_out(1, "b", false),
    ];

    let full = aggregator
        .aggregate(&Intent::SustainabilityAdvice, &both, &policy)
        .unwrap();
    let partial = aggregator
        .aggregate(&Intent::SustainabilityAdvice, &one, &policy)
        .unwrap();
    assert!(partial.confidence.value() < full.confidence.value());
    assert_eq!(partial.lost.len(), 1);
}
