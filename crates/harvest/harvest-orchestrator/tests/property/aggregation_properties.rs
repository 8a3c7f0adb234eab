use std::collections::HashSet;

use harvest_core::config::AggregationConfig;
use harvest_core::constants::SCORE_EPSILON;
use harvest_core::models::{AdvisorId, AdvisorOutcome, AdvisorReport, AdvisorResult, Suggestion};
use harvest_orchestrator::aggregation::confidence::composite;
use harvest_orchestrator::aggregation::ranking::rank;
use proptest::prelude::*;

const TITLES: &[&str] = &["maize", "Maize", "sorghum", "beans", "cassava", "rice", "lime", "mulch"];

fn arb_result() -> impl Strategy<Value = AdvisorResult> {
    (
        prop::collection::vec((0..TITLES.len(), 0.0f64..=1.0), 0..6),
        0.0f64..=1.0,
    )
        .prop_map(|(suggestions, confidence)| {
            AdvisorResult::new(
                suggestions
                    .into_iter()
                    .map(|(i, suitability)| Suggestion::new(TITLES[i], "generated", suitability))
                    .collect(),
                confidence,
            )
        })
}

fn arb_reports() -> impl Strategy<Value = Vec<AdvisorReport>> {
    prop::collection::vec(arb_result(), 1..5).prop_map(|results| {
        results
            .into_iter()
            .enumerate()
            .map(|(order, result)| AdvisorReport {
                advisor: AdvisorId::new(format!("advisor-{order}")),
                order,
                required: false,
                outcome: AdvisorOutcome::Completed { result },
                elapsed_ms: 0,
            })
            .collect()
    })
}

// ── Ranking ignores completion order ─────────────────────────────────────

proptest! {
    #[test]
    fn ranking_is_independent_of_report_order(reports in arb_reports(), max in 1usize..20) {
        let forward = rank(&reports, max);
        let mut shuffled = reports.clone();
        shuffled.reverse();
        shuffled.rotate_left(reports.len() / 2);
        let backward = rank(&shuffled, max);
        prop_assert_eq!(forward, backward);
    }
}

// ── Ranking shape ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ranking_is_sorted_capped_and_deduplicated(reports in arb_reports(), max in 1usize..20) {
        let ranked = rank(&reports, max);
        prop_assert!(ranked.len() <= max);

        for (index, entry) in ranked.iter().enumerate() {
            prop_assert_eq!(entry.rank, index + 1);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].score + SCORE_EPSILON >= pair[1].score);
        }

        let keys: HashSet<String> = ranked.iter().map(|r| r.suggestion.merge_key()).collect();
        prop_assert_eq!(keys.len(), ranked.len());
    }
}

// ── Composite confidence bounds ──────────────────────────────────────────

proptest! {
    #[test]
    fn composite_confidence_stays_in_bounds(
        surviving in prop::collection::vec((0.0f64..=1.0, 0usize..10), 1..6),
        lost in 0usize..6,
        penalty in 0.01f64..=1.0,
        floor in 0.0f64..0.99,
    ) {
        let config = AggregationConfig {
            max_suggestions: 10,
            confidence_floor: floor,
            degradation_penalty: penalty,
        };
        let value = composite(&surviving, lost, &config).value();
        prop_assert!(value >= floor - 1e-12);
        prop_assert!(value <= 1.0);
    }

    #[test]
    fn each_loss_never_raises_confidence(
        surviving in prop::collection::vec((0.0f64..=1.0, 0usize..10), 1..6),
        lost in 0usize..5,
        penalty in 0.01f64..=1.0,
    ) {
        let config = AggregationConfig {
            max_suggestions: 10,
            confidence_floor: 0.0,
            degradation_penalty: penalty,
        };
        let fewer = composite(&surviving, lost, &config).value();
        let more = composite(&surviving, lost + 1, &config).value();
        prop_assert!(more <= fewer);
    }
}
