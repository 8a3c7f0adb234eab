//! Deduplicate advisor factors and rank them by impact.

use harvest_core::models::{AdvisorReport, KeyFactor};

/// Factors from every surviving advisor, merged by case-insensitive name.
///
/// A merged factor keeps the highest impact seen and lists every advisor
/// that mentioned it. Output is sorted by impact, high first; equal impacts
/// keep first-mention order.
pub fn key_factors(reports: &[AdvisorReport], max: usize) -> Vec<KeyFactor> {
    let mut factors: Vec<KeyFactor> = Vec::new();

    for report in reports {
        let Some(result) = report.outcome.result() else {
            continue;
        };
        for factor in &result.factors {
            let normalized = factor.name.trim().to_lowercase();
            match factors
                .iter_mut()
                .find(|k| k.name.trim().to_lowercase() == normalized)
            {
                Some(existing) => {
                    if factor.impact > existing.impact {
                        existing.impact = factor.impact;
                        existing.description = factor.description.clone();
                    }
                    if !existing.mentioned_by.contains(&report.advisor) {
                        existing.mentioned_by.push(report.advisor.clone());
                    }
                }
                None => factors.push(KeyFactor {
                    name: factor.name.clone(),
                    impact: factor.impact,
                    description: factor.description.clone(),
                    mentioned_by: vec![report.advisor.clone()],
                }),
            }
        }
    }

    factors.sort_by(|a, b| b.impact.cmp(&a.impact));
    factors.truncate(max);
    factors
}
