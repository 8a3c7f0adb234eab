//! Merge and rank suggestions across advisors.
//!
//! Score = `suitability * advisor confidence`, descending. Ties fall back to
//! the advisor's registration order, then to the advisor's own suggestion
//! order, so the ranking never depends on completion order.

use std::cmp::Reverse;
use std::collections::HashMap;

use harvest_core::constants::SCORE_EPSILON;
use harvest_core::models::{AdvisorId, AdvisorReport, RankedSuggestion, Suggestion};

struct Candidate {
    suggestion: Suggestion,
    advisor: AdvisorId,
    advisor_confidence: f64,
    score: f64,
    order: usize,
    position: usize,
    /// Other contributors as `(registration order, id)`.
    also: Vec<(usize, AdvisorId)>,
}

impl Candidate {
    /// Scores within `SCORE_EPSILON` of each other tie.
    fn sort_key(&self) -> (Reverse<i64>, usize, usize) {
        let bucket = (self.score / SCORE_EPSILON).round() as i64;
        (Reverse(bucket), self.order, self.position)
    }

    fn add_contributor(&mut self, order: usize, advisor: &AdvisorId) {
        if &self.advisor != advisor && !self.also.iter().any(|(_, id)| id == advisor) {
            self.also.push((order, advisor.clone()));
        }
    }
}

/// Rank every suggestion from the surviving reports and keep the top `max`.
///
/// Suggestions whose titles match after trimming and lowercasing are merged;
/// the higher-ranked entry is kept and every other contributor is recorded.
pub fn rank(reports: &[AdvisorReport], max: usize) -> Vec<RankedSuggestion> {
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for report in reports {
        let Some(result) = report.outcome.result() else {
            continue;
        };
        for (position, suggestion) in result.suggestions.iter().enumerate() {
            let incoming = Candidate {
                suggestion: suggestion.clone(),
                advisor: report.advisor.clone(),
                advisor_confidence: result.confidence,
                score: suggestion.suitability * result.confidence,
                order: report.order,
                position,
                also: Vec::new(),
            };

            match by_key.get(&suggestion.merge_key()) {
                Some(&index) => {
                    let existing = &mut candidates[index];
                    if incoming.sort_key() < existing.sort_key() {
                        let displaced = std::mem::replace(existing, incoming);
                        existing.also = displaced.also;
                        existing.add_contributor(displaced.order, &displaced.advisor);
                    } else {
                        existing.add_contributor(incoming.order, &incoming.advisor);
                    }
                }
                None => {
                    by_key.insert(suggestion.merge_key(), candidates.len());
                    candidates.push(incoming);
                }
            }
        }
    }

    candidates.sort_by_key(Candidate::sort_key);
    candidates
        .into_iter()
        .take(max)
        .enumerate()
        .map(|(index, mut candidate)| {
            candidate.also.retain(|(_, id)| id != &candidate.advisor);
            candidate.also.sort();
            RankedSuggestion {
                rank: index + 1,
                suggestion: candidate.suggestion,
                score: candidate.score,
                advisor: candidate.advisor,
                advisor_confidence: candidate.advisor_confidence,
                also_suggested_by: candidate.also.into_iter().map(|(_, id)| id).collect(),
            }
        })
        .collect()
}
