use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::advisor::{AdvisorId, Impact, Suggestion};
use super::context::ContextFieldKind;
use crate::confidence::Confidence;
use crate::errors::HarvestResult;
use crate::intent::Intent;

/// A suggestion after merging and ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSuggestion {
    /// 1-based rank.
    pub rank: usize,
    pub suggestion: Suggestion,
    /// `suitability * advisor confidence`.
    pub score: f64,
    /// Advisor whose entry won the merge.
    pub advisor: AdvisorId,
    pub advisor_confidence: f64,
    /// Other advisors that suggested the same thing.
    #[serde(default)]
    pub also_suggested_by: Vec<AdvisorId>,
}

/// A deduplicated factor across advisors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFactor {
    pub name: String,
    pub impact: Impact,
    pub description: String,
    pub mentioned_by: Vec<AdvisorId>,
}

/// Structured reasoning. Prose rendering happens outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub key_factors: Vec<KeyFactor>,
    pub uncertainties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum SourceKind {
    Context(ContextFieldKind),
    Advisor(AdvisorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Fresh,
    UserInput,
    Cached,
    Stale,
    RegionalDefault,
    Missing,
    /// Advisor that did not contribute (timeout or error).
    Unavailable,
}

/// One input the recommendation was (or could not be) built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub name: String,
    pub kind: SourceKind,
    pub freshness: Freshness,
    pub observed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// The final merged recommendation for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub intent: Intent,
    pub suggestions: Vec<RankedSuggestion>,
    pub confidence: Confidence,
    pub explanation: Explanation,
    pub disclaimer: Option<String>,
    pub sources: Vec<DataSource>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct RecommendationContent<'a> {
    intent: &'a Intent,
    suggestions: &'a [RankedSuggestion],
    confidence: Confidence,
    explanation: &'a Explanation,
    disclaimer: &'a Option<String>,
    sources: &'a [DataSource],
}

impl Recommendation {
    /// blake3 hash over everything except `id` and `created_at`.
    ///
    /// Two runs over identical advisor outputs produce the same hash.
    pub fn content_hash(&self) -> HarvestResult<String> {
        let content = RecommendationContent {
            intent: &self.intent,
            suggestions: &self.suggestions,
            confidence: self.confidence,
            explanation: &self.explanation,
            disclaimer: &self.disclaimer,
            sources: &self.sources,
        };
        let serialized = serde_json::to_string(&content)?;
        Ok(blake3::hash(serialized.as_bytes()).to_hex().to_string())
    }

    pub fn titles(&self) -> Vec<&str> {
        self.suggestions
            .iter()
            .map(|s| s.suggestion.title.as_str())
            .collect()
    }
}
