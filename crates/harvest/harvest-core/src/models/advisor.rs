use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SUGGESTIONS_PER_ADVISOR;

/// Identity of an advisor capability. Unique within one intent binding list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdvisorId(String);

impl AdvisorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdvisorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AdvisorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AdvisorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Advisor-assigned urgency of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Impact level of an explanatory factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// One domain suggestion produced by an advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Suitability in [0.0, 1.0].
    pub suitability: f64,
    /// Free-form advisor detail. Ordered so serialized output is stable.
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl Suggestion {
    pub fn new(title: impl Into<String>, description: impl Into<String>, suitability: f64) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: Priority::Medium,
            suitability,
            details: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Title normalized for cross-advisor merging.
    pub fn merge_key(&self) -> String {
        self.title.trim().to_lowercase()
    }
}

/// A factor an advisor took into account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: Impact,
    pub description: String,
}

impl Factor {
    pub fn new(name: impl Into<String>, impact: Impact, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            impact,
            description: description.into(),
        }
    }
}

/// Freshness of the data an advisor based its output on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DataFreshness {
    #[default]
    Fresh,
    Stale { reason: String },
}

/// Output of one advisor invocation. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorResult {
    /// Advisor-ordered suggestions; the order breaks ties between equal scores.
    pub suggestions: Vec<Suggestion>,
    /// Advisor-local confidence in [0.0, 1.0].
    pub confidence: f64,
    #[serde(default)]
    pub factors: Vec<Factor>,
    #[serde(default)]
    pub freshness: DataFreshness,
}

impl AdvisorResult {
    pub fn new(suggestions: Vec<Suggestion>, confidence: f64) -> Self {
        Self {
            suggestions,
            confidence,
            factors: Vec::new(),
            freshness: DataFreshness::Fresh,
        }
    }

    pub fn with_factors(mut self, factors: Vec<Factor>) -> Self {
        self.factors = factors;
        self
    }

    pub fn stale(mut self, reason: impl Into<String>) -> Self {
        self.freshness = DataFreshness::Stale {
            reason: reason.into(),
        };
        self
    }

    /// Structural validation applied by the dispatcher before a result is accepted.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 1]", self.confidence));
        }
        if self.suggestions.len() > MAX_SUGGESTIONS_PER_ADVISOR {
            return Err(format!(
                "{} suggestions exceeds the limit of {}",
                self.suggestions.len(),
                MAX_SUGGESTIONS_PER_ADVISOR
            ));
        }
        for suggestion in &self.suggestions {
            if suggestion.title.trim().is_empty() {
                return Err("suggestion with empty title".to_string());
            }
            if !(0.0..=1.0).contains(&suggestion.suitability) {
                return Err(format!(
                    "suggestion '{}' suitability {} outside [0, 1]",
                    suggestion.title, suggestion.suitability
                ));
            }
        }
        Ok(())
    }
}
