use std::collections::{BTreeMap, HashMap};

use harvest_core::config::DegradationConfig;
use harvest_core::errors::ConfigurationError;
use harvest_core::intent::Intent;
use harvest_core::models::{DegradationAction, PolicySubject};
use harvest_core::traits::IDegradationPolicy;
use tracing::debug;

/// Intent label that applies a rule to every intent without an exact rule.
pub const WILDCARD_INTENT: &str = "*";

/// Table-driven degradation policy, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct DeclarativePolicy {
    exact: HashMap<(Intent, PolicySubject), DegradationAction>,
    wildcard: HashMap<PolicySubject, DegradationAction>,
}

impl DeclarativePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[degradation]` config section.
    pub fn from_config(config: &DegradationConfig) -> Result<Self, ConfigurationError> {
        let mut policy = Self::new();
        for rule in &config.rules {
            let subject = PolicySubject::parse(&rule.subject)?;
            let intent = rule.intent.trim();
            if intent == WILDCARD_INTENT {
                policy.insert_wildcard(subject, rule.action)?;
            } else {
                policy.insert(Intent::parse(intent), subject, rule.action)?;
            }
        }
        debug!(
            exact = policy.exact.len(),
            wildcard = policy.wildcard.len(),
            "degradation policy loaded"
        );
        Ok(policy)
    }

    /// Add a rule for one intent. Duplicates are rejected.
    pub fn insert(
        &mut self,
        intent: Intent,
        subject: PolicySubject,
        action: DegradationAction,
    ) -> Result<(), ConfigurationError> {
        check_action(&subject, action)?;
        if self.exact.contains_key(&(intent.clone(), subject.clone())) {
            return Err(ConfigurationError::DuplicateRule {
                intent: intent.to_string(),
                subject: subject.to_string(),
            });
        }
        self.exact.insert((intent, subject), action);
        Ok(())
    }

    /// Add a rule that applies to every intent lacking an exact rule.
    pub fn insert_wildcard(
        &mut self,
        subject: PolicySubject,
        action: DegradationAction,
    ) -> Result<(), ConfigurationError> {
        check_action(&subject, action)?;
        if self.wildcard.contains_key(&subject) {
            return Err(ConfigurationError::DuplicateRule {
                intent: WILDCARD_INTENT.to_string(),
                subject: subject.to_string(),
            });
        }
        self.wildcard.insert(subject, action);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_rule(
        mut self,
        intent: Intent,
        subject: PolicySubject,
        action: DegradationAction,
    ) -> Result<Self, ConfigurationError> {
        self.insert(intent, subject, action)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact rules in a stable order, for audit listings.
    pub fn rules(&self) -> BTreeMap<(Intent, PolicySubject), DegradationAction> {
        self.exact
            .iter()
            .map(|(key, action)| (key.clone(), *action))
            .collect()
    }
}

impl IDegradationPolicy for DeclarativePolicy {
    fn decide(
        &self,
        intent: &Intent,
        subject: &PolicySubject,
    ) -> Result<DegradationAction, ConfigurationError> {
        self.exact
            .get(&(intent.clone(), subject.clone()))
            .or_else(|| self.wildcard.get(subject))
            .copied()
            .ok_or_else(|| ConfigurationError::UnmappedDegradation {
                intent: intent.to_string(),
                subject: subject.to_string(),
            })
    }
}

/// Substitution only makes sense for context fields.
fn check_action(subject: &PolicySubject, action: DegradationAction) -> Result<(), ConfigurationError> {
    if matches!(subject, PolicySubject::Advisor(_))
        && action == DegradationAction::SubstituteRegionalDefault
    {
        return Err(ConfigurationError::InvalidAction {
            subject: subject.to_string(),
            action: action.as_str().to_string(),
            reason: "advisors have no regional default".to_string(),
        });
    }
    Ok(())
}
