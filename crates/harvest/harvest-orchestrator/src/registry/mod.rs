//! Advisor registry: intent → ordered advisor bindings.
//!
//! Each intent's binding list is an immutable `Arc<[AdvisorBinding]>`.
//! Registration builds a new list and swaps it in, so a request that already
//! took a snapshot keeps dispatching against the list it started with.
//!
//! Only the engine mutates a registry, so every binding has passed the
//! degradation-policy totality check before a request can see it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use harvest_core::errors::{ConfigurationError, HarvestError, HarvestResult};
use harvest_core::models::{AdvisorId, ContextFieldKind, PolicySubject};
use harvest_core::traits::IAdvisor;
use harvest_core::Intent;
use tracing::info;

/// One advisor bound to an intent.
#[derive(Clone)]
pub struct AdvisorBinding {
    pub advisor: Arc<dyn IAdvisor>,
    /// Loss of a required advisor is escalated to the degradation policy.
    pub required: bool,
}

impl AdvisorBinding {
    pub fn id(&self) -> &AdvisorId {
        self.advisor.id()
    }
}

impl fmt::Debug for AdvisorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisorBinding")
            .field("advisor", self.advisor.id())
            .field("required", &self.required)
            .finish()
    }
}

/// Intent-keyed advisor bindings. Lookups never block on registration.
#[derive(Debug, Default)]
pub struct AdvisorRegistry {
    bindings: DashMap<Intent, Arc<[AdvisorBinding]>>,
}

impl AdvisorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an advisor to the intent's binding list.
    ///
    /// An advisor id may appear at most once per intent.
    pub(crate) fn register(
        &self,
        intent: Intent,
        advisor: Arc<dyn IAdvisor>,
        required: bool,
    ) -> Result<(), ConfigurationError> {
        let mut entry = self
            .bindings
            .entry(intent.clone())
            .or_insert_with(|| Arc::from(Vec::new()));

        if entry.iter().any(|b| b.id() == advisor.id()) {
            return Err(ConfigurationError::DuplicateAdvisor {
                intent: intent.to_string(),
                advisor: advisor.id().to_string(),
            });
        }

        info!(intent = %intent, advisor = %advisor.id(), required, "advisor registered");
        let mut next: Vec<AdvisorBinding> = entry.iter().cloned().collect();
        next.push(AdvisorBinding { advisor, required });
        *entry = Arc::from(next);
        Ok(())
    }

    /// Remove an advisor from one intent. Returns whether it was bound.
    pub(crate) fn deregister(&self, intent: &Intent, advisor: &AdvisorId) -> bool {
        let Some(mut entry) = self.bindings.get_mut(intent) else {
            return false;
        };
        if !entry.iter().any(|b| b.id() == advisor) {
            return false;
        }
        let next: Vec<AdvisorBinding> = entry
            .iter()
            .filter(|b| b.id() != advisor)
            .cloned()
            .collect();
        *entry = Arc::from(next);
        info!(intent = %intent, advisor = %advisor, "advisor deregistered");
        true
    }

    /// Snapshot of the intent's bindings in registration order.
    pub fn capabilities_for(&self, intent: &Intent) -> HarvestResult<Arc<[AdvisorBinding]>> {
        match self.bindings.get(intent) {
            Some(bindings) if !bindings.is_empty() => Ok(Arc::clone(bindings.value())),
            _ => Err(HarvestError::NoAdvisorsConfigured {
                intent: intent.clone(),
            }),
        }
    }

    /// Intents with at least one binding, sorted.
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents: Vec<Intent> = self
            .bindings
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        intents.sort();
        intents
    }

    /// Every `(intent, subject)` pair the degradation policy must decide.
    pub fn declared_subjects(&self) -> Vec<(Intent, PolicySubject)> {
        let mut declared = BTreeSet::new();
        for entry in self.bindings.iter() {
            declared.extend(binding_subjects(entry.key(), entry.value()));
        }
        declared.into_iter().collect()
    }
}

/// Subjects declared by one intent's bindings, in binding order.
pub fn binding_subjects(
    intent: &Intent,
    bindings: &[AdvisorBinding],
) -> Vec<(Intent, PolicySubject)> {
    bindings
        .iter()
        .flat_map(|b| subjects_for(intent, b.advisor.as_ref(), b.required))
        .collect()
}

/// Subjects one binding adds: each field the advisor reads, plus the advisor
/// itself when required.
pub fn subjects_for(
    intent: &Intent,
    advisor: &dyn IAdvisor,
    required: bool,
) -> Vec<(Intent, PolicySubject)> {
    let mut subjects: Vec<(Intent, PolicySubject)> = advisor
        .relevant_fields()
        .iter()
        .map(|kind| (intent.clone(), PolicySubject::Field(*kind)))
        .collect();
    if required {
        subjects.push((intent.clone(), PolicySubject::Advisor(advisor.id().clone())));
    }
    subjects
}

/// Union of the fields read by `bindings`, in `ContextFieldKind::ALL` order.
pub fn relevant_fields(bindings: &[AdvisorBinding]) -> Vec<ContextFieldKind> {
    ContextFieldKind::ALL
        .into_iter()
        .filter(|kind| {
            bindings
                .iter()
                .any(|b| b.advisor.relevant_fields().contains(kind))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use harvest_core::errors::{ConfigurationError, HarvestError};
    use harvest_core::models::{AdvisorId, ContextFieldKind, PolicySubject};
    use harvest_core::Intent;
    use test_fixtures::{result_with, ScriptedAdvisor};

    use super::{binding_subjects, relevant_fields, AdvisorRegistry};

    fn advisor(id: &str) -> Arc<ScriptedAdvisor> {
        Arc::new(ScriptedAdvisor::returning(id, result_with(&[("maize", 0.8)], 0.8)))
    }

    #[test]
    fn lookup_of_unregistered_intent_is_no_advisors_configured() {
        let registry = AdvisorRegistry::new();
        let err = registry
            .capabilities_for(&Intent::CropRecommendation)
            .unwrap_err();
        assert!(matches!(err, HarvestError::NoAdvisorsConfigured { .. }));
    }

    #[test]
    fn bindings_keep_registration_order() {
        let registry = AdvisorRegistry::new();
        for id in ["crop", "sustainability", "market"] {
            registry
                .register(Intent::CropRecommendation, advisor(id), id == "crop")
                .unwrap();
        }

        let bindings = registry.capabilities_for(&Intent::CropRecommendation).unwrap();
        let ids: Vec<&str> = bindings.iter().map(|b| b.id().as_str()).collect();
        assert_eq!(ids, ["crop", "sustainability", "market"]);
        assert!(bindings[0].required);
        assert!(!bindings[1].required);
    }

    #[test]
    fn duplicate_advisor_for_same_intent_is_rejected() {
        let registry = AdvisorRegistry::new();
        registry
            .register(Intent::CropRecommendation, advisor("crop"), true)
            .unwrap();
        let err = registry
            .register(Intent::CropRecommendation, advisor("crop"), false)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateAdvisor { .. }));

        // Same advisor under another intent is fine.
        registry
            .register(Intent::SustainabilityAdvice, advisor("crop"), false)
            .unwrap();
    }

    #[test]
    fn snapshot_is_unaffected_by_later_registration() {
        let registry = AdvisorRegistry::new();
        registry
            .register(Intent::IrrigationAdvice, advisor("irrigation"), true)
            .unwrap();
        let before = registry.capabilities_for(&Intent::IrrigationAdvice).unwrap();

        registry
            .register(Intent::IrrigationAdvice, advisor("weather-risk"), false)
            .unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(
            registry
                .capabilities_for(&Intent::IrrigationAdvice)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn deregister_removes_only_the_named_binding() {
        let registry = AdvisorRegistry::new();
        registry
            .register(Intent::CropRecommendation, advisor("crop"), true)
            .unwrap();
        registry
            .register(Intent::CropRecommendation, advisor("sustainability"), false)
            .unwrap();

        assert!(registry.deregister(&Intent::CropRecommendation, &AdvisorId::new("sustainability")));
        assert!(!registry.deregister(&Intent::CropRecommendation, &AdvisorId::new("sustainability")));
        assert!(!registry.deregister(&Intent::IrrigationAdvice, &AdvisorId::new("crop")));

        let bindings = registry.capabilities_for(&Intent::CropRecommendation).unwrap();
        assert_eq!(bindings.len(), 1);

        registry.deregister(&Intent::CropRecommendation, &AdvisorId::new("crop"));
        assert!(registry.capabilities_for(&Intent::CropRecommendation).is_err());
        assert!(registry.intents().is_empty());
    }

    #[test]
    fn declared_subjects_cover_fields_and_required_advisors() {
        let registry = AdvisorRegistry::new();
        let crop = ScriptedAdvisor::returning("crop", result_with(&[], 0.5))
            .reading(&[ContextFieldKind::Soil, ContextFieldKind::Weather]);
        let extra = ScriptedAdvisor::returning("extra", result_with(&[], 0.5))
            .reading(&[ContextFieldKind::Soil]);
        registry
            .register(Intent::CropRecommendation, Arc::new(crop), true)
            .unwrap();
        registry
            .register(Intent::CropRecommendation, Arc::new(extra), false)
            .unwrap();

        let declared = registry.declared_subjects();
        let intent = Intent::CropRecommendation;
        assert_eq!(
            declared,
            vec![
                (intent.clone(), PolicySubject::Field(ContextFieldKind::Weather)),
                (intent.clone(), PolicySubject::Field(ContextFieldKind::Soil)),
                (intent.clone(), PolicySubject::Advisor(AdvisorId::new("crop"))),
            ]
        );

        let bindings = registry.capabilities_for(&intent).unwrap();
        assert_eq!(binding_subjects(&intent, &bindings).len(), 4);
        assert_eq!(
            relevant_fields(&bindings),
            vec![ContextFieldKind::Weather, ContextFieldKind::Soil]
        );
    }

    #[test]
    fn concurrent_lookups_and_registrations_do_not_interfere() {
        let registry = Arc::new(AdvisorRegistry::new());
        registry
            .register(Intent::CropRecommendation, advisor("crop"), true)
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let id = format!("advisor-{i}-{j}");
                        registry
                            .register(Intent::Custom(format!("intent-{i}")), advisor(&id), false)
                            .unwrap();
                        let bindings = registry.capabilities_for(&Intent::CropRecommendation).unwrap();
                        assert_eq!(bindings.len(), 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.intents().len(), 9);
    }
}
