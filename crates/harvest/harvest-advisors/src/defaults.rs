//! Default advisor bindings and the degradation rules that cover them.

use std::sync::Arc;

use harvest_core::config::{DegradationConfig, DegradationRule};
use harvest_core::errors::ConfigurationError;
use harvest_core::models::DegradationAction;
use harvest_core::Intent;
use harvest_orchestrator::RecommendationEngine;

use crate::{CropAdvisor, FertilizerAdvisor, IrrigationAdvisor, SustainabilityAdvisor};

/// `(intent, advisor id, required)` for every default binding.
pub const DEFAULT_BINDINGS: &[(Intent, &str, bool)] = &[
    (Intent::CropRecommendation, CropAdvisor::ID, true),
    (Intent::CropRecommendation, SustainabilityAdvisor::ID, false),
    (Intent::IrrigationAdvice, IrrigationAdvisor::ID, true),
    (Intent::FertilizerGuidance, FertilizerAdvisor::ID, true),
    (Intent::FertilizerGuidance, SustainabilityAdvisor::ID, false),
    (Intent::SustainabilityAdvice, SustainabilityAdvisor::ID, true),
];

/// Register the reference advisors on `engine`.
pub fn register_defaults(engine: &RecommendationEngine) -> Result<(), ConfigurationError> {
    for (intent, id, required) in DEFAULT_BINDINGS {
        let advisor: Arc<dyn harvest_core::traits::IAdvisor> = match *id {
            CropAdvisor::ID => Arc::new(CropAdvisor::new()),
            IrrigationAdvisor::ID => Arc::new(IrrigationAdvisor::new()),
            FertilizerAdvisor::ID => Arc::new(FertilizerAdvisor::new()),
            _ => Arc::new(SustainabilityAdvisor::new()),
        };
        engine.register_advisor(intent.clone(), advisor, *required)?;
    }
    Ok(())
}

/// Degradation rules that make the default bindings total.
///
/// Every field proceeds with a disclaimer unless overridden. Soil falls back
/// to regional defaults for irrigation and fertilizer advice; weather is
/// mandatory for irrigation. Losing a required advisor fails the request.
pub fn default_degradation_config() -> DegradationConfig {
    use DegradationAction::*;

    let rule = |intent: &str, subject: &str, action| DegradationRule {
        intent: intent.to_string(),
        subject: subject.to_string(),
        action,
    };

    let mut rules = vec![
        rule("*", "field:weather", ProceedWithDisclaimer),
        rule("*", "field:soil", ProceedWithDisclaimer),
        rule("*", "field:crop_history", ProceedWithDisclaimer),
        rule("*", "field:preferences", ProceedWithDisclaimer),
        rule("irrigation_advice", "field:soil", SubstituteRegionalDefault),
        rule("irrigation_advice", "field:weather", FailRequest),
        rule("fertilizer_guidance", "field:soil", SubstituteRegionalDefault),
    ];
    rules.extend(
        DEFAULT_BINDINGS
            .iter()
            .filter(|(_, _, required)| *required)
            .map(|(intent, id, _)| rule(intent.as_str(), &format!("advisor:{id}"), FailRequest)),
    );
    DegradationConfig { rules }
}
