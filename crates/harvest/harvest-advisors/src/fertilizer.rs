//! Soil amendment and nutrient guidance.

use async_trait::async_trait;
use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    AdvisorId, AdvisorResult, ContextFieldKind, Factor, Impact, Priority, RecommendationContext,
    Suggestion,
};
use harvest_core::traits::IAdvisor;
use harvest_core::CancellationToken;
use serde_json::json;
use tracing::debug;

use crate::scoring::{field_confidence, round_to, stale_reason};

const FIELDS: &[ContextFieldKind] = &[ContextFieldKind::Soil, ContextFieldKind::CropHistory];

const LEGUMES: &[&str] = &["beans", "groundnut", "soybean", "cowpea", "pigeon pea"];
/// Target available nitrogen for a cereal crop.
const NITROGEN_TARGET_KG_HA: f64 = 60.0;
/// Nitrogen credit left behind by a legume.
const LEGUME_CREDIT_KG_HA: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct FertilizerAdvisor {
    id: AdvisorId,
}

impl FertilizerAdvisor {
    pub const ID: &'static str = "fertilizer";

    pub fn new() -> Self {
        Self {
            id: AdvisorId::new(Self::ID),
        }
    }
}

impl Default for FertilizerAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IAdvisor for FertilizerAdvisor {
    fn id(&self) -> &AdvisorId {
        &self.id
    }

    fn relevant_fields(&self) -> &[ContextFieldKind] {
        FIELDS
    }

    async fn invoke(
        &self,
        context: &RecommendationContext,
        _cancel: &CancellationToken,
    ) -> Result<AdvisorResult, AdvisorError> {
        let Some(soil) = context.soil.value() else {
            return Err(AdvisorError::InvalidContext {
                reason: "soil data required for fertilizer guidance".to_string(),
            });
        };

        let after_legume = context
            .crop_history
            .value()
            .and_then(|h| h.last_crop())
            .is_some_and(|crop| LEGUMES.iter().any(|l| l.eq_ignore_ascii_case(crop)));

        let mut suggestions = Vec::new();
        let mut factors = vec![Factor::new(
            "soil pH",
            if soil.ph < 5.5 || soil.ph > 7.5 { Impact::High } else { Impact::Low },
            format!("measured pH {:.1}", soil.ph),
        )];

        if soil.ph < 5.5 {
            let lime_t_ha = round_to((6.5 - soil.ph) * 1.5, 1);
            suggestions.push(
                Suggestion::new(
                    "Apply agricultural lime",
                    format!("Apply about {lime_t_ha} t/ha of lime to raise pH toward 6.5"),
                    round_to((0.7 + (5.5 - soil.ph) * 0.2).min(1.0), 2),
                )
                .with_priority(Priority::High)
                .with_detail("lime_t_ha", json!(lime_t_ha)),
            );
        } else if soil.ph > 7.5 {
            suggestions.push(
                Suggestion::new(
                    "Apply elemental sulfur",
                    "Lower pH gradually with elemental sulfur or acidifying fertilizer",
                    0.7,
                )
                .with_priority(Priority::Medium),
            );
        }

        if let Some(nitrogen) = soil.nitrogen_kg_ha {
            let credit = if after_legume { LEGUME_CREDIT_KG_HA } else { 0.0 };
            let gap = (NITROGEN_TARGET_KG_HA - nitrogen - credit).max(0.0);
            factors.push(Factor::new(
                "soil nitrogen",
                if gap > 20.0 { Impact::High } else { Impact::Medium },
                format!("{nitrogen:.0} kg/ha available"),
            ));
            if gap > 0.0 {
                let rate = round_to(gap, 0);
                suggestions.push(
                    Suggestion::new(
                        "Top-dress with nitrogen",
                        format!("Apply about {rate} kg N/ha in split doses"),
                        round_to((0.5 + gap / 100.0).min(0.95), 2),
                    )
                    .with_priority(if gap > 20.0 { Priority::High } else { Priority::Medium })
                    .with_detail("n_kg_ha", json!(rate)),
                );
            }
        }

        if after_legume {
            factors.push(Factor::new(
                "crop rotation",
                Impact::Medium,
                "previous legume crop left residual nitrogen",
            ));
        }

        if soil.organic_matter_pct < 2.0 {
            suggestions.push(
                Suggestion::new(
                    "Add compost or manure",
                    "Organic matter below 2% limits nutrient retention",
                    0.75,
                )
                .with_priority(Priority::Medium),
            );
            factors.push(Factor::new(
                "organic matter",
                Impact::Medium,
                format!("{:.1}% organic matter", soil.organic_matter_pct),
            ));
        }

        if suggestions.is_empty() {
            suggestions.push(
                Suggestion::new(
                    "Maintain current fertility program",
                    "Soil pH and nutrients are within target ranges",
                    0.6,
                )
                .with_priority(Priority::Low),
            );
        }

        let result = AdvisorResult::new(suggestions, field_confidence(context, FIELDS, 0.8, 0.1))
            .with_factors(factors);
        Ok(match stale_reason(context, FIELDS) {
            Some(reason) => {
                debug!(advisor = %self.id, %reason, "result built on stale context");
                result.stale(reason)
            }
            None => result,
        })
    }
}
