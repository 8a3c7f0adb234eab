//! Soil-health and rotation practices.

use async_trait::async_trait;
use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    AdvisorId, AdvisorResult, ContextFieldKind, Factor, Impact, Priority, RecommendationContext,
    Suggestion,
};
use harvest_core::traits::IAdvisor;
use harvest_core::CancellationToken;
use tracing::debug;

use crate::scoring::{field_confidence, stale_reason};

const FIELDS: &[ContextFieldKind] = &[
    ContextFieldKind::CropHistory,
    ContextFieldKind::Soil,
    ContextFieldKind::Weather,
];

/// Seven-day rainfall above which erosion control is suggested.
const HEAVY_RAIN_MM: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct SustainabilityAdvisor {
    id: AdvisorId,
}

impl SustainabilityAdvisor {
    pub const ID: &'static str = "sustainability";

    pub fn new() -> Self {
        Self {
            id: AdvisorId::new(Self::ID),
        }
    }
}

impl Default for SustainabilityAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IAdvisor for SustainabilityAdvisor {
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
        let mut suggestions = Vec::new();
        let mut factors = Vec::new();

        if let Some(history) = context.crop_history.value() {
            let mut recent = history.seasons.iter().take(2).map(|s| s.crop.as_str());
            if let (Some(last), Some(before)) = (recent.next(), recent.next()) {
                if last.eq_ignore_ascii_case(before) {
                    suggestions.push(
                        Suggestion::new(
                            "Rotate with a legume",
                            format!(
                                "{last} was grown two seasons running; \
                                 a legume breaks pest cycles and fixes nitrogen"
                            ),
                            0.85,
                        )
                        .with_priority(Priority::High),
                    );
                    factors.push(Factor::new(
                        "crop rotation",
                        Impact::High,
                        format!("{last} grown in consecutive seasons"),
                    ));
                }
            }
        }

        if let Some(soil) = context.soil.value() {
            if soil.organic_matter_pct < 2.5 {
                suggestions.push(
                    Suggestion::new(
                        "Plant a cover crop",
                        "A cover crop between seasons rebuilds organic matter",
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
        }

        if let Some(weather) = context.weather.value() {
            let rain = weather.rainfall_mm_7d + weather.forecast_rain_mm_7d;
            if rain > HEAVY_RAIN_MM {
                suggestions.push(
                    Suggestion::new(
                        "Use contour planting",
                        "Planting along contours slows runoff during heavy rain",
                        0.7,
                    )
                    .with_priority(Priority::Medium),
                );
                factors.push(Factor::new(
                    "rainfall",
                    Impact::Medium,
                    format!("{rain:.0} mm over two weeks"),
                ));
            }
        }

        suggestions.push(
            Suggestion::new(
                "Adopt minimum tillage",
                "Reduced tillage preserves soil structure and moisture",
                0.55,
            )
            .with_priority(Priority::Low),
        );

        let result = AdvisorResult::new(suggestions, field_confidence(context, FIELDS, 0.75, 0.1))
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
