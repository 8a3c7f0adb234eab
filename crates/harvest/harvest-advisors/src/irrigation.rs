//! Weekly irrigation plan from evapotranspiration, rainfall, and soil texture.

use async_trait::async_trait;
use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    AdvisorId, AdvisorResult, ContextFieldKind, Factor, Impact, Priority, RecommendationContext,
    SoilTexture, Suggestion,
};
use harvest_core::traits::IAdvisor;
use harvest_core::CancellationToken;
use serde_json::json;
use tracing::debug;

use crate::scoring::{field_confidence, round_to, stale_reason};

const FIELDS: &[ContextFieldKind] = &[
    ContextFieldKind::Weather,
    ContextFieldKind::Soil,
    ContextFieldKind::Preferences,
];

/// Reference daily evapotranspiration at 20 °C.
const BASE_ET_MM_PER_DAY: f64 = 4.0;
/// Extra evapotranspiration per degree above 20 °C.
const ET_PER_DEGREE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct IrrigationAdvisor {
    id: AdvisorId,
}

impl IrrigationAdvisor {
    pub const ID: &'static str = "irrigation";

    pub fn new() -> Self {
        Self {
            id: AdvisorId::new(Self::ID),
        }
    }
}

impl Default for IrrigationAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

/// Days between waterings for a soil texture.
fn interval_days(texture: Option<SoilTexture>) -> u32 {
    match texture {
        Some(SoilTexture::Sandy) => 2,
        Some(SoilTexture::Loam) | Some(SoilTexture::Silt) | None => 3,
        Some(SoilTexture::Clay) => 5,
    }
}

#[async_trait]
impl IAdvisor for IrrigationAdvisor {
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
        let Some(weather) = context.weather.value() else {
            return Err(AdvisorError::InvalidContext {
                reason: "weather data required for an irrigation plan".to_string(),
            });
        };

        let daily_et =
            (BASE_ET_MM_PER_DAY + ET_PER_DEGREE * (weather.temperature_c - 20.0)).max(1.0);
        let weekly_need = daily_et * 7.0;
        let mut deficit = (weekly_need - weather.forecast_rain_mm_7d).max(0.0);
        if let Some(moisture) = context.soil.value().and_then(|s| s.moisture_pct) {
            // Wet soil carries part of the week.
            deficit *= (1.0 - (moisture - 20.0).max(0.0) / 40.0).clamp(0.3, 1.0);
        }
        let budget_capped = context
            .preferences
            .value()
            .and_then(|p| p.water_budget_mm)
            .map(|budget| deficit.min(budget / 12.0));
        let planned = round_to(budget_capped.unwrap_or(deficit), 1);
        let texture = context.soil.value().map(|s| s.texture);
        let interval = interval_days(texture);

        let mut suggestions = Vec::new();
        if planned < 1.0 {
            suggestions.push(
                Suggestion::new(
                    "Skip irrigation this week",
                    format!(
                        "Forecast rain of {:.0} mm covers the weekly need of {:.0} mm",
                        weather.forecast_rain_mm_7d, weekly_need
                    ),
                    0.9,
                )
                .with_priority(Priority::Low),
            );
        } else {
            let urgency = (deficit / weekly_need).clamp(0.0, 1.0);
            suggestions.push(
                Suggestion::new(
                    format!("Irrigate {planned} mm this week"),
                    format!("Apply about {planned} mm split over waterings every {interval} days"),
                    round_to(0.6 + 0.4 * urgency, 2),
                )
                .with_priority(if urgency > 0.6 { Priority::High } else { Priority::Medium })
                .with_detail("mm_per_week", json!(planned))
                .with_detail("interval_days", json!(interval)),
            );
            suggestions.push(
                Suggestion::new(
                    "Water early morning",
                    "Irrigating before 9am cuts evaporation losses",
                    0.6,
                )
                .with_priority(Priority::Low),
            );
        }
        if weather.temperature_c > 30.0 || texture == Some(SoilTexture::Sandy) {
            suggestions.push(
                Suggestion::new(
                    "Mulch to retain moisture",
                    "A mulch layer reduces evaporation on hot days and light soils",
                    0.7,
                )
                .with_priority(Priority::Medium),
            );
        }

        let mut factors = vec![
            Factor::new(
                "rainfall forecast",
                Impact::High,
                format!("{:.0} mm expected over 7 days", weather.forecast_rain_mm_7d),
            ),
            Factor::new(
                "temperature",
                Impact::Medium,
                format!("evapotranspiration about {daily_et:.1} mm/day"),
            ),
        ];
        if let Some(texture) = texture {
            factors.push(Factor::new(
                "soil texture",
                Impact::Medium,
                format!("{texture:?} soil, watering every {interval} days").to_lowercase(),
            ));
        }

        let result = AdvisorResult::new(suggestions, field_confidence(context, FIELDS, 0.85, 0.1))
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
