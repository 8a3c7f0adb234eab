//! Crop suitability from soil pH, temperature, water, rotation, and preference.

use async_trait::async_trait;
use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    AdvisorId, AdvisorResult, ContextFieldKind, Factor, Impact, Priority, RecommendationContext,
    SoilTexture, Suggestion,
};
use harvest_core::traits::IAdvisor;
use harvest_core::{Cancellable, CancellationToken};
use serde_json::json;
use tracing::debug;

use crate::scoring::{field_confidence, range_fit, round_to, stale_reason};

const FIELDS: &[ContextFieldKind] = &[
    ContextFieldKind::Weather,
    ContextFieldKind::Soil,
    ContextFieldKind::CropHistory,
    ContextFieldKind::Preferences,
];

/// Suitability used for an input that is not available.
const UNKNOWN_FIT: f64 = 0.7;
/// Multiplier for planting the same crop as last season.
const REPEAT_PENALTY: f64 = 0.7;
const PREFERENCE_BONUS: f64 = 0.1;
const MAX_SUGGESTIONS: usize = 5;

struct CropProfile {
    name: &'static str,
    ph: (f64, f64),
    temperature_c: (f64, f64),
    /// Seasonal water need.
    water_mm: f64,
    heavy_soil_ok: bool,
}

const fn profile(
    name: &'static str,
    ph: (f64, f64),
    temperature_c: (f64, f64),
    water_mm: f64,
    heavy_soil_ok: bool,
) -> CropProfile {
    CropProfile {
        name,
        ph,
        temperature_c,
        water_mm,
        heavy_soil_ok,
    }
}

const CROPS: &[CropProfile] = &[
    profile("maize", (5.8, 7.0), (18.0, 32.0), 500.0, true),
    profile("sorghum", (5.5, 8.0), (20.0, 38.0), 350.0, true),
    profile("beans", (6.0, 7.5), (15.0, 27.0), 350.0, false),
    profile("cassava", (4.5, 7.0), (20.0, 35.0), 300.0, false),
    profile("rice", (5.0, 6.5), (20.0, 35.0), 1_000.0, true),
    profile("groundnut", (5.5, 7.0), (22.0, 32.0), 400.0, false),
    profile("wheat", (6.0, 7.5), (10.0, 24.0), 450.0, true),
];

#[derive(Debug, Clone)]
pub struct CropAdvisor {
    id: AdvisorId,
}

impl CropAdvisor {
    pub const ID: &'static str = "crop";

    pub fn new() -> Self {
        Self {
            id: AdvisorId::new(Self::ID),
        }
    }

    fn score(&self, crop: &CropProfile, context: &RecommendationContext) -> (f64, Vec<String>) {
        let mut notes = Vec::new();

        let ph_fit = match context.soil.value() {
            Some(soil) => {
                let mut fit = range_fit(soil.ph, crop.ph.0, crop.ph.1, 1.5);
                if soil.texture == SoilTexture::Clay && !crop.heavy_soil_ok {
                    fit *= 0.8;
                    notes.push("heavy clay soil".to_string());
                }
                fit
            }
            None => UNKNOWN_FIT,
        };

        let (temperature_fit, water_fit) = match context.weather.value() {
            Some(weather) => {
                let (low, high) = crop.temperature_c;
                let temperature = range_fit(weather.temperature_c, low, high, 8.0);
                let expected_mm = (weather.rainfall_mm_7d + weather.forecast_rain_mm_7d) * 6.0;
                let budget = context
                    .preferences
                    .value()
                    .and_then(|p| p.water_budget_mm)
                    .unwrap_or(0.0);
                let water = ((expected_mm + budget) / crop.water_mm).clamp(0.0, 1.0);
                (temperature, 0.5 + 0.5 * water)
            }
            None => (UNKNOWN_FIT, UNKNOWN_FIT),
        };

        let mut suitability = ph_fit * temperature_fit * water_fit;

        if let Some(history) = context.crop_history.value() {
            if history.last_crop() == Some(crop.name) {
                suitability *= REPEAT_PENALTY;
                notes.push("same crop as last season".to_string());
            }
        }
        if let Some(preferences) = context.preferences.value() {
            if preferences.preferred_crops.iter().any(|c| c.eq_ignore_ascii_case(crop.name)) {
                suitability += PREFERENCE_BONUS;
                notes.push("preferred by the farmer".to_string());
            }
        }

        (suitability.clamp(0.0, 1.0), notes)
    }
}

impl Default for CropAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IAdvisor for CropAdvisor {
    fn id(&self) -> &AdvisorId {
        &self.id
    }

    fn relevant_fields(&self) -> &[ContextFieldKind] {
        FIELDS
    }

    async fn invoke(
        &self,
        context: &RecommendationContext,
        cancel: &CancellationToken,
    ) -> Result<AdvisorResult, AdvisorError> {
        if !context.soil.is_present() && !context.weather.is_present() {
            return Err(AdvisorError::InvalidContext {
                reason: "neither soil nor weather data available".to_string(),
            });
        }

        let mut scored: Vec<(f64, &CropProfile, Vec<String>)> = Vec::with_capacity(CROPS.len());
        for (scored_so_far, crop) in CROPS.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(advisor = %self.id, scored_so_far, "cancelled mid-scoring");
                return Err(AdvisorError::Cancelled);
            }
            let (suitability, notes) = self.score(crop, context);
            scored.push((suitability, crop, notes));
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let suggestions = scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(suitability, crop, notes)| {
                let priority = if suitability >= 0.75 {
                    Priority::High
                } else if suitability >= 0.5 {
                    Priority::Medium
                } else {
                    Priority::Low
                };
                Suggestion::new(
                    crop.name,
                    format!("Plant {} this {} season", crop.name, context.season),
                    round_to(suitability, 2),
                )
                .with_priority(priority)
                .with_detail("water_need_mm", json!(crop.water_mm))
                .with_detail("notes", json!(notes))
            })
            .collect();

        let mut factors = Vec::new();
        if let Some(soil) = context.soil.value() {
            let impact = if soil.ph < 5.5 || soil.ph > 7.5 {
                Impact::High
            } else {
                Impact::Medium
            };
            factors.push(Factor::new("soil pH", impact, format!("measured pH {:.1}", soil.ph)));
        }
        if let Some(weather) = context.weather.value() {
            factors.push(Factor::new(
                "temperature",
                Impact::Medium,
                format!("current temperature {:.1} °C", weather.temperature_c),
            ));
        }
        if let Some(last) = context.crop_history.value().and_then(|h| h.last_crop()) {
            factors.push(Factor::new(
                "crop rotation",
                Impact::Low,
                format!("last season's crop was {last}"),
            ));
        }

        let result = AdvisorResult::new(suggestions, field_confidence(context, FIELDS, 0.85, 0.15))
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
