//! Canned context values.

use chrono::Utc;
use harvest_core::models::{
    ContextField, ContextFieldKind, ContextRequest, CropHistory, CropSeasonRecord, FieldValue,
    RecommendationContext, Season, SoilInfo, SoilTexture, UserPreferences, WeatherSnapshot,
};

pub fn request(region: &str) -> ContextRequest {
    ContextRequest::new("farmer-1", region, Season::Wet)
}

pub fn sample_weather() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature_c: 27.5,
        humidity_pct: 70.0,
        rainfall_mm_7d: 12.0,
        forecast_rain_mm_7d: 20.0,
    }
}

pub fn sample_soil() -> SoilInfo {
    SoilInfo {
        texture: SoilTexture::Loam,
        ph: 6.4,
        organic_matter_pct: 2.8,
        moisture_pct: Some(24.0),
        nitrogen_kg_ha: Some(30.0),
    }
}

pub fn sample_history() -> CropHistory {
    CropHistory {
        seasons: vec![
            CropSeasonRecord {
                crop: "maize".to_string(),
                season: Season::Wet,
                year: 2025,
                yield_t_ha: Some(3.2),
            },
            CropSeasonRecord {
                crop: "beans".to_string(),
                season: Season::Dry,
                year: 2025,
                yield_t_ha: Some(1.1),
            },
        ],
    }
}

pub fn sample_preferences() -> UserPreferences {
    UserPreferences {
        preferred_crops: vec!["maize".to_string()],
        organic_only: false,
        water_budget_mm: Some(400.0),
    }
}

/// A context with every field freshly fetched.
pub fn full_context(region: &str) -> RecommendationContext {
    let now = Utc::now();
    let mut context = RecommendationContext::bare(&request(region), now);
    let values = [
        FieldValue::Weather(sample_weather()),
        FieldValue::Soil(sample_soil()),
        FieldValue::CropHistory(sample_history()),
        FieldValue::Preferences(sample_preferences()),
    ];
    for value in values {
        let kind = value.kind();
        context.set_field(kind, ContextField::fetched(value, now));
    }
    context
}

/// `full_context` with the given fields missing.
pub fn context_without(region: &str, missing: &[ContextFieldKind]) -> RecommendationContext {
    let mut context = full_context(region);
    for kind in missing {
        context.set_field(*kind, ContextField::missing("source unavailable"));
    }
    context
}
