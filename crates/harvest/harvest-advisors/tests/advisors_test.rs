//! Behaviour of the reference advisors against canned contexts.

use chrono::Utc;
use harvest_advisors::{CropAdvisor, FertilizerAdvisor, IrrigationAdvisor, SustainabilityAdvisor};
use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    ContextField, ContextFieldKind, CropSeasonRecord, DataFreshness, FieldValue, Priority,
    RecommendationContext, Season, SoilTexture,
};
use harvest_core::traits::IAdvisor;
use harvest_core::{Cancellable, CancellationToken};
use test_fixtures::{context_without, full_context, sample_history, sample_soil, sample_weather};

fn titles(result: &harvest_core::AdvisorResult) -> Vec<&str> {
    result.suggestions.iter().map(|s| s.title.as_str()).collect()
}

fn with_field(mut context: RecommendationContext, value: FieldValue) -> RecommendationContext {
    context.set_field(value.kind(), ContextField::fetched(value, Utc::now()));
    context
}

// ── Crop ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn crop_ranks_suitable_crops_and_penalises_repeats() {
    let result = CropAdvisor::new()
        .invoke(&full_context("r"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.suggestions.len(), 5);
    assert_eq!(result.suggestions[0].title, "sorghum");
    assert_eq!(result.suggestions[0].priority, Priority::High);
    assert!(!titles(&result).contains(&"wheat"));

    // Maize was last season's crop: penalised, then lifted by preference.
    let maize = result
        .suggestions
        .iter()
        .find(|s| s.title == "maize")
        .expect("maize suggested");
    assert!((maize.suitability - 0.8).abs() < 1e-9);
    assert_eq!(result.confidence, 0.85);
    assert!(result.factors.iter().any(|f| f.name == "crop rotation"));
    assert!(result.validate().is_ok());
}

#[tokio::test]
async fn crop_needs_soil_or_weather() {
    let context = context_without("r", &[ContextFieldKind::Soil, ContextFieldKind::Weather]);
    let err = CropAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AdvisorError::InvalidContext { .. }));
}

#[tokio::test]
async fn crop_confidence_drops_with_missing_fields() {
    let context = context_without("r", &[ContextFieldKind::Weather]);
    let result = CropAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert!((result.confidence - 0.7).abs() < 1e-9);
    assert!(!result.factors.iter().any(|f| f.name == "temperature"));
}

#[tokio::test]
async fn crop_observes_cancellation() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = CropAdvisor::new()
        .invoke(&full_context("r"), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, AdvisorError::Cancelled));
}

#[tokio::test]
async fn stale_input_is_reported_on_the_result() {
    let mut context = full_context("r");
    context.soil = context.soil.clone().mark_stale("observed 2 years ago");
    let result = CropAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        result.freshness,
        DataFreshness::Stale {
            reason: "stale soil data".to_string()
        }
    );
}

// ── Irrigation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn irrigation_plans_water_when_rain_falls_short() {
    let result = IrrigationAdvisor::new()
        .invoke(&full_context("r"), &CancellationToken::new())
        .await
        .unwrap();

    let titles = titles(&result);
    assert!(titles[0].starts_with("Irrigate "));
    assert!(titles[0].ends_with(" mm this week"));
    assert!(titles.contains(&"Water early morning"));
    assert!(!titles.contains(&"Mulch to retain moisture"));
    assert!(result.suggestions[0].details.contains_key("interval_days"));
}

#[tokio::test]
async fn irrigation_skips_when_forecast_covers_need() {
    let mut weather = sample_weather();
    weather.forecast_rain_mm_7d = 60.0;
    let context = with_field(full_context("r"), FieldValue::Weather(weather));

    let result = IrrigationAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(titles(&result), ["Skip irrigation this week"]);
}

#[tokio::test]
async fn irrigation_suggests_mulch_on_sandy_soil() {
    let mut soil = sample_soil();
    soil.texture = SoilTexture::Sandy;
    let context = with_field(full_context("r"), FieldValue::Soil(soil));

    let result = IrrigationAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert!(titles(&result).contains(&"Mulch to retain moisture"));
    assert_eq!(
        result.suggestions[0].details.get("interval_days"),
        Some(&serde_json::json!(2))
    );
}

#[tokio::test]
async fn irrigation_requires_weather() {
    let context = context_without("r", &[ContextFieldKind::Weather]);
    let err = IrrigationAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AdvisorError::InvalidContext { .. }));
}

// ── Fertilizer ────────────────────────────────────────────────────────────

#[tokio::test]
async fn fertilizer_closes_the_nitrogen_gap() {
    let result = FertilizerAdvisor::new()
        .invoke(&full_context("r"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(titles(&result), ["Top-dress with nitrogen"]);
    assert_eq!(result.suggestions[0].priority, Priority::High);
    assert_eq!(
        result.suggestions[0].details.get("n_kg_ha"),
        Some(&serde_json::json!(30.0))
    );
}

#[tokio::test]
async fn fertilizer_limes_acidic_soil_first() {
    let mut soil = sample_soil();
    soil.ph = 5.0;
    let context = with_field(full_context("r"), FieldValue::Soil(soil));

    let result = FertilizerAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(result.suggestions[0].title, "Apply agricultural lime");
    assert!(result
        .factors
        .iter()
        .any(|f| f.name == "soil pH" && f.impact == harvest_core::models::Impact::High));
}

#[tokio::test]
async fn fertilizer_credits_a_previous_legume() {
    let mut history = sample_history();
    history.seasons.reverse();
    let context = with_field(full_context("r"), FieldValue::CropHistory(history));

    let result = FertilizerAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    let top_dress = &result.suggestions[0];
    assert_eq!(top_dress.priority, Priority::Medium);
    assert_eq!(top_dress.details.get("n_kg_ha"), Some(&serde_json::json!(10.0)));
    assert!(result.factors.iter().any(|f| f.name == "crop rotation"));
}

#[tokio::test]
async fn fertilizer_keeps_a_healthy_program() {
    let mut soil = sample_soil();
    soil.nitrogen_kg_ha = Some(80.0);
    let context = with_field(full_context("r"), FieldValue::Soil(soil));

    let result = FertilizerAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(titles(&result), ["Maintain current fertility program"]);
}

// ── Sustainability ────────────────────────────────────────────────────────

#[tokio::test]
async fn sustainability_always_offers_minimum_tillage() {
    let result = SustainabilityAdvisor::new()
        .invoke(&full_context("r"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(titles(&result), ["Adopt minimum tillage"]);
    assert_eq!(result.confidence, 0.75);
}

#[tokio::test]
async fn sustainability_flags_monocropping_and_low_organic_matter() {
    let mut history = sample_history();
    history.seasons[1] = CropSeasonRecord {
        crop: "Maize".to_string(),
        season: Season::Dry,
        year: 2025,
        yield_t_ha: None,
    };
    let mut soil = sample_soil();
    soil.organic_matter_pct = 1.5;
    let context = with_field(
        with_field(full_context("r"), FieldValue::CropHistory(history)),
        FieldValue::Soil(soil),
    );

    let result = SustainabilityAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(
        titles(&result),
        ["Rotate with a legume", "Plant a cover crop", "Adopt minimum tillage"]
    );
}

#[tokio::test]
async fn sustainability_works_without_any_context() {
    let context = context_without("r", &ContextFieldKind::ALL);
    let result = SustainabilityAdvisor::new()
        .invoke(&context, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(titles(&result), ["Adopt minimum tillage"]);
    assert!((result.confidence - 0.45).abs() < 1e-9);
}
