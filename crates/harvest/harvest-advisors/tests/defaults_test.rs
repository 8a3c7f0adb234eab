//! Default bindings wired into a real engine with the layered resolver.

use std::sync::Arc;

use harvest_advisors::defaults::DEFAULT_BINDINGS;
use harvest_advisors::{default_degradation_config, register_defaults};
use harvest_context::{LayeredContextResolver, RegionProfile, RegionalDefaults};
use harvest_core::config::{ContextConfig, HarvestConfig};
use harvest_core::errors::{ConfigurationError, HarvestError, MissingInput};
use harvest_core::models::{ContextFieldKind, FieldValue, Freshness};
use harvest_core::traits::IDegradationPolicy;
use harvest_core::Intent;
use harvest_orchestrator::RecommendationEngine;
use harvest_policy::{missing_rules, DeclarativePolicy};
use test_fixtures::{
    proceed_everywhere, request, sample_history, sample_preferences, sample_soil, sample_weather,
    FailingSource, StaticSource,
};

fn resolver(policy: Arc<dyn IDegradationPolicy>, soil_up: bool, weather_up: bool) -> LayeredContextResolver {
    let weather: Arc<dyn harvest_core::traits::IContextSource> = if weather_up {
        Arc::new(StaticSource::new("weather-api", FieldValue::Weather(sample_weather())))
    } else {
        Arc::new(FailingSource::unavailable(ContextFieldKind::Weather, "weather-api"))
    };
    let soil: Arc<dyn harvest_core::traits::IContextSource> = if soil_up {
        Arc::new(StaticSource::new("soil-survey", FieldValue::Soil(sample_soil())))
    } else {
        Arc::new(FailingSource::unavailable(ContextFieldKind::Soil, "soil-survey"))
    };
    LayeredContextResolver::new(policy, ContextConfig::default())
        .with_source(weather)
        .with_source(soil)
        .with_source(Arc::new(StaticSource::new(
            "farm-records",
            FieldValue::CropHistory(sample_history()),
        )))
        .with_source(Arc::new(StaticSource::new(
            "profile",
            FieldValue::Preferences(sample_preferences()),
        )))
        .with_regional_defaults(RegionalDefaults::new().with_profile(
            "lake-basin",
            RegionProfile {
                soil: Some(sample_soil()),
                ..Default::default()
            },
        ))
}

fn default_engine(soil_up: bool, weather_up: bool) -> RecommendationEngine {
    let policy: Arc<dyn IDegradationPolicy> =
        Arc::new(DeclarativePolicy::from_config(&default_degradation_config()).unwrap());
    let engine = RecommendationEngine::new(
        HarvestConfig::default(),
        Arc::new(resolver(Arc::clone(&policy), soil_up, weather_up)),
        policy,
    )
    .unwrap();
    register_defaults(&engine).unwrap();
    engine
}

#[test]
fn default_rules_cover_every_default_binding() {
    let engine = default_engine(true, true);
    let policy = DeclarativePolicy::from_config(&default_degradation_config()).unwrap();
    assert!(missing_rules(&policy, &engine.registry().declared_subjects()).is_empty());
    assert_eq!(engine.registry().intents().len(), Intent::BUILTIN.len());
    assert_eq!(
        DEFAULT_BINDINGS.iter().filter(|(_, _, required)| *required).count(),
        4
    );
}

#[test]
fn defaults_cannot_be_registered_under_an_incomplete_policy() {
    let engine = RecommendationEngine::new(
        HarvestConfig::default(),
        Arc::new(resolver(Arc::new(proceed_everywhere(&[])), true, true)),
        Arc::new(proceed_everywhere(&[])),
    )
    .unwrap();
    let err = register_defaults(&engine).unwrap_err();
    assert!(matches!(err, ConfigurationError::UnmappedDegradation { .. }));
}

#[tokio::test]
async fn crop_recommendation_uses_both_advisors() {
    let engine = default_engine(true, true);
    let recommendation = engine
        .generate_recommendation(&Intent::CropRecommendation, &request("lake-basin"))
        .await
        .unwrap();

    assert_eq!(recommendation.titles()[0], "sorghum");
    assert!(recommendation.disclaimer.is_none());
    assert!(recommendation
        .sources
        .iter()
        .all(|s| s.freshness == Freshness::Fresh));
    assert!(recommendation
        .titles()
        .contains(&"Adopt minimum tillage"));
}

#[tokio::test]
async fn fertilizer_guidance_falls_back_to_regional_soil() {
    let engine = default_engine(false, true);
    let recommendation = engine
        .generate_recommendation(&Intent::FertilizerGuidance, &request("lake-basin"))
        .await
        .unwrap();

    let soil = recommendation
        .sources
        .iter()
        .find(|s| s.name == "soil")
        .expect("soil source");
    assert_eq!(soil.freshness, Freshness::RegionalDefault);
    assert!(recommendation
        .disclaimer
        .expect("disclaimer")
        .contains("soil estimated from regional defaults"));
}

#[tokio::test]
async fn irrigation_without_weather_fails_closed() {
    let engine = default_engine(true, false);
    let err = engine
        .generate_recommendation(&Intent::IrrigationAdvice, &request("lake-basin"))
        .await
        .unwrap_err();
    match err {
        HarvestError::InsufficientData { missing, .. } => {
            assert_eq!(missing, MissingInput::ContextField(ContextFieldKind::Weather));
        }
        other => panic!("expected InsufficientData, got {other:?}"),
    }
}

#[tokio::test]
async fn sustainability_advice_proceeds_without_weather() {
    let engine = default_engine(true, false);
    let recommendation = engine
        .generate_recommendation(&Intent::SustainabilityAdvice, &request("lake-basin"))
        .await
        .unwrap();
    assert!(recommendation
        .disclaimer
        .expect("disclaimer")
        .contains("weather data missing"));
}
