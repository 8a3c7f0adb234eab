use chrono::{TimeZone, Utc};
use uuid::Uuid;

use harvest_core::models::*;
use harvest_core::{Confidence, Intent};

fn at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 6, 0, 0).unwrap()
}

#[test]
fn missing_field_always_carries_a_reason() {
    let field: ContextField<SoilInfo> = ContextField::missing("soil service unavailable");
    assert!(!field.is_present());
    assert_eq!(field.source, FieldSource::Missing);
    assert_eq!(field.note.as_deref(), Some("soil service unavailable"));
    assert!(field.is_degraded());
}

#[test]
fn regional_default_is_flagged_as_degraded() {
    let soil = SoilInfo {
        texture: SoilTexture::Loam,
        ph: 6.5,
        organic_matter_pct: 2.0,
        moisture_pct: None,
        nitrogen_kg_ha: None,
    };
    let field = ContextField::regional_default(soil, "regional soil profile for semi-arid-A");
    assert!(field.is_present());
    assert!(field.is_degraded());
    assert!(field.note.unwrap().contains("semi-arid-A"));
}

#[test]
fn fresh_fetch_is_not_degraded_until_marked_stale() {
    let field = ContextField::fetched(UserPreferences::default(), at());
    assert!(!field.is_degraded());
    let stale = field.mark_stale("observed 400 days ago");
    assert!(stale.is_degraded());
    assert!(stale.stale);
}

#[test]
fn set_field_rejects_value_of_wrong_kind() {
    let request = ContextRequest::new("u1", "semi-arid-A", Season::Dry);
    let mut ctx = RecommendationContext::bare(&request, at());
    ctx.set_field(
        ContextFieldKind::Soil,
        ContextField::fetched(FieldValue::Preferences(UserPreferences::default()), at()),
    );
    assert!(!ctx.soil.is_present());
    assert_eq!(ctx.soil.source, FieldSource::Missing);
}

#[test]
fn field_statuses_follow_canonical_order() {
    let request = ContextRequest::new("u1", "semi-arid-A", Season::Dry);
    let ctx = RecommendationContext::bare(&request, at());
    let kinds: Vec<_> = ctx.field_statuses().into_iter().map(|s| s.kind).collect();
    assert_eq!(kinds, ContextFieldKind::ALL.to_vec());
}

#[test]
fn advisor_result_validation_rejects_out_of_range_scores() {
    let ok = AdvisorResult::new(vec![Suggestion::new("Sorghum", "drought tolerant", 0.9)], 0.8);
    assert!(ok.validate().is_ok());

    let bad_conf = AdvisorResult::new(vec![], 1.2);
    assert!(bad_conf.validate().is_err());

    let bad_score = AdvisorResult::new(vec![Suggestion::new("Maize", "", -0.1)], 0.5);
    assert!(bad_score.validate().is_err());

    let nan = AdvisorResult::new(vec![Suggestion::new("Millet", "", f64::NAN)], 0.5);
    assert!(nan.validate().is_err());

    let untitled = AdvisorResult::new(vec![Suggestion::new("  ", "", 0.5)], 0.5);
    assert!(untitled.validate().is_err());
}

#[test]
fn policy_subject_parses_labels() {
    assert_eq!(
        PolicySubject::parse("soil").unwrap(),
        PolicySubject::Field(ContextFieldKind::Soil)
    );
    assert_eq!(
        PolicySubject::parse("field:crop_history").unwrap(),
        PolicySubject::Field(ContextFieldKind::CropHistory)
    );
    assert_eq!(
        PolicySubject::parse("advisor:sustainability").unwrap(),
        PolicySubject::Advisor(AdvisorId::new("sustainability"))
    );
    assert!(PolicySubject::parse("field:moon_phase").is_err());
    assert!(PolicySubject::parse("advisor:").is_err());
    assert_eq!(
        PolicySubject::Field(ContextFieldKind::Weather).to_string(),
        "field:weather"
    );
}

#[test]
fn intent_parse_roundtrips_builtin_and_custom() {
    for intent in Intent::BUILTIN {
        assert_eq!(Intent::parse(intent.as_str()), intent);
    }
    let custom = Intent::parse("Pest_Alert");
    assert_eq!(custom, Intent::Custom("pest_alert".into()));
    assert!(custom.is_custom());
}

#[test]
fn confidence_clamps_and_floors() {
    assert_eq!(Confidence::new(1.7).value(), 1.0);
    assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
    assert_eq!(Confidence::new(0.05).with_floor(0.1).value(), 0.1);
    assert_eq!(Confidence::from(-0.2).value(), 0.0);
    assert_eq!(Confidence::default().value(), 1.0);
}

#[test]
fn outcome_responded_excludes_only_timeouts() {
    let timeout = AdvisorOutcome::Failed {
        failure: PartialFailure::Timeout { after_ms: 100 },
    };
    let error = AdvisorOutcome::Failed {
        failure: PartialFailure::error(AdvisorErrorKind::Internal, "boom"),
    };
    assert!(!timeout.responded());
    assert!(error.responded());
    assert!(error.is_lost());
    assert!(error.result().is_none());
}

fn recommendation(id: Uuid) -> Recommendation {
    Recommendation {
        id,
        intent: Intent::CropRecommendation,
        suggestions: vec![RankedSuggestion {
            rank: 1,
            suggestion: Suggestion::new("Sorghum", "drought tolerant", 0.9),
            score: 0.72,
            advisor: AdvisorId::new("crop"),
            advisor_confidence: 0.8,
            also_suggested_by: vec![],
        }],
        confidence: Confidence::new(0.8),
        explanation: Explanation {
            summary: "summary".into(),
            key_factors: vec![],
            uncertainties: vec![],
        },
        disclaimer: None,
        sources: vec![],
        created_at: Utc::now(),
    }
}

#[test]
fn content_hash_ignores_id_and_creation_time() {
    let a = recommendation(Uuid::new_v4());
    let b = recommendation(Uuid::new_v4());
    assert_ne!(a.id, b.id);
    assert_eq!(a.content_hash().unwrap(), b.content_hash().unwrap());

    let mut c = recommendation(Uuid::new_v4());
    c.confidence = Confidence::new(0.7);
    assert_ne!(a.content_hash().unwrap(), c.content_hash().unwrap());
}
