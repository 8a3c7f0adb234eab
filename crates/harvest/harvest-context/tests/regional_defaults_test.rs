use harvest_context::RegionalDefaults;
use harvest_core::models::{ContextFieldKind, FieldValue};

#[test]
fn loads_profiles_from_json() {
    let json = r#"{
        "kisumu": {
            "soil": { "texture": "clay", "ph": 5.9, "organic_matter_pct": 3.1 }
        }
    }"#;
    let defaults = RegionalDefaults::from_json(json).unwrap();

    match defaults.get("kisumu", ContextFieldKind::Soil) {
        Some(FieldValue::Soil(soil)) => {
            assert_eq!(soil.ph, 5.9);
            assert_eq!(soil.moisture_pct, None);
        }
        other => panic!("expected soil default, got {other:?}"),
    }
    assert!(defaults.get("kisumu", ContextFieldKind::Weather).is_none());
    assert!(defaults.get("nakuru", ContextFieldKind::Soil).is_none());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = RegionalDefaults::from_json("{ not json").unwrap_err();
    assert!(err.to_string().contains("regional defaults"));
}
