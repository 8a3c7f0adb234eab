//! Per-region fallback values used by `substitute_regional_default`.

use std::collections::HashMap;

use harvest_core::errors::ConfigurationError;
use harvest_core::models::{
    ContextFieldKind, CropHistory, FieldValue, SoilInfo, UserPreferences, WeatherSnapshot,
};
use serde::{Deserialize, Serialize};

/// Long-run averages for one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionProfile {
    pub weather: Option<WeatherSnapshot>,
    pub soil: Option<SoilInfo>,
    pub crop_history: Option<CropHistory>,
    pub preferences: Option<UserPreferences>,
}

impl RegionProfile {
    fn get(&self, kind: ContextFieldKind) -> Option<FieldValue> {
        match kind {
            ContextFieldKind::Weather => self.weather.clone().map(FieldValue::Weather),
            ContextFieldKind::Soil => self.soil.clone().map(FieldValue::Soil),
            ContextFieldKind::CropHistory => self.crop_history.clone().map(FieldValue::CropHistory),
            ContextFieldKind::Preferences => self.preferences.clone().map(FieldValue::Preferences),
        }
    }
}

/// Region id -> profile table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionalDefaults {
    profiles: HashMap<String, RegionProfile>,
}

impl RegionalDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON object keyed by region id.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| ConfigurationError::Parse {
            reason: format!("regional defaults: {e}"),
        })
    }

    pub fn with_profile(mut self, region: impl Into<String>, profile: RegionProfile) -> Self {
        self.profiles.insert(region.into(), profile);
        self
    }

    /// Default value for one field of one region, if the table has it.
    pub fn get(&self, region: &str, kind: ContextFieldKind) -> Option<FieldValue> {
        self.profiles.get(region).and_then(|p| p.get(kind))
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}
