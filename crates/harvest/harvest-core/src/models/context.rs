//! Resolved request context with explicit per-field provenance.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Growing season the request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
    Wet,
    Dry,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
            Self::Wet => "wet",
            Self::Dry => "dry",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The context fields that are fetched independently and may fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFieldKind {
    Weather,
    Soil,
    CropHistory,
    Preferences,
}

impl ContextFieldKind {
    pub const ALL: [ContextFieldKind; 4] = [
        Self::Weather,
        Self::Soil,
        Self::CropHistory,
        Self::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Soil => "soil",
            Self::CropHistory => "crop_history",
            Self::Preferences => "preferences",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == normalized)
    }
}

impl fmt::Display for ContextFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a context field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// Supplied directly by the user with the request.
    UserInput,
    /// Fetched from the upstream data service.
    Fetched,
    /// Substituted from the regional default table.
    RegionalDefault,
    /// Served from the last good cached value after an upstream failure.
    Cached,
    /// Not available; `note` records why.
    Missing,
}

/// One optional context field plus its provenance.
///
/// A missing or substituted value always carries a note, so absence is never
/// silent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextField<T> {
    pub value: Option<T>,
    pub source: FieldSource,
    pub observed_at: Option<DateTime<Utc>>,
    pub stale: bool,
    pub note: Option<String>,
}

impl<T> ContextField<T> {
    /// Caller-supplied value. It carries no observation time, so repeated
    /// requests with the same inputs produce the same field.
    pub fn user_input(value: T) -> Self {
        Self {
            value: Some(value),
            source: FieldSource::UserInput,
            observed_at: None,
            stale: false,
            note: None,
        }
    }

    pub fn fetched(value: T, observed_at: DateTime<Utc>) -> Self {
        Self::present(value, FieldSource::Fetched, observed_at)
    }

    pub fn cached(value: T, observed_at: DateTime<Utc>, reason: impl Into<String>) -> Self {
        Self {
            note: Some(reason.into()),
            ..Self::present(value, FieldSource::Cached, observed_at)
        }
    }

    pub fn regional_default(value: T, note: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            source: FieldSource::RegionalDefault,
            observed_at: None,
            stale: false,
            note: Some(note.into()),
        }
    }

    pub fn missing(reason: impl Into<String>) -> Self {
        Self {
            value: None,
            source: FieldSource::Missing,
            observed_at: None,
            stale: false,
            note: Some(reason.into()),
        }
    }

    fn present(value: T, source: FieldSource, observed_at: DateTime<Utc>) -> Self {
        Self {
            value: Some(value),
            source,
            observed_at: Some(observed_at),
            stale: false,
            note: None,
        }
    }

    /// Keep the value but flag it as older than the configured max age.
    pub fn mark_stale(mut self, note: impl Into<String>) -> Self {
        self.stale = true;
        self.note = Some(note.into());
        self
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    /// Anything other than fresh user or upstream data.
    pub fn is_degraded(&self) -> bool {
        self.stale
            || matches!(
                self.source,
                FieldSource::Missing | FieldSource::RegionalDefault | FieldSource::Cached
            )
    }

    /// Convert the value, keeping provenance. A value `convert` rejects turns the
    /// field into `Missing`.
    pub fn try_map<U>(self, convert: impl FnOnce(T) -> Option<U>) -> ContextField<U> {
        match self.value {
            Some(value) => match convert(value) {
                Some(converted) => ContextField {
                    value: Some(converted),
                    source: self.source,
                    observed_at: self.observed_at,
                    stale: self.stale,
                    note: self.note,
                },
                None => ContextField::missing("source returned a value of the wrong kind"),
            },
            None => ContextField {
                value: None,
                source: self.source,
                observed_at: self.observed_at,
                stale: self.stale,
                note: self.note,
            },
        }
    }

    fn status(&self, kind: ContextFieldKind) -> FieldStatus {
        FieldStatus {
            kind,
            source: self.source,
            stale: self.stale,
            observed_at: self.observed_at,
            note: self.note.clone(),
        }
    }
}

/// Provenance of one field, detached from its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub kind: ContextFieldKind,
    pub source: FieldSource,
    pub stale: bool,
    pub observed_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl FieldStatus {
    pub fn is_degraded(&self) -> bool {
        self.stale
            || matches!(
                self.source,
                FieldSource::Missing | FieldSource::RegionalDefault | FieldSource::Cached
            )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    /// Rainfall over the last 7 days.
    pub rainfall_mm_7d: f64,
    /// Forecast rainfall over the next 7 days.
    pub forecast_rain_mm_7d: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilTexture {
    Sandy,
    Loam,
    Clay,
    Silt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilInfo {
    pub texture: SoilTexture,
    pub ph: f64,
    pub organic_matter_pct: f64,
    #[serde(default)]
    pub moisture_pct: Option<f64>,
    #[serde(default)]
    pub nitrogen_kg_ha: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSeasonRecord {
    pub crop: String,
    pub season: Season,
    pub year: i32,
    #[serde(default)]
    pub yield_t_ha: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CropHistory {
    /// Most recent season first.
    pub seasons: Vec<CropSeasonRecord>,
}

impl CropHistory {
    pub fn last_crop(&self) -> Option<&str> {
        self.seasons.first().map(|s| s.crop.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub preferred_crops: Vec<String>,
    #[serde(default)]
    pub organic_only: bool,
    #[serde(default)]
    pub water_budget_mm: Option<f64>,
}

/// A value produced by one context source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum FieldValue {
    Weather(WeatherSnapshot),
    Soil(SoilInfo),
    CropHistory(CropHistory),
    Preferences(UserPreferences),
}

impl FieldValue {
    pub fn kind(&self) -> ContextFieldKind {
        match self {
            Self::Weather(_) => ContextFieldKind::Weather,
            Self::Soil(_) => ContextFieldKind::Soil,
            Self::CropHistory(_) => ContextFieldKind::CropHistory,
            Self::Preferences(_) => ContextFieldKind::Preferences,
        }
    }
}

/// A source value with the time it was observed upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observed<T> {
    pub value: T,
    pub observed_at: DateTime<Utc>,
    /// Set when the value is a last-good copy served because the upstream failed;
    /// holds the upstream failure.
    #[serde(default)]
    pub cache_fallback: Option<String>,
}

impl<T> Observed<T> {
    pub fn new(value: T, observed_at: DateTime<Utc>) -> Self {
        Self {
            value,
            observed_at,
            cache_fallback: None,
        }
    }

    pub fn from_cache(mut self, upstream_failure: impl Into<String>) -> Self {
        self.cache_fallback = Some(upstream_failure.into());
        self
    }
}

/// Values the user entered with the request. These bypass the fetch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuppliedInputs {
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub soil: Option<SoilInfo>,
    #[serde(default)]
    pub crop_history: Option<CropHistory>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

impl SuppliedInputs {
    pub fn get(&self, kind: ContextFieldKind) -> Option<FieldValue> {
        match kind {
            ContextFieldKind::Weather => self.weather.clone().map(FieldValue::Weather),
            ContextFieldKind::Soil => self.soil.clone().map(FieldValue::Soil),
            ContextFieldKind::CropHistory => self.crop_history.clone().map(FieldValue::CropHistory),
            ContextFieldKind::Preferences => self.preferences.clone().map(FieldValue::Preferences),
        }
    }
}

/// Caller inputs for context resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRequest {
    pub user_id: String,
    pub region: String,
    pub season: Season,
    #[serde(default)]
    pub supplied: SuppliedInputs,
}

impl ContextRequest {
    pub fn new(user_id: impl Into<String>, region: impl Into<String>, season: Season) -> Self {
        Self {
            user_id: user_id.into(),
            region: region.into(),
            season,
            supplied: SuppliedInputs::default(),
        }
    }

    pub fn with_supplied(mut self, supplied: SuppliedInputs) -> Self {
        self.supplied = supplied;
        self
    }
}

/// The resolved bundle handed (read-only) to every advisor of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    pub user_id: String,
    pub region: String,
    pub season: Season,
    pub weather: ContextField<WeatherSnapshot>,
    pub soil: ContextField<SoilInfo>,
    pub crop_history: ContextField<CropHistory>,
    pub preferences: ContextField<UserPreferences>,
    pub resolved_at: DateTime<Utc>,
}

impl RecommendationContext {
    /// A context with every optional field missing, for callers that fill fields in later.
    pub fn bare(request: &ContextRequest, resolved_at: DateTime<Utc>) -> Self {
        let not_resolved = "not resolved";
        Self {
            user_id: request.user_id.clone(),
            region: request.region.clone(),
            season: request.season,
            weather: ContextField::missing(not_resolved),
            soil: ContextField::missing(not_resolved),
            crop_history: ContextField::missing(not_resolved),
            preferences: ContextField::missing(not_resolved),
            resolved_at,
        }
    }

    /// Store a resolved field under `kind`.
    pub fn set_field(&mut self, kind: ContextFieldKind, field: ContextField<FieldValue>) {
        match kind {
            ContextFieldKind::Weather => {
                self.weather = field.try_map(|v| match v {
                    FieldValue::Weather(w) => Some(w),
                    _ => None,
                })
            }
            ContextFieldKind::Soil => {
                self.soil = field.try_map(|v| match v {
                    FieldValue::Soil(s) => Some(s),
                    _ => None,
                })
            }
            ContextFieldKind::CropHistory => {
                self.crop_history = field.try_map(|v| match v {
                    FieldValue::CropHistory(h) => Some(h),
                    _ => None,
                })
            }
            ContextFieldKind::Preferences => {
                self.preferences = field.try_map(|v| match v {
                    FieldValue::Preferences(p) => Some(p),
                    _ => None,
                })
            }
        }
    }

    pub fn field_status(&self, kind: ContextFieldKind) -> FieldStatus {
        match kind {
            ContextFieldKind::Weather => self.weather.status(kind),
            ContextFieldKind::Soil => self.soil.status(kind),
            ContextFieldKind::CropHistory => self.crop_history.status(kind),
            ContextFieldKind::Preferences => self.preferences.status(kind),
        }
    }

    /// Provenance of every field, in `ContextFieldKind::ALL` order.
    pub fn field_statuses(&self) -> Vec<FieldStatus> {
        ContextFieldKind::ALL
            .iter()
            .map(|kind| self.field_status(*kind))
            .collect()
    }
}
