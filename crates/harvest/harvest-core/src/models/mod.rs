//! Data model shared by the resolver, dispatcher, aggregator, and explanation composer.

pub mod advisor;
pub mod context;
pub mod degradation;
pub mod outcome;
pub mod recommendation;

pub use advisor::{AdvisorId, AdvisorResult, DataFreshness, Factor, Impact, Priority, Suggestion};
pub use context::{
    ContextField, ContextFieldKind, ContextRequest, CropHistory, CropSeasonRecord, FieldSource,
    FieldStatus, FieldValue, Observed, RecommendationContext, Season, SoilInfo, SoilTexture,
    SuppliedInputs, UserPreferences, WeatherSnapshot,
};
pub use degradation::{DegradationAction, DegradationEvent, PolicySubject};
pub use outcome::{AdvisorErrorKind, AdvisorOutcome, AdvisorReport, PartialFailure};
pub use recommendation::{
    DataSource, Explanation, Freshness, KeyFactor, RankedSuggestion, Recommendation, SourceKind,
};
