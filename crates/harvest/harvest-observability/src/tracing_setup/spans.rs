//! Span definitions per request stage: resolve, dispatch, aggregate.

/// Create the top-level span for one recommendation request.
#[macro_export]
macro_rules! request_span {
    ($intent:expr, $region:expr) => {
        tracing::info_span!("harvest.request", intent = %$intent, region = %$region)
    };
}

/// Create a context resolution span.
#[macro_export]
macro_rules! resolve_span {
    ($intent:expr) => {
        tracing::info_span!("harvest.resolve", intent = %$intent)
    };
}

/// Create a dispatch span.
#[macro_export]
macro_rules! dispatch_span {
    ($intent:expr, $advisor_count:expr) => {
        tracing::info_span!("harvest.dispatch", intent = %$intent, advisors = $advisor_count)
    };
}

/// Create an aggregation span.
#[macro_export]
macro_rules! aggregation_span {
    ($intent:expr, $surviving:expr) => {
        tracing::info_span!("harvest.aggregate", intent = %$intent, surviving = $surviving)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const REQUEST: &str = "harvest.request";
    pub const RESOLVE: &str = "harvest.resolve";
    pub const DISPATCH: &str = "harvest.dispatch";
    pub const AGGREGATE: &str = "harvest.aggregate";
}
