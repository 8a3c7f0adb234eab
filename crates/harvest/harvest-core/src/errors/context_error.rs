use crate::models::ContextFieldKind;

/// Context resolution errors. Only a field the policy marks mandatory can fail a resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("mandatory context field {field} unavailable: {reason}")]
    MandatoryFieldUnavailable {
        field: ContextFieldKind,
        reason: String,
    },

    #[error("invalid context request: {reason}")]
    InvalidRequest { reason: String },
}

/// Failure of a single upstream context source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("no data for region {region}")]
    NotFound { region: String },

    #[error("source timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
}
