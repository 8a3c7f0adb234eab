use crate::models::AdvisorErrorKind;

/// Error returned by an advisor implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisorError {
    #[error("advisor unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("context insufficient for advisor: {reason}")]
    InvalidContext { reason: String },

    #[error("advisor failed: {reason}")]
    Internal { reason: String },

    #[error("advisor cancelled")]
    Cancelled,
}

impl AdvisorError {
    pub fn kind(&self) -> AdvisorErrorKind {
        match self {
            Self::Unavailable { .. } => AdvisorErrorKind::Unavailable,
            Self::InvalidContext { .. } => AdvisorErrorKind::InvalidContext,
            Self::Internal { .. } => AdvisorErrorKind::Internal,
            Self::Cancelled => AdvisorErrorKind::Cancelled,
        }
    }
}
