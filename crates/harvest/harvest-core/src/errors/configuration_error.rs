/// Configuration problems. Detected at startup or registration time, never mid-request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("degradation policy has no rule for intent {intent}, subject {subject}")]
    UnmappedDegradation { intent: String, subject: String },

    #[error("action {action} is not valid for subject {subject}: {reason}")]
    InvalidAction {
        subject: String,
        action: String,
        reason: String,
    },

    #[error("duplicate degradation rule for intent {intent}, subject {subject}")]
    DuplicateRule { intent: String, subject: String },

    #[error("unknown policy subject: {label}")]
    UnknownSubject { label: String },

    #[error("advisor {advisor} is already registered for intent {intent}")]
    DuplicateAdvisor { intent: String, advisor: String },

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("failed to parse configuration: {reason}")]
    Parse { reason: String },
}
