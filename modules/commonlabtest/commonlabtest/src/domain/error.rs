use commonlabtest_sdk::{CommonLabTestError, Privilege};

/// Domain-level errors for the commonlabtest service.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{message}")]
    InvalidArgument { message: String },

    #[error("Privilege required: {privilege}")]
    NotAuthorized { privilege: Privilege },

    #[error("Database error: {message}")]
    Database { message: String },

    /// A dependent record could not be purged during a cascading delete.
    #[error("Cascade delete failed while {step}: {message}")]
    CascadeFailed { step: String, message: String },
}

impl DomainError {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_authorized(privilege: Privilege) -> Self {
        Self::NotAuthorized { privilege }
    }

    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn cascade_failed(step: impl Into<String>, cause: &Self) -> Self {
        Self::CascadeFailed {
            step: step.into(),
            message: cause.to_string(),
        }
    }
}

impl From<DomainError> for CommonLabTestError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidArgument { message } => Self::invalid_argument(message),
            DomainError::NotAuthorized { privilege } => Self::not_authorized(privilege.name()),
            e @ (DomainError::Database { .. } | DomainError::CascadeFailed { .. }) => {
                Self::operation_failed(e.to_string())
            }
        }
    }
}
