//! Public error types for the commonlabtest module.
//!
//! These errors are safe to expose to other modules and consumers. Absence of
//! a record is never an error: lookups return `Option`.

use thiserror::Error;

/// Errors that can be returned by the `CommonLabTestClientV1`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonLabTestError {
    /// The request was rejected before reaching storage.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// The caller lacks the privilege required by the operation.
    #[error("Privilege required: {privilege}")]
    NotAuthorized { privilege: String },

    /// Storage rejected or failed the operation; carries the underlying message.
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl CommonLabTestError {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_authorized(privilege: impl Into<String>) -> Self {
        Self::NotAuthorized {
            privilege: privilege.into(),
        }
    }

    #[must_use]
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
