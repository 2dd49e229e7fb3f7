//! Error taxonomy shared by the registry, catalog and executor
//!
//! Error codes:
//! - DAS_NOT_FOUND (instance or table lookup failed)
//! - DAS_UNSUPPORTED (capability or mutation not offered)
//! - DAS_INVALID_ARGUMENT (malformed request shape)
//! - DAS_INTERNAL (construction failure, poisoned state)
//!
//! Cancellation is not an error: a cancelled stream simply ends early.

use thiserror::Error;

/// Result type for DAS operations
pub type DasResult<T> = Result<T, DasError>;

/// Errors raised by the DAS core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DasError {
    /// Referenced instance id is not registered
    #[error("DAS not found: {0}")]
    InstanceNotFound(String),

    /// Table name is unknown within a found instance
    #[error("Unknown table: {0}")]
    TableNotFound(String),

    /// Registration named a type discriminator no factory handles
    #[error("Unsupported DAS type: {0}")]
    UnsupportedType(String),

    /// Operation is not offered by the table
    #[error("{0} not supported.")]
    Unsupported(String),

    /// Request shape or option value is invalid
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Instance construction failed
    #[error("Failed to build DAS instance: {0}")]
    Construction(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DasError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DasError::InstanceNotFound(_) | DasError::TableNotFound(_) => "DAS_NOT_FOUND",
            DasError::Unsupported(_) => "DAS_UNSUPPORTED",
            DasError::UnsupportedType(_) | DasError::InvalidArgument(_) => "DAS_INVALID_ARGUMENT",
            DasError::Construction(_) | DasError::Internal(_) => "DAS_INTERNAL",
        }
    }

    /// Returns true for lookup failures the caller recovers from by
    /// re-registering or correcting a name
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DasError::InstanceNotFound(_) | DasError::TableNotFound(_)
        )
    }

    /// Create an unsupported-operation error
    pub fn unsupported(operation: impl Into<String>) -> Self {
        DasError::Unsupported(operation.into())
    }

    /// Create an internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        DasError::Internal(reason.into())
    }
}
