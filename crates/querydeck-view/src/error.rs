//! Error types for view processing.

use std::any::Any;

use thiserror::Error;

/// Generic message for a transform that produced no data.
pub const INVALID_DATA: &str = "Invalid data";

/// Generic message for a validator that rejected data without saying why.
pub const VALIDATION_FAILED: &str = "Data validation failed";

/// Why a raw result could not be turned into view data.
///
/// All variants display as a human-readable message suitable for an error
/// panel. Callers that want to fall back to a default view can match on
/// [`ViewError::ProcessorNotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// No processor is registered for the requested view type.
    #[error("View {0} not found")]
    ProcessorNotFound(String),

    /// The processor's transform step rejected the raw result.
    #[error("{0}")]
    TransformInvalid(String),

    /// The processor's validate step rejected the transformed data.
    #[error("{0}")]
    ValidationInvalid(String),

    /// A processor function panicked.
    #[error("{0}")]
    Fault(String),
}

impl ViewError {
    /// Returns `true` for [`ViewError::ProcessorNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, ViewError::ProcessorNotFound(_))
    }

    /// Builds a [`ViewError::Fault`] from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "An error occurred".to_string()
        };
        ViewError::Fault(message)
    }
}

/// Errors raised while building a [`ProcessorRegistry`](crate::ProcessorRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A view id was registered twice.
    #[error("processor for view '{0}' is already registered")]
    DuplicateProcessor(String),

    /// The fallback view id has no registered processor.
    #[error("fallback view '{0}' is not registered")]
    UnknownFallback(String),
}

/// Result type for view processing.
pub type Result<T> = std::result::Result<T, ViewError>;
