//! Error types for query execution.

use std::any::Any;

use thiserror::Error;

/// Message used when an executor reports failure without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Message used when an executor fault carries no readable payload.
pub const EXECUTION_FAILED: &str = "Failed to execute query";

/// Why a query produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// The executor answered with `success = false`.
    #[error("{0}")]
    Reported(String),

    /// The executor raised instead of answering.
    #[error("{0}")]
    Fault(String),
}

impl ExecutorError {
    /// Builds an [`ExecutorError::Fault`] from a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            EXECUTION_FAILED.to_string()
        };
        ExecutorError::Fault(message)
    }
}

/// A request that should not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("query text is required")]
    MissingQuery,

    #[error("data source is required")]
    MissingTarget,
}
