//! The query executor seam.
//!
//! Executors are opaque I/O: they receive a target id and final query text
//! and answer with a [`QueryResult`] or an [`ExecutorError`]. They must be
//! safe to call again on every fresh trigger; nothing here retries.

use std::sync::Arc;

use async_trait::async_trait;
use querydeck_view::QueryResult;
use serde::{Deserialize, Serialize};

use crate::error::{ExecutorError, UNKNOWN_ERROR};

/// Runs final query text against a data source.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executes `query` against the data source identified by `target`.
    async fn execute(&self, target: &str, query: &str) -> Result<QueryResult, ExecutorError>;
}

#[async_trait]
impl<E: QueryExecutor + ?Sized> QueryExecutor for Arc<E> {
    async fn execute(&self, target: &str, query: &str) -> Result<QueryResult, ExecutorError> {
        (**self).execute(target, query).await
    }
}

/// Wire shape of an executor answer: `{success, data?, error?}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutorResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QueryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutorResponse {
    /// A successful answer.
    pub fn ok(data: QueryResult) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A failed answer.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Converts into a result. Success without data is an empty result.
    pub fn into_result(self) -> Result<QueryResult, ExecutorError> {
        if self.success {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(ExecutorError::Reported(
                self.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ))
        }
    }
}
