//! Processor abstraction.
//!
//! A [`Processor`] is the pair of optional functions a view type supplies:
//!
//! ```text
//! raw QueryResult
//!   → TRANSFORM ← (reshape rows into view data; may suspend)
//!   → VALIDATE  ← (reject data the view cannot show)
//!   → view data
//! ```
//!
//! A missing transform passes the raw result through unchanged. A missing
//! validator accepts everything.

use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ViewError, INVALID_DATA, VALIDATION_FAILED};
use crate::result::QueryResult;

/// Outcome of a transform step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Processed {
    /// Whether the raw result could be transformed.
    pub is_valid: bool,
    /// Transformed view data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Reason for rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Processed {
    /// A successful transform producing `data`.
    pub fn valid(data: Value) -> Self {
        Self {
            is_valid: true,
            data: Some(data),
            error: None,
        }
    }

    /// A successful transform producing serialized `data`.
    ///
    /// Serialization failures become an invalid outcome.
    pub fn serialize<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self::valid(value),
            Err(e) => Self::invalid(e.to_string()),
        }
    }

    /// A rejected transform.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of a validate step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Validation {
    /// Whether the data is acceptable.
    pub is_valid: bool,
    /// Reason for rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Validation {
    /// Accepts the data.
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    /// Rejects the data.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

/// The transform function signature.
///
/// Receives the shared raw result and an optional view configuration.
pub type TransformFn =
    Arc<dyn Fn(Arc<QueryResult>, Option<Value>) -> BoxFuture<'static, Processed> + Send + Sync>;

/// The validate function signature.
pub type ValidateFn = Arc<dyn Fn(&Value) -> Validation + Send + Sync>;

/// A view type's transform/validate pair.
///
/// # Example
///
/// ```rust
/// use querydeck_view::{Processed, Processor, Validation};
/// use serde_json::json;
///
/// let processor = Processor::new()
///     .transform(|raw, _config| Processed::valid(json!({ "count": raw.row_count() })))
///     .validate(|data| {
///         if data["count"].as_u64() == Some(0) {
///             Validation::fail("nothing to count")
///         } else {
///             Validation::ok()
///         }
///     });
/// assert!(processor.has_transform());
/// ```
#[derive(Clone, Default)]
pub struct Processor {
    transform: Option<TransformFn>,
    validate: Option<ValidateFn>,
}

impl Processor {
    /// Creates a processor with neither step: raw results pass straight through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a synchronous transform.
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&QueryResult, Option<&Value>) -> Processed + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        self.transform = Some(Arc::new(move |raw: Arc<QueryResult>, config: Option<Value>| {
            let f = Arc::clone(&f);
            async move { f(&raw, config.as_ref()) }.boxed()
        }));
        self
    }

    /// Sets an asynchronous transform.
    pub fn transform_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<QueryResult>, Option<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Processed> + Send + 'static,
    {
        self.transform = Some(Arc::new(
            move |raw: Arc<QueryResult>, config: Option<Value>| f(raw, config).boxed(),
        ));
        self
    }

    /// Sets the validator.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Validation + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(f));
        self
    }

    /// Returns `true` if a transform step is set.
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Returns `true` if a validate step is set.
    pub fn has_validate(&self) -> bool {
        self.validate.is_some()
    }

    /// Runs the transform step.
    ///
    /// Rejections, missing data and panics all come back as errors.
    pub async fn run_transform(
        &self,
        raw: Arc<QueryResult>,
        config: Option<Value>,
    ) -> Result<Value> {
        let processed = match &self.transform {
            Some(transform) => {
                let transform = Arc::clone(transform);
                AssertUnwindSafe(async move { transform(raw, config).await })
                    .catch_unwind()
                    .await
                    .map_err(ViewError::from_panic)?
            }
            None => Processed::serialize(&*raw),
        };

        match processed {
            Processed {
                is_valid: true,
                data: Some(data),
                ..
            } if !data.is_null() => Ok(data),
            Processed { error, .. } => Err(ViewError::TransformInvalid(
                error.unwrap_or_else(|| INVALID_DATA.to_string()),
            )),
        }
    }

    /// Runs the validate step.
    pub fn run_validate(&self, data: &Value) -> Result<()> {
        let Some(validate) = &self.validate else {
            return Ok(());
        };

        let validation = panic::catch_unwind(AssertUnwindSafe(|| validate(data)))
            .map_err(ViewError::from_panic)?;

        if validation.is_valid {
            Ok(())
        } else {
            Err(ViewError::ValidationInvalid(
                validation
                    .error
                    .unwrap_or_else(|| VALIDATION_FAILED.to_string()),
            ))
        }
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("transform", &self.transform.is_some())
            .field("validate", &self.validate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Column;
    use serde_json::json;

    fn raw() -> Arc<QueryResult> {
        Arc::new(
            QueryResult::new(vec![Column::new("n", "int4")])
                .with_row(json!({"n": 1}))
                .with_row(json!({"n": 2})),
        )
    }

    #[tokio::test]
    async fn test_missing_transform_passes_through() {
        let processor = Processor::new();
        let data = processor.run_transform(raw(), None).await.unwrap();
        assert_eq!(data, serde_json::to_value(&*raw()).unwrap());
    }

    #[tokio::test]
    async fn test_sync_transform_receives_config() {
        let processor = Processor::new().transform(|raw, config| {
            let scale = config.and_then(|c| c["scale"].as_u64()).unwrap_or(1);
            Processed::valid(json!(raw.row_count() as u64 * scale))
        });

        let data = processor
            .run_transform(raw(), Some(json!({"scale": 10})))
            .await
            .unwrap();
        assert_eq!(data, json!(20));
    }

    #[tokio::test]
    async fn test_async_transform() {
        let processor = Processor::new().transform_async(|raw, _config| async move {
            tokio::task::yield_now().await;
            Processed::valid(json!(raw.row_count()))
        });
        assert_eq!(processor.run_transform(raw(), None).await.unwrap(), json!(2));
    }

    #[tokio::test]
    async fn test_invalid_transform_reports_message() {
        let processor = Processor::new().transform(|_, _| Processed::invalid("no rows"));
        let err = processor.run_transform(raw(), None).await.unwrap_err();
        assert_eq!(err, ViewError::TransformInvalid("no rows".into()));
    }

    #[tokio::test]
    async fn test_transform_without_data_is_invalid() {
        let processor = Processor::new().transform(|_, _| Processed {
            is_valid: true,
            data: None,
            error: None,
        });
        let err = processor.run_transform(raw(), None).await.unwrap_err();
        assert_eq!(err, ViewError::TransformInvalid(INVALID_DATA.into()));

        let processor = Processor::new().transform(|_, _| Processed::valid(Value::Null));
        assert!(processor.run_transform(raw(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_transform_panic_is_caught() {
        let processor = Processor::new().transform(|_, _| panic!("transform exploded"));
        let err = processor.run_transform(raw(), None).await.unwrap_err();
        assert_eq!(err, ViewError::Fault("transform exploded".into()));
    }

    #[test]
    fn test_missing_validate_accepts() {
        assert!(Processor::new().run_validate(&json!(null)).is_ok());
    }

    #[test]
    fn test_validate_rejection() {
        let processor = Processor::new().validate(|_| Validation::fail("too small"));
        assert_eq!(
            processor.run_validate(&json!(1)).unwrap_err(),
            ViewError::ValidationInvalid("too small".into())
        );

        let processor = Processor::new().validate(|_| Validation {
            is_valid: false,
            error: None,
        });
        assert_eq!(
            processor.run_validate(&json!(1)).unwrap_err(),
            ViewError::ValidationInvalid(VALIDATION_FAILED.into())
        );
    }

    #[test]
    fn test_validate_panic_is_caught() {
        let processor = Processor::new().validate(|_| panic!("validator exploded"));
        assert!(matches!(
            processor.run_validate(&json!(1)),
            Err(ViewError::Fault(_))
        ));
    }

    #[test]
    fn test_debug_shows_steps() {
        let debug = format!("{:?}", Processor::new().validate(|_| Validation::ok()));
        assert!(debug.contains("transform: false"));
        assert!(debug.contains("validate: true"));
    }
}
