//! Single-shot view processing.
//!
//! [`process_view`] runs the lookup, transform and validate steps once and
//! returns the view data or the first error. It holds no state; the
//! observable, supersedable version lives in the pipeline crate.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::registry::ProcessorRegistry;
use crate::result::QueryResult;

/// Routes `raw` through the processor registered for `view_id`.
///
/// Unknown view ids fail with
/// [`ViewError::ProcessorNotFound`](crate::ViewError::ProcessorNotFound)
/// before any processor function runs.
pub async fn process_view(
    registry: &ProcessorRegistry,
    view_id: &str,
    raw: Arc<QueryResult>,
    config: Option<Value>,
) -> Result<Value> {
    let processor = registry.get(view_id).inspect_err(|e| {
        warn!(view = view_id, error = %e, "no processor registered");
    })?;

    debug!(view = view_id, rows = raw.row_count(), "transforming result");
    let data = processor
        .run_transform(raw, config)
        .await
        .inspect_err(|e| warn!(view = view_id, error = %e, "transform rejected result"))?;

    processor
        .run_validate(&data)
        .inspect_err(|e| warn!(view = view_id, error = %e, "validation rejected data"))?;

    debug!(view = view_id, "view data ready");
    Ok(data)
}
