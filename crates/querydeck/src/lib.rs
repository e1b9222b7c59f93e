//! # querydeck - Parameterized Queries, Pluggable Views
//!
//! querydeck takes a saved query, fills in its variables, runs it against a
//! data source and reshapes the raw rows for the view that will display them.
//!
//! ```text
//! QueryDefinition
//!   → template + variables ─► substitute ─► final query text
//!   → QueryExecutor ─► QueryResult
//!   → ProcessorRegistry[view] ─► transform ─► validate ─► view data
//! ```
//!
//! The pieces live in separate crates and are re-exported here:
//!
//! - [`template`]: placeholder extraction and literal substitution
//! - [`view`]: result model, processors, registry and built-in views
//! - [`pipeline`]: execution and view processing state machines
//!
//! This crate adds the host-facing layer: [`QueryDefinition`] (loaded from
//! YAML or JSON), the [`DefinitionStore`] seam and [`logging`] setup.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use querydeck::{
//!     async_trait, ExecutorError, Panel, ProcessorRegistry, QueryDefinition, QueryExecutor,
//!     QueryResult,
//! };
//!
//! struct Count;
//!
//! #[async_trait]
//! impl QueryExecutor for Count {
//!     async fn execute(&self, _target: &str, query: &str) -> Result<QueryResult, ExecutorError> {
//!         assert_eq!(query, "SELECT count(*) AS value FROM orders WHERE status = 'paid'");
//!         Ok(serde_json::from_value(serde_json::json!({
//!             "rows": [{"value": 12}],
//!             "columns": [{"name": "value", "type": "int8"}]
//!         }))
//!         .unwrap())
//!     }
//! }
//!
//! let mut definition = QueryDefinition::from_yaml(r#"
//! id: paid-orders
//! template: "SELECT count(*) AS value FROM orders WHERE status = {{status}}"
//! target: shop
//! view: number
//! "#).unwrap();
//! definition.sync_variables();
//! definition.set_value("status", "paid");
//!
//! let panel = Panel::new(Arc::new(Count), Arc::new(ProcessorRegistry::with_builtins()));
//! # block_on(async {
//! let state = panel
//!     .refresh(&definition.to_request(), &definition.view, definition.view_config.clone())
//!     .await
//!     .completed()
//!     .unwrap();
//! assert_eq!(state.data().unwrap()["value"], 12);
//! # });
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod definition;
mod error;
pub mod logging;
pub mod store;

pub use querydeck_pipeline as pipeline;
pub use querydeck_template as template;
pub use querydeck_view as view;

pub use definition::QueryDefinition;
pub use error::DefinitionError;
pub use store::{DefinitionStore, MemoryDefinitionStore};

// Frequently used items from the member crates.
pub use querydeck_pipeline::{
    ExecutionRequest, ExecutionState, ExecutorError, ExecutorResponse, Lifecycle, Outcome, Panel,
    PanelState, QueryExecution, QueryExecutor, ViewProcessing, ViewState,
};
pub use querydeck_template::{extract, substitute, unresolved, Variable, VariableType};
pub use querydeck_view::{
    Processed, Processor, ProcessorRegistry, QueryResult, Validation, ViewDefinition, ViewError,
};

/// Re-exported so executors can be implemented without a direct dependency.
pub use async_trait::async_trait;
