//! Query execution and view processing state machines for querydeck.
//!
//! Two state machines share the same lifecycle:
//!
//! ```text
//! init ──execute/process──► executing ──► completed
//!   ▲                                         │
//!   └───────────────── reset ◄────────────────┘
//! ```
//!
//! - [`QueryExecution`] substitutes a request's variables, runs the final query
//!   through a [`QueryExecutor`] and publishes the raw result or error.
//! - [`ViewProcessing`] routes a raw result through a
//!   [`ProcessorRegistry`](querydeck_view::ProcessorRegistry) and publishes the
//!   view data or error.
//! - [`Panel`] chains the two for one dashboard block.
//!
//! Failures are never returned as `Err`: they end in `completed` with the
//! error field set, so hosts branch on state rather than on control flow.
//!
//! # Last Trigger Wins
//!
//! A subject may be triggered again while a previous call is still awaiting
//! its executor or transform. Only the most recent trigger can commit; older
//! calls return [`Outcome::Superseded`] and leave the state alone. `reset`
//! and teardown (`cancel`) supersede in-flight calls the same way. Nothing is
//! aborted: a superseded call still runs to completion, its result is dropped.
//!
//! # Observing State
//!
//! Each machine publishes through a `tokio::sync::watch` channel. Use
//! `state()` for a snapshot or `subscribe()` to be notified on every
//! transition.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use querydeck_pipeline::{ExecutionRequest, ExecutorError, Panel, QueryExecutor};
//! use querydeck_view::{Column, ProcessorRegistry, QueryResult};
//! use serde_json::json;
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl QueryExecutor for Fixed {
//!     async fn execute(&self, _target: &str, _query: &str) -> Result<QueryResult, ExecutorError> {
//!         Ok(QueryResult::new(vec![Column::new("value", "int4")]).with_row(json!({"value": 42})))
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let panel = Panel::new(Arc::new(Fixed), Arc::new(ProcessorRegistry::with_builtins()));
//! let request = ExecutionRequest::new("SELECT count(*) AS value FROM orders", "shop");
//!
//! let state = panel.refresh(&request, "metric", None).await.completed().unwrap();
//! assert_eq!(state.data().unwrap()["value"], 42);
//! # });
//! ```

mod error;
mod execution;
mod executor;
mod lifecycle;
mod panel;
mod request;
mod view_processing;

pub use error::{ExecutorError, RequestError, EXECUTION_FAILED, UNKNOWN_ERROR};
pub use execution::{ExecutionOutcome, ExecutionState, QueryExecution};
pub use executor::{ExecutorResponse, QueryExecutor};
pub use lifecycle::{Lifecycle, Outcome};
pub use panel::{Panel, PanelOutcome, PanelState};
pub use request::ExecutionRequest;
pub use view_processing::{ProcessOutcome, ViewProcessing, ViewState};
