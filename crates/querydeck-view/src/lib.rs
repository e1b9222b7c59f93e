//! View processing for querydeck.
//!
//! A query produces a raw [`QueryResult`]. Before it reaches a chart, table or
//! card, the result is reshaped by the [`Processor`] registered for the
//! requested view type:
//!
//! ```text
//! QueryResult ─► registry lookup ─► transform ─► validate ─► view data
//! ```
//!
//! Any step can fail. Failures are values ([`ViewError`]), never panics:
//! processor functions that panic are caught and reported as
//! [`ViewError::Fault`].
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use querydeck_view::{process_view, Column, ProcessorRegistry, QueryResult};
//! use serde_json::json;
//!
//! # futures::executor::block_on(async {
//! let registry = ProcessorRegistry::with_builtins();
//! let raw = QueryResult::new(vec![Column::new("label", "text"), Column::new("value", "int4")])
//!     .with_row(json!({"label": "open", "value": 7}))
//!     .with_row(json!({"label": "closed", "value": 3}));
//!
//! let data = process_view(&registry, "bar", Arc::new(raw), None).await.unwrap();
//! assert_eq!(data, json!({"labels": ["open", "closed"], "values": [7, 3]}));
//! # });
//! ```
//!
//! # Built-in Views
//!
//! | Id | Expects | Produces |
//! |----|---------|----------|
//! | `table` | anything | the raw result |
//! | `bar` | `label`, `value` columns | `{labels, values}` |
//! | `line` | label column then numeric columns | `{labels, series: [{name, data}]}` |
//! | `pie` | `label`, `value` columns | `{data: [{name, value}]}` |
//! | `number` | exactly one row | `{value, label}` |
//! | `metric` | at least one row | `{value, label}` |
//! | `gauge` | at least one row | `{value, label}` |
//! | `empty` | anything | `{message}` |
//!
//! `table` is the default fallback for hosts that prefer a view that never
//! fails lookup ([`ProcessorRegistry::get_or_fallback`]).

pub mod builtin;
mod error;
mod process;
mod processor;
mod registry;
mod result;

pub use error::{RegistryError, Result, ViewError, INVALID_DATA, VALIDATION_FAILED};
pub use process::process_view;
pub use processor::{Processed, Processor, TransformFn, ValidateFn, Validation};
pub use registry::{ProcessorRegistry, ProcessorRegistryBuilder, ViewDefinition, DEFAULT_FALLBACK};
pub use result::{Column, QueryResult, Row};
