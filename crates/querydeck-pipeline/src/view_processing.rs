//! The view processing state machine.
//!
//! Mirrors [`QueryExecution`](crate::QueryExecution): each
//! [`process`](ViewProcessing::process) call re-enters `executing` from the
//! top, runs lookup, transform and validate, then commits only if no newer
//! call started meanwhile. Identical repeated inputs are processed again.

use std::sync::Arc;

use querydeck_view::{process_view, ProcessorRegistry, QueryResult, ViewError};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::lifecycle::{self, Guarded, Lifecycle, Outcome, Token};

/// Snapshot of a [`ViewProcessing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Where the latest run is.
    pub lifecycle: Lifecycle,
    /// View data of the latest successful run.
    pub processed_data: Option<Value>,
    /// Failure of the latest run.
    pub error: Option<ViewError>,
    /// View type of the latest run.
    pub view_id: Option<String>,
    token: Token,
}

impl ViewState {
    /// `true` once completed without error.
    pub fn is_success(&self) -> bool {
        self.lifecycle == Lifecycle::Completed && self.error.is_none()
    }
}

impl Guarded for ViewState {
    fn token(&self) -> Token {
        self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}

pub type ProcessOutcome = Outcome<ViewState>;

/// Routes raw results through the registry and publishes the latest outcome.
#[derive(Debug)]
pub struct ViewProcessing {
    registry: Arc<ProcessorRegistry>,
    state: watch::Sender<ViewState>,
}

impl ViewProcessing {
    /// Creates a view processing in [`Lifecycle::Init`] over `registry`.
    pub fn new(registry: Arc<ProcessorRegistry>) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self { registry, state }
    }

    /// The registry views are looked up in.
    pub fn registry(&self) -> &Arc<ProcessorRegistry> {
        &self.registry
    }

    /// Current state snapshot.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every visible transition.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Processes `raw` for `view_id`.
    ///
    /// Unknown view ids, rejections and processor panics all end in
    /// [`Lifecycle::Completed`] with [`ViewState::error`] set.
    pub async fn process(
        &self,
        view_id: &str,
        raw: Arc<QueryResult>,
        config: Option<Value>,
    ) -> ProcessOutcome {
        let token = self.start(view_id);
        self.finish(token, view_id, raw, config).await
    }

    /// Enters `executing` for `view_id` and returns the new run's token.
    pub(crate) fn start(&self, view_id: &str) -> Token {
        lifecycle::begin(&self.state, |s| {
            s.lifecycle = Lifecycle::Executing;
            s.processed_data = None;
            s.error = None;
            s.view_id = Some(view_id.to_string());
        })
    }

    /// Processes a started run and commits if still live.
    pub(crate) async fn finish(
        &self,
        token: Token,
        view_id: &str,
        raw: Arc<QueryResult>,
        config: Option<Value>,
    ) -> ProcessOutcome {
        let result = process_view(&self.registry, view_id, raw, config).await;

        let committed = lifecycle::commit(&self.state, token, |s| {
            s.lifecycle = Lifecycle::Completed;
            match result {
                Ok(data) => {
                    s.processed_data = Some(data);
                    s.error = None;
                }
                Err(e) => {
                    s.processed_data = None;
                    s.error = Some(e);
                }
            }
        });

        if committed {
            Outcome::Completed(self.state())
        } else {
            trace!(view = view_id, "discarding superseded view processing");
            Outcome::Superseded
        }
    }

    /// Drops processed data and error and returns to [`Lifecycle::Init`].
    pub fn reset(&self) {
        debug!("resetting view processing");
        lifecycle::begin(&self.state, |s| {
            s.lifecycle = Lifecycle::Init;
            s.processed_data = None;
            s.error = None;
            s.view_id = None;
        });
    }

    /// Makes in-flight runs stale, leaving visible state untouched.
    pub fn cancel(&self) {
        lifecycle::invalidate(&self.state);
    }
}
