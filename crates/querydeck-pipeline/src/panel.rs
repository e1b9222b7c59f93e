//! One dashboard block: a query execution feeding a view processing run.
//!
//! Each refresh takes a generation number under the panel's lock, together
//! with the start of its execution. It starts view processing under the same
//! lock only if no newer refresh, reset or teardown has taken a generation
//! since, so the published execution and view state always come from the
//! same refresh.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use querydeck_view::ProcessorRegistry;
use serde_json::Value;
use tracing::{debug, trace};

use crate::execution::{ExecutionState, QueryExecution};
use crate::executor::QueryExecutor;
use crate::lifecycle::Outcome;
use crate::request::ExecutionRequest;
use crate::view_processing::{ViewProcessing, ViewState};

/// Both halves of a panel after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    /// Execution state committed by the refresh.
    pub execution: ExecutionState,
    /// View state committed by the refresh, `init` after a failed execution.
    pub view: ViewState,
}

impl PanelState {
    /// The first failure along the pipeline, as display text.
    pub fn error(&self) -> Option<String> {
        self.execution
            .error
            .clone()
            .or_else(|| self.view.error.as_ref().map(ToString::to_string))
    }

    /// Processed view data, when both halves succeeded.
    pub fn data(&self) -> Option<&Value> {
        self.view.processed_data.as_ref()
    }
}

pub type PanelOutcome = Outcome<PanelState>;

/// Binds a [`QueryExecution`] to a [`ViewProcessing`] for a single subject.
pub struct Panel<E: ?Sized> {
    execution: QueryExecution<E>,
    view: ViewProcessing,
    generation: Mutex<u64>,
}

impl<E> Panel<E>
where
    E: QueryExecutor + ?Sized,
{
    /// Creates a panel with both halves in `init`.
    pub fn new(executor: Arc<E>, registry: Arc<ProcessorRegistry>) -> Self {
        Self {
            execution: QueryExecution::new(executor),
            view: ViewProcessing::new(registry),
            generation: Mutex::new(0),
        }
    }

    /// The execution half.
    pub fn execution(&self) -> &QueryExecution<E> {
        &self.execution
    }

    /// The view processing half.
    pub fn view(&self) -> &ViewProcessing {
        &self.view
    }

    fn generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes `request` and, on success, processes the result for `view_id`.
    ///
    /// View processing is reset first, so after a failed execution it stays
    /// in `init`. A later refresh, reset or teardown supersedes this one.
    pub async fn refresh(
        &self,
        request: &ExecutionRequest,
        view_id: &str,
        config: Option<Value>,
    ) -> PanelOutcome {
        let final_query = request.final_query();
        let (generation, token) = {
            let mut generation = self.generation();
            *generation = generation.wrapping_add(1);
            self.view.reset();
            (*generation, self.execution.start(&final_query))
        };

        let execution = match self.execution.finish(token, request, final_query).await {
            Outcome::Completed(state) => state,
            Outcome::Superseded => return Outcome::Superseded,
        };

        let (token, raw) = {
            let current = self.generation();
            if *current != generation {
                trace!(view = view_id, "discarding superseded refresh");
                return Outcome::Superseded;
            }
            match execution.result.clone() {
                Some(raw) => (self.view.start(view_id), raw),
                None => {
                    debug!(view = view_id, "skipping view processing after failed execution");
                    return Outcome::Completed(PanelState {
                        execution,
                        view: self.view.state(),
                    });
                }
            }
        };

        match self.view.finish(token, view_id, raw, config).await {
            Outcome::Completed(view) => Outcome::Completed(PanelState { execution, view }),
            Outcome::Superseded => Outcome::Superseded,
        }
    }

    /// Returns both halves to `init`.
    pub fn reset(&self) {
        let mut generation = self.generation();
        *generation = generation.wrapping_add(1);
        self.execution.reset();
        self.view.reset();
    }

    /// Turns every pending completion into a no-op.
    pub fn teardown(&self) {
        let mut generation = self.generation();
        *generation = generation.wrapping_add(1);
        self.execution.cancel();
        self.view.cancel();
    }
}

impl<E: ?Sized> std::fmt::Debug for Panel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("execution", &self.execution)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}
