//! The query execution state machine.
//!
//! [`QueryExecution`] owns the observable state of one subject (one query
//! binding). Each [`execute`](QueryExecution::execute) call starts a fresh
//! invocation; only the most recently started invocation may commit, so a
//! slow earlier call that resolves late is silently dropped.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use querydeck_view::QueryResult;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::error::ExecutorError;
use crate::executor::QueryExecutor;
use crate::lifecycle::{self, Guarded, Lifecycle, Outcome, Token};
use crate::request::ExecutionRequest;

/// Snapshot of a [`QueryExecution`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionState {
    /// Where the latest invocation is.
    pub lifecycle: Lifecycle,
    /// Raw result of the latest successful invocation.
    pub result: Option<Arc<QueryResult>>,
    /// Message of the latest failed invocation.
    pub error: Option<String>,
    /// Final query text of the latest invocation.
    pub final_query: Option<String>,
    token: Token,
}

impl ExecutionState {
    /// `true` once completed without error.
    pub fn is_success(&self) -> bool {
        self.lifecycle == Lifecycle::Completed && self.error.is_none()
    }
}

impl Guarded for ExecutionState {
    fn token(&self) -> Token {
        self.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }
}

pub type ExecutionOutcome = Outcome<ExecutionState>;

/// Runs requests through an executor and publishes the latest outcome.
pub struct QueryExecution<E: ?Sized> {
    executor: Arc<E>,
    state: watch::Sender<ExecutionState>,
}

impl<E> QueryExecution<E>
where
    E: QueryExecutor + ?Sized,
{
    /// Creates an execution in [`Lifecycle::Init`] backed by `executor`.
    pub fn new(executor: Arc<E>) -> Self {
        let (state, _) = watch::channel(ExecutionState::default());
        Self { executor, state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ExecutionState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every visible transition.
    pub fn subscribe(&self) -> watch::Receiver<ExecutionState> {
        self.state.subscribe()
    }

    /// Substitutes the request's variables and runs the final query.
    ///
    /// Failures land in [`ExecutionState::error`]; this never returns an
    /// error itself. Returns [`Outcome::Superseded`] if another
    /// [`execute`](Self::execute), [`reset`](Self::reset) or
    /// [`cancel`](Self::cancel) happened while the executor was running.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionOutcome {
        let final_query = request.final_query();
        let token = self.start(&final_query);
        self.finish(token, request, final_query).await
    }

    /// Enters `executing` for `final_query` and returns the new invocation's token.
    pub(crate) fn start(&self, final_query: &str) -> Token {
        lifecycle::begin(&self.state, |s| {
            s.lifecycle = Lifecycle::Executing;
            s.result = None;
            s.error = None;
            s.final_query = Some(final_query.to_string());
        })
    }

    /// Runs the executor for a started invocation and commits if still live.
    pub(crate) async fn finish(
        &self,
        token: Token,
        request: &ExecutionRequest,
        final_query: String,
    ) -> ExecutionOutcome {
        debug!(target_id = %request.target, query = %final_query, "executing query");

        let result = AssertUnwindSafe(self.executor.execute(&request.target, &final_query))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ExecutorError::from_panic(payload)));

        if let Err(e) = &result {
            warn!(target_id = %request.target, error = %e, "query failed");
        }

        let committed = lifecycle::commit(&self.state, token, |s| {
            s.lifecycle = Lifecycle::Completed;
            match result {
                Ok(raw) => {
                    s.result = Some(Arc::new(raw));
                    s.error = None;
                }
                Err(e) => {
                    s.result = None;
                    s.error = Some(e.to_string());
                }
            }
        });

        if committed {
            debug!(target_id = %request.target, "execution completed");
            Outcome::Completed(self.state())
        } else {
            trace!(target_id = %request.target, "discarding superseded execution");
            Outcome::Superseded
        }
    }

    /// Drops any result or error and returns to [`Lifecycle::Init`].
    /// In-flight invocations become stale.
    pub fn reset(&self) {
        lifecycle::begin(&self.state, |s| {
            s.lifecycle = Lifecycle::Init;
            s.result = None;
            s.error = None;
            s.final_query = None;
        });
    }

    /// Makes in-flight invocations stale, leaving visible state untouched.
    pub fn cancel(&self) {
        lifecycle::invalidate(&self.state);
    }
}

impl<E: ?Sized> std::fmt::Debug for QueryExecution<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecution")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use querydeck_template::{Variable, VariableType};
    use querydeck_view::Column;
    use serde_json::json;
    use std::sync::Mutex;

    /// Echoes the final query back as a one-row result and remembers it.
    #[derive(Default)]
    struct Echo {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl QueryExecutor for Echo {
        async fn execute(&self, target: &str, query: &str) -> Result<QueryResult, ExecutorError> {
            self.seen
                .lock()
                .unwrap()
                .push((target.to_string(), query.to_string()));
            if query.contains("boom") {
                panic!("driver crashed");
            }
            if query.contains("missing") {
                return Err(ExecutorError::Reported("relation \"missing\" does not exist".into()));
            }
            Ok(QueryResult::new(vec![Column::new("q", "text")]).with_row(json!({ "q": query })))
        }
    }

    #[tokio::test]
    async fn test_starts_in_init() {
        let execution = QueryExecution::new(Arc::new(Echo::default()));
        let state = execution.state();
        assert_eq!(state.lifecycle, Lifecycle::Init);
        assert!(state.result.is_none() && state.error.is_none());
    }

    #[tokio::test]
    async fn test_execute_substitutes_then_runs() {
        let echo = Arc::new(Echo::default());
        let execution = QueryExecution::new(Arc::clone(&echo));
        let request = ExecutionRequest::new("SELECT * FROM t WHERE id = {{id}}", "warehouse")
            .with_variables(vec![Variable::new("id")
                .with_type(VariableType::Number)
                .with_value("5")]);

        let state = execution.execute(&request).await.completed().unwrap();

        assert!(state.is_success());
        assert_eq!(state.final_query.as_deref(), Some("SELECT * FROM t WHERE id = 5"));
        assert_eq!(state.result.unwrap().rows[0]["q"], "SELECT * FROM t WHERE id = 5");
        assert_eq!(
            echo.seen.lock().unwrap()[0],
            ("warehouse".to_string(), "SELECT * FROM t WHERE id = 5".to_string())
        );
    }

    #[tokio::test]
    async fn test_reported_failure_completes_with_error() {
        let execution = QueryExecution::new(Arc::new(Echo::default()));
        execution
            .execute(&ExecutionRequest::new("SELECT 1", "db"))
            .await;

        let state = execution
            .execute(&ExecutionRequest::new("SELECT * FROM missing", "db"))
            .await
            .completed()
            .unwrap();

        assert_eq!(state.lifecycle, Lifecycle::Completed);
        assert!(state.result.is_none(), "stale result must be cleared");
        assert_eq!(state.error.as_deref(), Some("relation \"missing\" does not exist"));
    }

    #[tokio::test]
    async fn test_executor_panic_is_an_error() {
        let execution = QueryExecution::new(Arc::new(Echo::default()));
        let state = execution
            .execute(&ExecutionRequest::new("SELECT boom()", "db"))
            .await
            .completed()
            .unwrap();
        assert_eq!(state.error.as_deref(), Some("driver crashed"));
        assert!(!state.is_success());
    }

    #[tokio::test]
    async fn test_reset_returns_to_init() {
        let execution = QueryExecution::new(Arc::new(Echo::default()));
        execution.execute(&ExecutionRequest::new("SELECT 1", "db")).await;
        execution.reset();

        let state = execution.state();
        assert_eq!(state.lifecycle, Lifecycle::Init);
        assert!(state.result.is_none());
        assert!(state.final_query.is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let execution = QueryExecution::new(Arc::new(Echo::default()));
        let mut rx = execution.subscribe();

        execution.execute(&ExecutionRequest::new("SELECT 1", "db")).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().lifecycle, Lifecycle::Completed);
    }

    #[test]
    fn test_dyn_executor() {
        let executor: Arc<dyn QueryExecutor> = Arc::new(Echo::default());
        let execution = QueryExecution::new(executor);
        assert!(format!("{:?}", execution).contains("QueryExecution"));
    }
}
