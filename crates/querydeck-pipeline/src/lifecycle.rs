//! Lifecycle states and liveness tokens shared by both state machines.
//!
//! Every state machine keeps its current liveness token inside its published
//! state. An invocation captures the token when it begins and may only
//! commit while the token is unchanged. The comparison and the mutation run
//! under the same `watch` lock, so a superseded invocation can never
//! overwrite a newer one.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Progress of an execution or a view processing run.
///
/// Moves `Init → Executing → Completed`. Failure is `Completed` with an
/// error set. Only an explicit reset returns to `Init`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Nothing attempted yet, or explicitly reset.
    #[default]
    Init,
    /// An invocation is in flight.
    Executing,
    /// The latest invocation finished, successfully or not.
    Completed,
}

impl Lifecycle {
    /// Lowercase name, as serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Init => "init",
            Lifecycle::Executing => "executing",
            Lifecycle::Completed => "completed",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an invocation ended, from the invoker's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S> {
    /// The invocation was still live and committed this state.
    Completed(S),
    /// A later trigger, reset or teardown superseded the invocation; its
    /// result was dropped.
    Superseded,
}

impl<S> Outcome<S> {
    /// Returns `true` if the invocation was superseded.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Outcome::Superseded)
    }

    /// The committed state, if any.
    pub fn completed(self) -> Option<S> {
        match self {
            Outcome::Completed(state) => Some(state),
            Outcome::Superseded => None,
        }
    }
}

/// Invocation liveness marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Token(u64);

impl Token {
    fn next(self) -> Self {
        Token(self.0.wrapping_add(1))
    }
}

/// Published state that carries a liveness token.
pub(crate) trait Guarded {
    fn token(&self) -> Token;
    fn token_mut(&mut self) -> &mut Token;
}

/// Starts a new invocation: rotates the token, applies `f` and notifies.
pub(crate) fn begin<S: Guarded>(state: &watch::Sender<S>, f: impl FnOnce(&mut S)) -> Token {
    let mut token = Token::default();
    state.send_modify(|s| {
        token = s.token().next();
        *s.token_mut() = token;
        f(s);
    });
    token
}

/// Applies `f` only if `token` is still current. Returns whether it did.
pub(crate) fn commit<S: Guarded>(
    state: &watch::Sender<S>,
    token: Token,
    f: impl FnOnce(&mut S),
) -> bool {
    state.send_if_modified(|s| {
        if s.token() != token {
            return false;
        }
        f(s);
        true
    })
}

/// Makes every pending invocation stale without touching visible state.
pub(crate) fn invalidate<S: Guarded>(state: &watch::Sender<S>) {
    state.send_if_modified(|s| {
        let next = s.token().next();
        *s.token_mut() = next;
        false
    });
}
