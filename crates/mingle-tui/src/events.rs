//! The single event type the reducer consumes.
//!
//! Terminal input, the tick timer, and async sign-in results all become a
//! `UiEvent` before they reach `update`. Async work wraps its result in a
//! lifecycle pair: the runtime posts `TaskStarted` when it spawns (carrying
//! the cancel token for the reducer to hold) and `TaskCompleted` when the
//! future resolves (carrying the result event inside). That wrapping is
//! what lets the reducer drop completions from attempts it already gave up
//! on: the inner result is only unboxed after the task id check passes.

use crossterm::event::Event as CrosstermEvent;
use mingle_core::auth::AuthSessionResult;
use mingle_core::auth::apple::AppleLoginOutcome;

use crate::common::{TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick (flash expiry, spinner animation).
    Tick,

    /// Terminal input event (key, resize).
    Terminal(CrosstermEvent),

    /// Browser auth session finished (Ok = tagged session outcome,
    /// Err = the flow itself broke before producing one).
    GithubSessionResult {
        result: Result<AuthSessionResult, String>,
    },

    /// Apple sign-in chain finished (identity prompt plus backend login).
    AppleLoginResult {
        result: Result<AppleLoginOutcome, String>,
    },

    /// Task lifecycle: runtime started a task (cancel token optional).
    TaskStarted { kind: TaskKind, started: TaskStarted },

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
