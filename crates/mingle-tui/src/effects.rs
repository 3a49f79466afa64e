//! Commands the reducer hands to the runtime.
//!
//! The reducer never does I/O. Anything that touches the outside world
//! (browser, network listener, identity prompt, disk, task cancellation)
//! is described as a `UiEffect` and executed by the runtime after the
//! update call returns. Cancellation follows the same rule: the reducer
//! decides that an attempt should die and emits `CancelTask`; the runtime
//! is the one that fires the token.

use mingle_core::auth::TokenPair;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

#[derive(Debug)]
pub enum UiEffect {
    /// Exit the event loop.
    Quit,

    /// Open `url` in the system browser, fire-and-forget.
    OpenBrowser { url: String },

    /// Start a local auth callback listener and wait for the redirect.
    ///
    /// Resolves to [`UiEvent::GithubSessionResult`](crate::events::UiEvent).
    StartAuthSession {
        task: Option<TaskId>,
        return_url: String,
    },

    /// Run the native identity prompt and backend exchange.
    ///
    /// Resolves to [`UiEvent::AppleLoginResult`](crate::events::UiEvent).
    StartAppleLogin { task: Option<TaskId> },

    /// Persist a token pair to the on-disk store.
    PersistTokens { pair: TokenPair },

    /// Fire the cancel token of a superseded or abandoned attempt.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
