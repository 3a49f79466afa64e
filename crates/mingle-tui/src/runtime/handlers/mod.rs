//! Async bodies for the sign-in effects.
//!
//! Each handler is a plain async function that resolves to the `UiEvent`
//! carrying its result. Handlers never touch app state; the runtime spawns
//! them through `spawn_task`, which wraps them in the
//! TaskStarted/TaskCompleted lifecycle and posts both ends to the inbox.

pub mod auth;

pub use auth::*;
