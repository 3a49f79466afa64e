//! Async task lifecycle tracking.
//!
//! Every spawned sign-in attempt gets a fresh `TaskId`. The reducer records
//! the id (and cancel token) on `TaskStarted` and, on `TaskCompleted`, only
//! accepts the result if that id is still the active one. A completion from
//! a canceled or superseded attempt fails the id check and is dropped.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

/// Monotonic `TaskId` allocator, one per app.
#[derive(Debug, Default)]
pub struct TaskSeq(u64);

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.0);
        self.0 = self.0.wrapping_add(1);
        id
    }
}

/// The asynchronous sign-in flows a user can trigger from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    GithubSession,
    AppleLogin,
}

#[derive(Debug, Clone)]
pub struct TaskStarted {
    pub id: TaskId,
    pub cancel: Option<CancellationToken>,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Lifecycle slot for one task kind. Lives in app state; only the reducer
/// writes to it.
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
        self.cancel = started.cancel.clone();
    }

    /// Completes the task if `id` is still the active attempt.
    ///
    /// Returns false for canceled or superseded attempts; their results
    /// must be dropped without touching state.
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        if self.active != Some(id) {
            return false;
        }
        self.clear();
        true
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

/// One `TaskState` slot per kind.
#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub github_session: TaskState,
    pub apple_login: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::GithubSession => &self.github_session,
            TaskKind::AppleLogin => &self.apple_login,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::GithubSession => &mut self.github_session,
            TaskKind::AppleLogin => &mut self.apple_login,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.github_session.is_running() || self.apple_login.is_running()
    }
}
