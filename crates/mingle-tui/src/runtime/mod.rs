//! The impure half of the Elm loop.
//!
//! `TuiRuntime` owns the terminal and the [`AppState`], drives the
//! poll/update/render cycle, and executes the [`UiEffect`]s the pure
//! reducer hands back. Async work never talks to state directly: handlers
//! run on tokio and post their results as [`UiEvent`]s into an unbounded
//! inbox channel, which the loop drains at the top of every frame. One
//! channel for everything keeps the select surface trivial.
//!
//! Layout:
//! - `mod.rs`: event loop, effect execution, task spawning
//! - `inbox.rs`: the shared event channel
//! - `handlers/`: async bodies for the sign-in effects

mod handlers;
mod inbox;

use std::future::Future;

use anyhow::Result;
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use mingle_core::auth::tokens;
use mingle_core::config::Config;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::Tui;
use crate::{render, terminal, update};

/// Tick cadence while something animates (a pending attempt's spinner) or
/// the user is typing. 16ms is roughly 60fps.
pub const FRAME_DURATION: std::time::Duration = std::time::Duration::from_millis(16);

/// Tick cadence when the screen is static. Keeps idle CPU near zero.
pub const IDLE_POLL_DURATION: std::time::Duration = std::time::Duration::from_millis(100);

/// Owns the terminal, the state, and the inbox; restores the terminal on drop.
pub struct TuiRuntime {
    terminal: Tui,
    pub state: AppState,
    /// Cloned into every spawned handler.
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: std::time::Instant,
    /// Input recency feeds the fast/slow poll decision.
    last_terminal_event: std::time::Instant,
}

impl TuiRuntime {
    pub fn new(config: Config) -> Result<Self> {
        // Hook panics before raw mode so an early panic still restores.
        terminal::init_panic_hook();
        let terminal = terminal::init()?;

        let state = AppState::new(config);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = std::time::Instant::now();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs the event loop until the reducer sets `should_quit`.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = std::time::Instant::now();
                }
                // Renders ride on Tick. A burst of key or inbox events
                // mutates state immediately but paints once, on the next
                // tick, which caps draw frequency at the tick cadence.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }

                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Gathers pending events from the inbox, the terminal, and the tick
    /// timer, blocking at most until the next tick is due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let needs_fast_poll = self.state.tui.tasks.is_any_running() || recent_terminal_activity;
        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        // Async results first; they never block.
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block in the terminal poll only when there is nothing else to do,
        // and only until the next tick is owed.
        let until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            until_tick
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Take whatever else is already buffered without waiting.
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::OpenBrowser { url } => {
                // Suppressed in tests and headless setups.
                if std::env::var_os("MINGLE_NO_BROWSER").is_none() {
                    let _ = open::that(&url);
                }
            }
            UiEffect::StartAuthSession { task, return_url } => {
                let Some(task) = task else {
                    return;
                };
                let timeout = self.state.tui.config.auth_timeout();
                self.spawn_task(TaskKind::GithubSession, task, true, move |cancel| {
                    handlers::auth_session(return_url, timeout, cancel)
                });
            }
            UiEffect::StartAppleLogin { task } => {
                let Some(task) = task else {
                    return;
                };
                let helper = self.state.tui.config.identity_helper.clone();
                let api_base_url = self.state.tui.config.effective_api_base_url().to_string();
                self.spawn_task(TaskKind::AppleLogin, task, true, move |cancel| {
                    handlers::apple_login(helper, api_base_url, cancel)
                });
            }
            UiEffect::PersistTokens { pair } => {
                // The screen already shows the pair; persistence failures
                // are log-only.
                if let Err(err) = tokens::save_tokens(&pair) {
                    tracing::warn!(error = format!("{err:#}"), "failed to persist tokens");
                }
            }
            UiEffect::CancelTask { kind, token } => {
                if let Some(token) = token {
                    token.cancel();
                }
                tracing::debug!(?kind, "task canceled");
            }
        }
    }

    /// Runs a handler on tokio, bracketed by TaskStarted and TaskCompleted
    /// inbox posts so the reducer sees the full lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore();
    }
}
