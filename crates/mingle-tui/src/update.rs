//! The reducer.
//!
//! `update(app, event)` is the only place state changes. It owns key
//! routing (overlay first, then the active screen), the task lifecycle
//! bookkeeping, and the stale-completion check; everything with a side
//! effect comes back to the runtime as a `UiEffect`.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::signin;
use crate::overlays::{self, OverlayTransition, OverlayUpdate};
use crate::state::AppState;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.expire_flash();
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::GithubSessionResult { result } => {
            signin::handle_github_session_result(&mut app.tui, result)
        }
        UiEvent::AppleLoginResult { result } => {
            signin::handle_apple_login_result(&mut app.tui, result)
        }
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            // Completions of canceled or superseded attempts are dropped
            // here, before any state change or navigation they carry.
            let ok = {
                let state = app.tui.tasks.state_mut(kind);
                state.finish_if_active(completed.id)
            };
            if !ok {
                vec![]
            } else {
                update(app, *completed.result)
            }
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Try to dispatch to the active overlay
    if let Some(update) = overlays::handle_overlay_key(&mut app.overlay, key) {
        return apply_overlay_update(app, update);
    }

    // Ctrl+C quits from any screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return vec![UiEffect::Quit];
    }

    signin::handle_key(&mut app.tui, key)
}

fn apply_overlay_update(app: &mut AppState, update: OverlayUpdate) -> Vec<UiEffect> {
    match update.transition {
        OverlayTransition::Stay => {}
        OverlayTransition::Close => {
            app.overlay = None;
        }
    }
    update.effects
}
