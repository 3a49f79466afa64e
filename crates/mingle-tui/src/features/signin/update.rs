//! Sign-in feature reducer.
//!
//! Key handling for the sign-in screens and processing of async sign-in
//! results. Every result variant maps to an explicit action; the silent
//! outcomes are spelled out rather than collapsed into a fallthrough.

use crossterm::event::{KeyCode, KeyEvent};
use mingle_core::auth::apple::AppleLoginOutcome;
use mingle_core::auth::session::github_authorize_url;
use mingle_core::auth::{AuthSessionResult, SignInMethod, TokenPair};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::state::{Flash, Screen, TuiState};

/// Flash text for failures the user can do nothing specific about.
pub const GENERIC_FAILURE: &str = "something went wrong";

/// Handles a key routed to the active screen (no overlay open).
pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    match tui.screen {
        Screen::SignIn => handle_signin_key(tui, key),
        Screen::EmailLogin => handle_email_key(tui, key),
        Screen::SessionReady { .. } => handle_session_ready_key(key),
    }
}

fn handle_signin_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Up => {
            tui.signin.select_prev();
            vec![]
        }
        KeyCode::Down => {
            tui.signin.select_next();
            vec![]
        }
        KeyCode::Enter => match tui.signin.selected_method() {
            Some(SignInMethod::Github) => start_github_session(tui),
            Some(SignInMethod::Apple) => start_apple_login(tui),
            Some(SignInMethod::Email) => {
                tui.screen = Screen::EmailLogin;
                vec![]
            }
            None => vec![],
        },
        KeyCode::Char('t') => vec![UiEffect::OpenBrowser {
            url: tui.config.terms_url.clone(),
        }],
        KeyCode::Esc => {
            if tui.tasks.is_any_running() {
                cancel_pending(tui)
            } else {
                vec![UiEffect::Quit]
            }
        }
        KeyCode::Char('q') => vec![UiEffect::Quit],
        _ => vec![],
    }
}

fn handle_email_key(tui: &mut TuiState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc => {
            tui.screen = Screen::SignIn;
            vec![]
        }
        KeyCode::Char('q') => vec![UiEffect::Quit],
        _ => vec![],
    }
}

fn handle_session_ready_key(key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => vec![UiEffect::Quit],
        _ => vec![],
    }
}

// ============================================================================
// Triggers
// ============================================================================

fn start_github_session(tui: &mut TuiState) -> Vec<UiEffect> {
    let Some(return_url) = tui.signin.return_url.clone() else {
        // The browser has nowhere to land; the whole action is a no-op.
        tracing::debug!("github login skipped: no return url");
        return vec![];
    };

    let mut effects = supersede(tui, TaskKind::GithubSession);
    let authorize_url = github_authorize_url(tui.config.effective_api_base_url(), &return_url);
    let task = tui.task_seq.next_id();
    tui.flash = Some(Flash::info("Check your browser to continue with GitHub..."));
    effects.push(UiEffect::OpenBrowser { url: authorize_url });
    effects.push(UiEffect::StartAuthSession {
        task: Some(task),
        return_url,
    });
    effects
}

fn start_apple_login(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut effects = supersede(tui, TaskKind::AppleLogin);
    let task = tui.task_seq.next_id();
    effects.push(UiEffect::StartAppleLogin { task: Some(task) });
    effects
}

/// Cancels a still-pending attempt of `kind` so a fresh one can start.
///
/// The stale task's eventual completion is additionally dropped by the
/// active-id gate in the main reducer.
fn supersede(tui: &mut TuiState, kind: TaskKind) -> Vec<UiEffect> {
    let state = tui.tasks.state_mut(kind);
    if !state.is_running() {
        return vec![];
    }
    let token = state.cancel.clone();
    state.clear();
    vec![UiEffect::CancelTask { kind, token }]
}

fn cancel_pending(tui: &mut TuiState) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    for kind in [TaskKind::GithubSession, TaskKind::AppleLogin] {
        effects.extend(supersede(tui, kind));
    }
    effects
}

// ============================================================================
// Result Handlers
// ============================================================================

/// Handles the browser auth session outcome.
pub fn handle_github_session_result(
    tui: &mut TuiState,
    result: Result<AuthSessionResult, String>,
) -> Vec<UiEffect> {
    match result {
        Ok(AuthSessionResult::Success { url }) => match TokenPair::from_redirect_url(&url) {
            Some(pair) => hand_off(tui, pair),
            None => {
                tui.flash = Some(Flash::danger(GENERIC_FAILURE));
                vec![]
            }
        },
        // User closed the flow; stay quiet.
        Ok(AuthSessionResult::Canceled) => vec![],
        // Timed out or the browser never came back; stay quiet.
        Ok(AuthSessionResult::Dismissed) => vec![],
        Err(err) => {
            tracing::error!(error = %err, "github auth session failed");
            tui.flash = Some(Flash::danger(GENERIC_FAILURE));
            vec![]
        }
    }
}

/// Handles the Apple sign-in chain outcome.
pub fn handle_apple_login_result(
    tui: &mut TuiState,
    result: Result<AppleLoginOutcome, String>,
) -> Vec<UiEffect> {
    match result {
        Ok(AppleLoginOutcome::Tokens(pair)) => hand_off(tui, pair),
        Ok(AppleLoginOutcome::Canceled) => vec![],
        Err(err) => {
            // Apple failures are logged, never surfaced on screen.
            tracing::warn!(error = %err, "apple sign-in failed");
            vec![]
        }
    }
}

/// Navigates to the hand-off screen with the pair and requests persistence.
///
/// Results only reach this point through the active-task gate, so the
/// navigation happens at most once per attempt.
fn hand_off(tui: &mut TuiState, pair: TokenPair) -> Vec<UiEffect> {
    tui.flash = None;
    tui.screen = Screen::SessionReady { pair: pair.clone() };
    vec![UiEffect::PersistTokens { pair }]
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use mingle_core::auth::Capabilities;
    use mingle_core::config::Config;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::common::{TaskId, TaskStarted};
    use crate::state::FlashSeverity;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state(apple_platform: bool, return_url: Option<&str>) -> TuiState {
        TuiState::new(
            Config::default(),
            Capabilities { apple_platform },
            return_url.map(String::from),
        )
    }

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    /// Without a return URL, triggering GitHub login does nothing at all.
    #[test]
    fn test_github_without_return_url_is_silent() {
        let mut tui = state(false, None);

        let effects = handle_key(&mut tui, key(KeyCode::Enter));

        assert!(effects.is_empty());
        assert!(tui.flash.is_none());
        assert_eq!(tui.screen, Screen::SignIn);
    }

    /// With a return URL, triggering GitHub opens the authorize URL and
    /// starts the auth session task.
    #[test]
    fn test_github_trigger_opens_browser_and_starts_session() {
        let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));

        let effects = handle_key(&mut tui, key(KeyCode::Enter));

        assert_eq!(effects.len(), 2);
        match &effects[0] {
            UiEffect::OpenBrowser { url } => {
                assert!(url.contains("/auth/github/rn?"));
                assert!(url.contains("redirect_uri="));
            }
            other => panic!("expected OpenBrowser, got {other:?}"),
        }
        match &effects[1] {
            UiEffect::StartAuthSession { task, return_url } => {
                assert!(task.is_some());
                assert_eq!(return_url, "http://127.0.0.1:50000/auth/done");
            }
            other => panic!("expected StartAuthSession, got {other:?}"),
        }
        assert!(
            tui.flash
                .as_ref()
                .is_some_and(|flash| flash.severity == FlashSeverity::Info)
        );
    }

    /// A parseable success navigates exactly once and persists the pair.
    #[test]
    fn test_success_navigates_once_with_pair() {
        let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));

        let effects = handle_github_session_result(
            &mut tui,
            Ok(AuthSessionResult::Success {
                url: "http://127.0.0.1:50000/auth/done/abc/def".to_string(),
            }),
        );

        assert_eq!(
            tui.screen,
            Screen::SessionReady {
                pair: pair("abc", "def")
            }
        );
        assert!(tui.flash.is_none());
        let persists = effects
            .iter()
            .filter(|e| matches!(e, UiEffect::PersistTokens { .. }))
            .count();
        assert_eq!(persists, 1);
    }

    /// Canceled and dismissed sessions end silently.
    #[test]
    fn test_canceled_and_dismissed_are_silent() {
        for outcome in [AuthSessionResult::Canceled, AuthSessionResult::Dismissed] {
            let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));

            let effects = handle_github_session_result(&mut tui, Ok(outcome));

            assert!(effects.is_empty());
            assert!(tui.flash.is_none());
            assert_eq!(tui.screen, Screen::SignIn);
        }
    }

    /// A success whose URL does not carry both tokens shows the generic
    /// failure and stays on the panel.
    #[test]
    fn test_unparseable_success_flashes_without_navigation() {
        let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));

        let effects = handle_github_session_result(
            &mut tui,
            Ok(AuthSessionResult::Success {
                url: "http://127.0.0.1:50000/auth/done/onlyone/".to_string(),
            }),
        );

        assert!(effects.is_empty());
        assert_eq!(tui.screen, Screen::SignIn);
        let flash = tui.flash.expect("flash");
        assert_eq!(flash.text, GENERIC_FAILURE);
        assert_eq!(flash.severity, FlashSeverity::Danger);
    }

    /// A broken flow (listener error, spawn error) flashes the generic
    /// failure.
    #[test]
    fn test_session_error_flashes() {
        let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));

        let effects = handle_github_session_result(&mut tui, Err("bind failed".to_string()));

        assert!(effects.is_empty());
        assert_eq!(tui.screen, Screen::SignIn);
        assert_eq!(tui.flash.expect("flash").text, GENERIC_FAILURE);
    }

    /// Apple tokens hand off exactly like the GitHub path.
    #[test]
    fn test_apple_tokens_navigate() {
        let mut tui = state(true, None);

        let effects =
            handle_apple_login_result(&mut tui, Ok(AppleLoginOutcome::Tokens(pair("a", "r"))));

        assert_eq!(
            tui.screen,
            Screen::SessionReady {
                pair: pair("a", "r")
            }
        );
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::PersistTokens { .. }]
        ));
    }

    /// Apple cancellation and Apple failures are both silent on screen.
    #[test]
    fn test_apple_cancel_and_failure_are_silent() {
        let mut tui = state(true, None);

        let effects = handle_apple_login_result(&mut tui, Ok(AppleLoginOutcome::Canceled));
        assert!(effects.is_empty());
        assert!(tui.flash.is_none());

        let effects = handle_apple_login_result(&mut tui, Err("helper missing".to_string()));
        assert!(effects.is_empty());
        assert!(tui.flash.is_none());
        assert_eq!(tui.screen, Screen::SignIn);
    }

    /// Email login is pure navigation; Esc comes back.
    #[test]
    fn test_email_navigates_and_returns() {
        let mut tui = state(true, None);
        tui.signin.selected = 2;

        let effects = handle_key(&mut tui, key(KeyCode::Enter));
        assert!(effects.is_empty());
        assert_eq!(tui.screen, Screen::EmailLogin);

        let effects = handle_key(&mut tui, key(KeyCode::Esc));
        assert!(effects.is_empty());
        assert_eq!(tui.screen, Screen::SignIn);
    }

    /// The terms hotkey opens the configured terms URL.
    #[test]
    fn test_terms_hotkey_opens_browser() {
        let mut tui = state(true, None);
        let terms = tui.config.terms_url.clone();

        let effects = handle_key(&mut tui, key(KeyCode::Char('t')));

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::OpenBrowser { url }] if *url == terms
        ));
    }

    /// Re-triggering GitHub while an attempt is pending cancels the old
    /// attempt before starting the new one.
    #[test]
    fn test_retrigger_cancels_previous() {
        let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));
        let token = CancellationToken::new();
        tui.tasks.github_session.on_started(&TaskStarted {
            id: TaskId(7),
            cancel: Some(token),
        });

        let effects = handle_key(&mut tui, key(KeyCode::Enter));

        assert!(matches!(
            effects.first(),
            Some(UiEffect::CancelTask {
                kind: TaskKind::GithubSession,
                token: Some(_),
            })
        ));
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, UiEffect::StartAuthSession { .. }))
        );
        assert!(!tui.tasks.github_session.is_running());
    }

    /// Esc cancels a pending flow; with nothing pending it quits.
    #[test]
    fn test_esc_cancels_pending_else_quits() {
        let mut tui = state(false, Some("http://127.0.0.1:50000/auth/done"));
        tui.tasks.github_session.on_started(&TaskStarted {
            id: TaskId(1),
            cancel: Some(CancellationToken::new()),
        });

        let effects = handle_key(&mut tui, key(KeyCode::Esc));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask {
                kind: TaskKind::GithubSession,
                ..
            }]
        ));
        assert!(!tui.tasks.github_session.is_running());

        let effects = handle_key(&mut tui, key(KeyCode::Esc));
        assert!(matches!(effects.as_slice(), [UiEffect::Quit]));
    }
}
