//! Top-level TUI state.
//!
//! State lives in two slots so the key-routing code can hold `&mut` to an
//! overlay while reading the rest of the app:
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── screen: Screen           (sign-in / email login / session ready)
//! │   ├── signin: SignInState      (method rows, resolved return URL)
//! │   ├── task_seq: TaskSeq        (async task id generator)
//! │   ├── tasks: Tasks             (task lifecycle state)
//! │   ├── capabilities: Capabilities (platform feature set)
//! │   └── flash: Option<Flash>     (transient status line)
//! └── overlay: Option<Overlay>     (modal overlays, e.g. the age gate)
//! ```
//!
//! Everything environment-dependent (platform capabilities, the auth return
//! URL) is resolved once in `AppState::new`; the reducer and renderer only
//! read the precomputed values.

use std::time::{Duration, Instant};

use mingle_core::auth::session::resolve_return_url;
use mingle_core::auth::{Capabilities, TokenPair};
use mingle_core::config::Config;

use crate::common::{TaskSeq, Tasks};
use crate::features::signin::SignInState;
use crate::overlays::{AgeGateState, Overlay};

/// The whole app: screen state plus the modal overlay slot.
pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    /// Creates an `AppState` from the live environment.
    ///
    /// Resolves platform capabilities and the auth return URL once here;
    /// update and render paths only consume the precomputed values.
    pub fn new(config: Config) -> Self {
        let capabilities = Capabilities::detect();
        let return_url = resolve_return_url();
        Self::with_capabilities(config, capabilities, return_url)
    }

    /// Creates an `AppState` from explicit capabilities and return URL.
    ///
    /// The environment-free constructor `AppState::new` delegates here;
    /// tests use it directly to pin both platform variants.
    pub fn with_capabilities(
        config: Config,
        capabilities: Capabilities,
        return_url: Option<String>,
    ) -> Self {
        let overlay = capabilities
            .age_gate_on_launch()
            .then(|| Overlay::AgeGate(AgeGateState::open()));
        Self {
            tui: TuiState::new(config, capabilities, return_url),
            overlay,
        }
    }
}

/// Full-screen views the TUI can show.
///
/// Reaching `SessionReady` is the token hand-off: it happens at most once
/// per successful sign-in and carries the pair for display and persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// The sign-in options panel.
    SignIn,
    /// The email login destination (navigation target only in this slice).
    EmailLogin,
    /// Signed in; tokens handed off.
    SessionReady { pair: TokenPair },
}

/// How long a flash stays on screen.
pub const FLASH_DURATION: Duration = Duration::from_secs(4);

/// Severity of a flash line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashSeverity {
    Info,
    Danger,
}

/// Transient status line shown at the bottom of the screen.
#[derive(Debug, Clone)]
pub struct Flash {
    pub text: String,
    pub severity: FlashSeverity,
    pub shown_at: Instant,
}

impl Flash {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: FlashSeverity::Info,
            shown_at: Instant::now(),
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: FlashSeverity::Danger,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= FLASH_DURATION
    }
}

/// Everything except the overlay slot.
pub struct TuiState {
    /// Set by the `Quit` effect; the event loop exits when true.
    pub should_quit: bool,
    /// Active full-screen view.
    pub screen: Screen,
    /// Sign-in panel state (precomputed methods, resolved return URL).
    pub signin: SignInState,
    /// Source of ids for spawned tasks.
    pub task_seq: TaskSeq,
    /// Which attempt, if any, is currently in flight.
    pub tasks: Tasks,
    /// Platform capability set, resolved once at startup.
    pub capabilities: Capabilities,
    /// Client configuration.
    pub config: Config,
    /// Transient status line, if one is showing.
    pub flash: Option<Flash>,
    /// Spinner animation frame counter (for pending sign-in tasks).
    pub spinner_frame: usize,
}

impl TuiState {
    pub fn new(config: Config, capabilities: Capabilities, return_url: Option<String>) -> Self {
        let signin = SignInState::new(capabilities.sign_in_methods(), return_url);
        Self {
            should_quit: false,
            screen: Screen::SignIn,
            signin,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            capabilities,
            config,
            flash: None,
            spinner_frame: 0,
        }
    }

    /// Clears the flash line if its display window has passed.
    pub fn expire_flash(&mut self) {
        if self.flash.as_ref().is_some_and(Flash::is_expired) {
            self.flash = None;
        }
    }
}
