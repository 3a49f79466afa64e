//! Modal overlays.
//!
//! An open overlay owns the keyboard: the reducer routes every key press
//! here first and only falls through to the sign-in screen when the slot
//! is empty. Each overlay bundles its own state, key handling, and render
//! code; this module holds the dispatch enum and the glue.
//!
//! - `age_gate.rs`: the launch-time age confirmation popup
//! - `render_utils.rs`: shared popup chrome (container, hints, separator)

pub mod age_gate;
pub mod render_utils;

pub use age_gate::AgeGateState;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::effects::UiEffect;

/// What a key press did to the overlay slot.
#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
}

/// Result of an overlay key handler: the slot transition plus any effects
/// the handler wants the runtime to execute.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    #[must_use]
    pub fn with_effects(mut self, effects: Vec<UiEffect>) -> Self {
        self.effects = effects;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    AgeGate(AgeGateState),
}

impl Overlay {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::AgeGate(gate) => gate.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::AgeGate(gate) => gate.handle_key(key),
        }
    }
}

/// Routes a key to the active overlay.
///
/// Returns `None` when no overlay is open; the key then falls through to
/// the active screen.
pub fn handle_overlay_key(overlay: &mut Option<Overlay>, key: KeyEvent) -> Option<OverlayUpdate> {
    overlay.as_mut().map(|overlay| overlay.handle_key(key))
}

/// Render helper so callers can draw `Option<Overlay>` without matching.
pub trait OverlayExt {
    fn render(&self, frame: &mut Frame, area: Rect);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }
}
