//! Age gate overlay.
//!
//! Shown over the sign-in panel on launch where the platform requires it.
//! Confirming closes the gate for the rest of the run. Declining switches
//! the popup to a rejection notice that stays until the process exits; the
//! only keys it still honors are the quit keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_overlay, render_separator};
use crate::effects::UiEffect;

pub const QUESTION: &str = "Are you 18 or older?";
pub const REJECTION_NOTICE: &str = "You need to be 18 or older to use the app.";

/// The two answers the gate offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGateChoice {
    Yes,
    No,
}

impl AgeGateChoice {
    fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

/// Age gate overlay state.
///
/// `Rejected` is terminal for the run: no key returns the gate to `Asking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGateState {
    Asking { selected: AgeGateChoice },
    Rejected,
}

impl AgeGateState {
    pub fn open() -> Self {
        Self::Asking {
            selected: AgeGateChoice::Yes,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return OverlayUpdate::stay().with_effects(vec![UiEffect::Quit]);
        }

        match *self {
            Self::Asking { selected } => match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                    *self = Self::Asking {
                        selected: selected.toggled(),
                    };
                    OverlayUpdate::stay()
                }
                KeyCode::Char('y') => OverlayUpdate::close(),
                KeyCode::Char('n') => {
                    *self = Self::Rejected;
                    OverlayUpdate::stay()
                }
                KeyCode::Enter => match selected {
                    AgeGateChoice::Yes => OverlayUpdate::close(),
                    AgeGateChoice::No => {
                        *self = Self::Rejected;
                        OverlayUpdate::stay()
                    }
                },
                KeyCode::Esc | KeyCode::Char('q') => {
                    OverlayUpdate::stay().with_effects(vec![UiEffect::Quit])
                }
                _ => OverlayUpdate::stay(),
            },
            Self::Rejected => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    OverlayUpdate::stay().with_effects(vec![UiEffect::Quit])
                }
                _ => OverlayUpdate::stay(),
            },
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Self::Asking { selected } => render_question(frame, area, *selected),
            Self::Rejected => render_rejection(frame, area),
        }
    }
}

fn render_question(frame: &mut Frame, area: Rect, selected: AgeGateChoice) {
    let hints = [
        InputHint::new("←→", "select"),
        InputHint::new("Enter", "confirm"),
    ];
    let body = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "Mingle",
            border_color: Color::Cyan,
            width: 40,
            height: 7,
            hints: &hints,
        },
    );

    let question = Line::from(QUESTION).bold().centered();
    frame.render_widget(question, Rect::new(body.x, body.y, body.width, 1));

    let choice_style = |choice: AgeGateChoice| {
        if choice == selected {
            Style::new().bg(Color::Cyan).fg(Color::Black).bold()
        } else {
            Style::new().fg(Color::DarkGray)
        }
    };
    let choices = Line::from(vec![
        Span::styled("  Yes  ", choice_style(AgeGateChoice::Yes)),
        Span::raw("   "),
        Span::styled("  No  ", choice_style(AgeGateChoice::No)),
    ])
    .centered();
    frame.render_widget(choices, Rect::new(body.x, body.y + 2, body.width, 1));

    render_separator(frame, body, body.height.saturating_sub(1));
}

fn render_rejection(frame: &mut Frame, area: Rect) {
    let hints = [InputHint::new("q", "quit")];
    let body = render_overlay(
        frame,
        area,
        &OverlayConfig {
            title: "Mingle",
            border_color: Color::Red,
            width: 48,
            height: 5,
            hints: &hints,
        },
    );

    let notice = Line::styled(REJECTION_NOTICE, Color::Red).centered();
    frame.render_widget(notice, Rect::new(body.x, body.y, body.width, 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlays::OverlayTransition;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// The gate opens on the affirmative choice.
    #[test]
    fn test_open_starts_on_yes() {
        assert_eq!(
            AgeGateState::open(),
            AgeGateState::Asking {
                selected: AgeGateChoice::Yes
            }
        );
    }

    /// Arrow keys and Tab flip between the two choices.
    #[test]
    fn test_toggle_selection() {
        let mut gate = AgeGateState::open();

        gate.handle_key(key(KeyCode::Right));
        assert_eq!(
            gate,
            AgeGateState::Asking {
                selected: AgeGateChoice::No
            }
        );

        gate.handle_key(key(KeyCode::Tab));
        assert_eq!(
            gate,
            AgeGateState::Asking {
                selected: AgeGateChoice::Yes
            }
        );
    }

    /// Confirming Yes closes the overlay.
    #[test]
    fn test_confirm_yes_closes() {
        let mut gate = AgeGateState::open();

        let update = gate.handle_key(key(KeyCode::Enter));

        assert!(matches!(update.transition, OverlayTransition::Close));
        assert!(update.effects.is_empty());
    }

    /// Declining locks the gate into the rejection notice; later age-gate
    /// keys never bring the question back.
    #[test]
    fn test_decline_is_terminal() {
        let mut gate = AgeGateState::open();

        let update = gate.handle_key(key(KeyCode::Char('n')));
        assert!(matches!(update.transition, OverlayTransition::Stay));
        assert_eq!(gate, AgeGateState::Rejected);

        for code in [
            KeyCode::Enter,
            KeyCode::Char('y'),
            KeyCode::Left,
            KeyCode::Tab,
        ] {
            let update = gate.handle_key(key(code));
            assert!(matches!(update.transition, OverlayTransition::Stay));
            assert!(update.effects.is_empty());
            assert_eq!(gate, AgeGateState::Rejected);
        }
    }

    /// Quit keys work from both gate states.
    #[test]
    fn test_quit_keys() {
        let mut gate = AgeGateState::open();
        let update = gate.handle_key(key(KeyCode::Esc));
        assert!(matches!(update.effects.as_slice(), [UiEffect::Quit]));

        let mut gate = AgeGateState::Rejected;
        let update = gate.handle_key(key(KeyCode::Char('q')));
        assert!(matches!(update.effects.as_slice(), [UiEffect::Quit]));

        let update = gate.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(update.effects.as_slice(), [UiEffect::Quit]));
    }
}
