//! Sign-in screen rendering.
//!
//! Pure view functions: take state by reference, draw to the frame,
//! never mutate or return effects.

use mingle_core::auth::tokens::mask_token;
use mingle_core::auth::{SignInMethod, TokenPair};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::common::TaskKind;
use crate::state::TuiState;

/// Spinner frames for pending sign-in attempts.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Render frames per spinner frame.
const SPINNER_SPEED_DIVISOR: usize = 6;

/// Panel width for all sign-in cards.
const PANEL_WIDTH: u16 = 72;

/// Centers a panel of the given size in `area`, clamped to fit.
fn centered_panel(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn panel_block(title: &str) -> Block<'_> {
    Block::bordered()
        .border_style(Color::DarkGray)
        .title(Span::styled(
            format!(" {title} "),
            Style::new().fg(Color::Cyan).bold(),
        ))
}

fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[(frame / SPINNER_SPEED_DIVISOR) % SPINNER_FRAMES.len()]
}

/// Renders the sign-in options panel.
pub fn render_sign_in(state: &TuiState, frame: &mut Frame, area: Rect) {
    let methods = &state.signin.methods;
    // Title row + borders + spacing + method rows + agreement + hints.
    let height = (methods.len() as u16) + 8;
    let panel = centered_panel(area, PANEL_WIDTH, height);

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::default());
    lines.push(Line::from("Sign in to get started".bold()));
    lines.push(Line::default());

    for (idx, method) in methods.iter().enumerate() {
        lines.push(method_row(state, *method, idx == state.signin.selected));
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        "By signing in with GitHub, Apple, or Email, you agree to our terms",
        Color::DarkGray,
    ));
    lines.push(hint_line(&[
        ("↑↓", "select"),
        ("Enter", "confirm"),
        ("t", "terms"),
        ("q", "quit"),
    ]));

    let card = Paragraph::new(lines).centered().block(panel_block("Mingle"));
    frame.render_widget(card, panel);
}

fn method_row(state: &TuiState, method: SignInMethod, selected: bool) -> Line<'static> {
    let pending = match method {
        SignInMethod::Github => state.tasks.state(TaskKind::GithubSession).is_running(),
        SignInMethod::Apple => state.tasks.state(TaskKind::AppleLogin).is_running(),
        SignInMethod::Email => false,
    };

    let style = if selected {
        Style::new().fg(Color::Cyan).bold()
    } else {
        Style::new()
    };
    let marker = if selected { "▸ " } else { "  " };

    let mut spans = vec![Span::styled(format!("{marker}{}", method.label()), style)];
    if pending {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} waiting...", spinner(state.spinner_frame)),
            Color::Yellow,
        ));
    }
    Line::from(spans)
}

/// Renders the email-login destination shell.
pub fn render_email_login(frame: &mut Frame, area: Rect) {
    let panel = centered_panel(area, PANEL_WIDTH, 7);
    let lines = vec![
        Line::default(),
        Line::from("Email login".bold()),
        Line::default(),
        hint_line(&[("Esc", "back"), ("q", "quit")]),
    ];
    let card = Paragraph::new(lines).centered().block(panel_block("Mingle"));
    frame.render_widget(card, panel);
}

/// Renders the post-sign-in hand-off screen with masked tokens.
pub fn render_session_ready(pair: &TokenPair, frame: &mut Frame, area: Rect) {
    let panel = centered_panel(area, PANEL_WIDTH, 9);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled("Signed in", Style::new().fg(Color::Green).bold())),
        Line::default(),
        Line::from(vec![
            Span::styled("access  ", Color::DarkGray),
            Span::raw(mask_token(&pair.access_token)),
        ]),
        Line::from(vec![
            Span::styled("refresh ", Color::DarkGray),
            Span::raw(mask_token(&pair.refresh_token)),
        ]),
        Line::default(),
        hint_line(&[("Enter", "done")]),
    ];
    let card = Paragraph::new(lines).centered().block(panel_block("Mingle"));
    frame.render_widget(card, panel);
}

fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, (key, action)) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled((*key).to_string(), Color::DarkGray));
        spans.push(Span::raw(format!(" {action}")));
    }
    Line::from(spans)
}
