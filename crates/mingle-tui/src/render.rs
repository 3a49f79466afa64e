//! Frame composition.
//!
//! Everything here reads `&AppState` and draws; state changes belong to the
//! reducer. Layout is one vertical split: the active screen gets the frame
//! minus the bottom row, the flash line gets that row, and the overlay (if
//! open) paints last so it sits on top.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::text::Line;

use crate::features::signin;
use crate::overlays::OverlayExt;
use crate::state::{AppState, Flash, FlashSeverity, Screen};

/// Height of the flash line at the bottom of the screen.
const FLASH_HEIGHT: u16 = 1;

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    let body = Rect {
        height: area.height.saturating_sub(FLASH_HEIGHT),
        ..area
    };

    match &state.screen {
        Screen::SignIn => signin::render::render_sign_in(state, frame, body),
        Screen::EmailLogin => signin::render::render_email_login(frame, body),
        Screen::SessionReady { pair } => signin::render::render_session_ready(pair, frame, body),
    }

    if let Some(flash) = &state.flash
        && area.height > 0
    {
        let flash_area = Rect {
            x: area.x,
            y: area.y + area.height - FLASH_HEIGHT,
            width: area.width,
            height: FLASH_HEIGHT,
        };
        render_flash(flash, frame, flash_area);
    }

    app.overlay.render(frame, area);
}

fn render_flash(flash: &Flash, frame: &mut Frame, area: Rect) {
    let color = match flash.severity {
        FlashSeverity::Info => Color::Cyan,
        FlashSeverity::Danger => Color::Red,
    };
    let line = Line::styled(flash.text.as_str(), color).centered();
    frame.render_widget(line, area);
}
