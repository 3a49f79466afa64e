//! Shared popup chrome: centered container, key hints, separator rule.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear};

/// Title, size, and footer hints for a popup.
pub struct OverlayConfig<'a> {
    pub title: &'a str,
    pub border_color: Color,
    pub width: u16,
    pub height: u16,
    pub hints: &'a [InputHint<'a>],
}

/// One key/action pair for the hint footer.
pub struct InputHint<'a> {
    pub key: &'a str,
    pub action: &'a str,
}

impl<'a> InputHint<'a> {
    pub fn new(key: &'a str, action: &'a str) -> Self {
        Self { key, action }
    }
}

/// Centers a `width` x `height` popup in `area`, shrinking to fit with a
/// small margin when the terminal is too small.
pub fn calculate_overlay_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let [mid] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(mid);
    popup
}

/// Clears and draws the popup chrome, then returns the usable body area
/// (inside the border, above the hint footer).
pub fn render_overlay(frame: &mut Frame, area: Rect, config: &OverlayConfig<'_>) -> Rect {
    let popup = calculate_overlay_area(area, config.width, config.height);

    let block = Block::bordered()
        .border_style(config.border_color)
        .title(format!(" {} ", config.title))
        .title_style(Style::new().fg(config.border_color).bold());
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    if !config.hints.is_empty() {
        render_hints(frame, inner, config.hints, config.border_color);
    }

    let footer_height = u16::from(!config.hints.is_empty());
    Rect::new(
        inner.x,
        inner.y,
        inner.width,
        inner.height.saturating_sub(footer_height),
    )
}

/// Draws the hint footer centered on the bottom row of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[InputHint], highlight_color: Color) {
    let footer = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);

    let mut spans = Vec::new();
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Color::DarkGray));
        }
        spans.push(Span::styled(hint.key, highlight_color));
        spans.push(Span::styled(format!(" {}", hint.action), Color::DarkGray));
    }

    frame.render_widget(Line::from(spans).centered(), footer);
}

/// Draws a horizontal rule `y_offset` rows into `area`.
pub fn render_separator(frame: &mut Frame, area: Rect, y_offset: u16) {
    if y_offset >= area.height {
        return;
    }
    let row = Rect::new(area.x, area.y + y_offset, area.width, 1);
    let rule = Line::from("─".repeat(area.width as usize)).fg(Color::DarkGray);
    frame.render_widget(rule, row);
}
