use crate::agents::{accent_for, avatar_for, color_for, PLACEHOLDER_AVATAR};
use crate::store::Message;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;

/// Renders one transcript message as a labeled bubble: a header line with
/// the avatar glyph and agent name, then the wrapped text behind a
/// directional accent bar.
pub fn render_message(message: &Message, area: Rect) -> Vec<Line<'static>> {
    let color = color_for(&message.agent);
    let accent = accent_for(&message.agent);
    let avatar = avatar_for(&message.agent).unwrap_or(PLACEHOLDER_AVATAR);

    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::raw(format!("{} ", avatar)),
        Span::styled(
            message.agent.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]));

    let wrap_width = (area.width as usize).saturating_sub(4).max(8);
    for wrapped in wrap(&message.text, wrap_width) {
        lines.push(Line::from(vec![
            Span::styled("▌ ", Style::default().fg(accent)),
            Span::styled(wrapped.into_owned(), Style::default().fg(color)),
        ]));
    }

    lines
}
