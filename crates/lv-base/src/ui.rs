use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::theme;

/// Rounded bordered block with an accent title, shared by every panel.
pub fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::border()))
        .style(Style::default().bg(theme::bg_base()))
        .title(Span::styled(format!(" {} ", title), Style::default().fg(theme::accent()).bold()))
}

/// Cut `s` to `max_width` display columns, ending with `…` when shortened.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = c.width().unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('…');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

/// Pad `s` with spaces to exactly `width` display columns (truncating first).
pub fn pad_to(s: &str, width: usize) -> String {
    let cut = truncate_string(s, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}
