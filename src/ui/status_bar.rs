use ratatui::{prelude::*, widgets::Paragraph};

use lv_base::config::theme;

use crate::app::host::{Host, Screen};

pub fn render_status_bar(frame: &mut Frame, host: &Host, area: Rect) {
    let base_style = Style::default().bg(theme::bg_base()).fg(theme::text_muted());
    let mut spans = vec![Span::styled(" ", base_style)];

    let (label, color) = match host.screen {
        Screen::Loading => ("LOADING", theme::text_muted()),
        Screen::Parameters if host.form.as_ref().is_some_and(|f| f.is_pending()) => ("BUILDING", theme::warning()),
        Screen::Parameters => ("PARAMETERS", theme::accent_dim()),
        Screen::Tree => ("TREE", theme::accent_dim()),
    };
    spans.push(Span::styled(format!(" {} ", label), Style::default().fg(theme::bg_base()).bg(color).bold()));
    spans.push(Span::styled(" ", base_style));

    if let Some(tree) = &host.tree
        && host.screen == Screen::Tree
    {
        let controller = tree.controller();
        let summary = match controller.selected().and_then(|id| controller.node(id)) {
            Some(node) => format!(" {} nodes · selected: {} ", controller.tree().len(), node.title),
            None => format!(" {} nodes ", controller.tree().len()),
        };
        spans.push(Span::styled(summary, Style::default().fg(theme::text()).bg(theme::bg_elevated())));
        spans.push(Span::styled(" ", base_style));
    }

    if let Some(notice) = &host.notice {
        let color = if notice.is_error { theme::error() } else { theme::accent() };
        spans.push(Span::styled(
            format!("[{}] {}", notice.at.format("%H:%M:%S"), notice.text),
            Style::default().fg(color),
        ));
        spans.push(Span::styled(" ", base_style));
    }

    let hints = match host.screen {
        Screen::Loading => "Ctrl+Q quit",
        Screen::Parameters => "F3 tree · Ctrl+Q quit",
        Screen::Tree => "Enter select · o open · / search · t hide nodes · p parameters · q quit",
    };
    spans.push(Span::styled(hints, base_style));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(base_style), area);
}
