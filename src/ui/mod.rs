mod status_bar;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};

use lv_base::config::theme;
use lv_base::ui::panel_block;

use crate::app::host::{Host, Screen};

pub fn render(frame: &mut Frame, host: &mut Host) {
    let area = frame.area();

    // Fill base background
    frame.render_widget(Block::default().style(Style::default().bg(theme::bg_base())), area);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_body(frame, host, main_layout[0]);
    status_bar::render_status_bar(frame, host, main_layout[1]);
}

fn render_body(frame: &mut Frame, host: &mut Host, area: Rect) {
    match host.screen {
        Screen::Loading => render_loading(frame, host, area),
        Screen::Parameters => match &host.form {
            Some(form) => lv_mod_params::panel::render(frame, form, area),
            None => render_loading(frame, host, area),
        },
        Screen::Tree => {
            if let Some(tree) = host.tree.as_mut() {
                tree.render(frame, area);
            }
        }
    }
}

fn render_loading(frame: &mut Frame, host: &Host, area: Rect) {
    let block = panel_block("launchviz");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Reading parameters of ", Style::default().fg(theme::text_muted())),
            Span::styled(host.file_path().to_string(), Style::default().fg(theme::text()).bold()),
        ]),
    ];
    if let Some(notice) = host.notice.as_ref().filter(|n| n.is_error) {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(format!(" {}", notice.text), Style::default().fg(theme::error()).bold())));
        text.push(Line::from(Span::styled(" r retry · q quit", Style::default().fg(theme::text_muted()))));
    }
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}
