use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use lv_base::config::constants::FORM_NAME_WIDTH;
use lv_base::config::theme;
use lv_base::ui::{pad_to, panel_block};

use crate::form::{ParameterField, ParameterForm, SubmitState};

const HELP: &str = "Enter submit · Tab/↑↓ move · Ctrl+R reset field · Ctrl+U clear · q quit";

pub fn render(frame: &mut Frame, form: &ParameterForm, area: Rect) {
    let block = panel_block(&format!("Parameters · {}", form.file_path));
    let content_area = block.inner(area);
    frame.render_widget(block, area);

    let (text, focus_line) = content(form);

    // Keep the focused field on screen
    let viewport = content_area.height as usize;
    let scroll = (focus_line + 2).saturating_sub(viewport);

    let paragraph = Paragraph::new(text).scroll((scroll as u16, 0));
    frame.render_widget(paragraph, content_area);
}

/// Form lines plus the index of the focused field's first line.
pub fn content(form: &ParameterForm) -> (Vec<Line<'static>>, usize) {
    let mut text: Vec<Line<'static>> = Vec::new();
    let mut focus_line = 0;

    if form.fields.is_empty() {
        text.push(Line::from(Span::styled(
            " This launch file declares no parameters. Press Enter to build the tree.",
            Style::default().fg(theme::text_muted()),
        )));
    }

    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.selected;
        if focused {
            focus_line = text.len();
        }
        text.push(field_line(field, focused));
        if !field.parameter.description.is_empty() {
            text.push(Line::from(vec![
                Span::raw(" ".repeat(FORM_NAME_WIDTH as usize + 3)),
                Span::styled(field.parameter.description.clone(), Style::default().fg(theme::text_muted()).italic()),
            ]));
        }
    }

    text.push(Line::from(""));
    if let Some(status) = form.status_line() {
        let color = if form.status == SubmitState::Pending { theme::warning() } else { theme::error() };
        text.push(Line::from(Span::styled(format!(" {}", status), Style::default().fg(color).bold())));
    }
    text.push(Line::from(Span::styled(format!(" {}", HELP), Style::default().fg(theme::text_muted()))));

    (text, focus_line)
}

fn field_line(field: &ParameterField, focused: bool) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let name_style = if field.invalid {
        Style::default().fg(theme::error()).bold()
    } else if focused {
        Style::default().fg(theme::accent()).bold()
    } else {
        Style::default().fg(theme::text())
    };

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme::accent())),
        Span::styled(pad_to(&field.parameter.name, FORM_NAME_WIDTH as usize), name_style),
        Span::raw(" "),
    ];

    let value_style = if field.invalid {
        Style::default().fg(theme::error()).bg(theme::bg_elevated())
    } else {
        Style::default().fg(theme::text()).bg(theme::bg_elevated())
    };
    if focused {
        spans.extend(value_with_cursor(&field.value, field.cursor, value_style));
    } else {
        spans.push(Span::styled(field.value.clone(), value_style));
    }

    if field.parameter.conditionally_included {
        spans.push(Span::styled("  (conditional)", Style::default().fg(theme::warning())));
    }
    if !field.is_default() {
        spans.push(Span::styled(
            format!("  default: {}", field.parameter.default_value),
            Style::default().fg(theme::text_muted()),
        ));
    }
    Line::from(spans)
}

fn value_with_cursor(value: &str, cursor: usize, style: Style) -> Vec<Span<'static>> {
    let before: String = value.chars().take(cursor).collect();
    let at: String = value.chars().nth(cursor).map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = value.chars().skip(cursor + 1).collect();
    vec![
        Span::styled(before, style),
        Span::styled(at, style.add_modifier(Modifier::REVERSED)),
        Span::styled(after, style),
    ]
}
