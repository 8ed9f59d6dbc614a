use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::{
    FOOTER_HEIGHT, HEADER_HEIGHT, HEADER_RULE, HEADER_TEXT, HELP_TEXT, LOADING_TEXT, Model,
    row_prefix,
};

/// Split the frame into header, list and footer rows.
fn split_rows(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area)
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();

    if !model.ready {
        frame.render_widget(Paragraph::new(LOADING_TEXT), area);
        return;
    }

    let rows = split_rows(area);
    render_header(frame, rows[0]);
    render_list(model, frame, rows[1]);
    render_footer(frame, rows[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::styled(HEADER_TEXT, title_style),
        Line::raw(HEADER_RULE),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Paints at most `content_height` rows. That is two fewer than the list
/// area, and the spare rows stay blank.
fn render_list(model: &Model, frame: &mut Frame, area: Rect) {
    // A terminal narrower than the preview pane leaves no fixed width.
    let width = match model.content_width() {
        0 => area.width,
        w => w.min(area.width),
    };
    let area = Rect { width, ..area };
    let title_width = (width as usize).saturating_sub(2);

    let selected_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = model
        .content
        .visible_range()
        .filter_map(|idx| model.items.get(idx).map(|item| (idx, item)))
        .map(|(idx, item)| {
            let selected = idx == model.cursor.item;
            let text = format!(
                "{}{}",
                row_prefix(selected),
                truncate_to_width(&item.title, title_width)
            );
            if selected {
                Line::styled(text, selected_style)
            } else {
                Line::raw(text)
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let dim_style = Style::default().fg(Color::Indexed(245));
    let lines = vec![Line::raw(""), Line::styled(HELP_TEXT, dim_style)];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
