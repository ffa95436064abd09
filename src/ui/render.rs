use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::Model;
use crate::editor::EditorBuffer;

use super::{areas, overlays, status, toolbar};

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let areas = areas(frame.area(), model.screen_state);

    toolbar::render_toolbar(frame, areas.toolbar);
    if let Some(editor) = areas.editor {
        render_editor(model, frame, editor);
    }
    if let Some(preview) = areas.preview {
        render_preview(model, frame, preview);
    }
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, areas.toast);
    } else {
        status::render_hint_bar(frame, areas.toast);
    }
    status::render_status_bar(model, frame, areas.status);

    for dialog in model.dialogs.iter() {
        overlays::render_dialog(dialog, frame, frame.area());
    }
}

/// The editor pane minus its line-number gutter.
pub fn editor_text_area(editor: Rect, total_lines: usize) -> Rect {
    let gutter = line_number_width(total_lines) + 1;
    Rect {
        x: editor.x + gutter.min(editor.width),
        width: editor.width.saturating_sub(gutter),
        ..editor
    }
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = usize::from(line_number_width(total_lines));
    let text_area = editor_text_area(area, total_lines);

    let visible_height = usize::from(area.height);
    let start = model.editor_scroll;
    let end = (start + visible_height).min(total_lines);
    let columns = usize::from(text_area.width);

    let mut content: Vec<Line> = Vec::new();
    for line_idx in start..end {
        let line_num = format!("{:>gutter_width$} ", line_idx + 1);
        let mut spans = vec![Span::styled(line_num, Style::default().fg(Color::DarkGray))];
        spans.extend(editor_line_spans(
            buf,
            line_idx,
            model.editor_hscroll,
            columns,
        ));
        content.push(Line::from(spans));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
}

/// Spans for one visible line: selection highlighted, caret drawn as a
/// reversed cell (a space past end of line).
fn editor_line_spans(
    buf: &EditorBuffer,
    line_idx: usize,
    hscroll: usize,
    columns: usize,
) -> Vec<Span<'static>> {
    let caret_style = Style::default().bg(Color::White).fg(Color::Black);
    let selected_style = Style::default().bg(Color::Blue).fg(Color::White);

    let selection = buf.selection();
    let line_start = buf.line_start(line_idx);
    let cursor = buf.cursor();
    let caret_col = (cursor.line == line_idx).then_some(cursor.col);

    let text = buf.line_at(line_idx).unwrap_or_default();
    let chars: Vec<char> = text.chars().collect();
    let last = (hscroll + columns).min(chars.len() + 1);

    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for col in hscroll..last {
        let offset = line_start + col;
        let style = if caret_col == Some(col) {
            caret_style
        } else if offset >= selection.start() && offset < selection.end() {
            selected_style
        } else {
            Style::default()
        };
        let ch = match chars.get(col) {
            Some(ch) => *ch,
            // Past end of line: only the caret cell is drawn.
            None if caret_col == Some(col) => ' ',
            None => break,
        };
        if style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    spans
}

fn render_preview(model: &mut Model, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    model.refresh_preview(inner.width);

    let lines = model.preview_lines().to_vec();
    let scroll = u16::try_from(model.preview_scroll).unwrap_or(u16::MAX);
    let preview = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(Clear, area);
    frame.render_widget(preview, area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
