use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::dialog::{Dialog, DialogKind, Field, TextField};

const POPUP_WIDTH: u16 = 64;
/// Rows a multi-line field shows at most.
const MULTILINE_ROWS: usize = 8;

/// Where a dialog draws within `area`.
pub fn dialog_rect(dialog: &Dialog, area: Rect) -> Rect {
    let content = u16::try_from(dialog_lines(dialog).len()).unwrap_or(u16::MAX);
    // border(1) + padding(1) on each side = 4
    let height = content.saturating_add(4);
    let width = POPUP_WIDTH.min(area.width.saturating_sub(4)).max(24);
    centered_popup_rect(width, height, area)
}

pub fn render_dialog(dialog: &Dialog, frame: &mut Frame, area: Rect) {
    let popup = dialog_rect(dialog, area);
    let block = Block::default()
        .title(format!(" {} ", dialog.title()))
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(dialog_lines(dialog)).block(block), popup);
}

fn dialog_lines(dialog: &Dialog) -> Vec<Line<'static>> {
    let dim_style = Style::default().fg(Color::Indexed(245));
    if dialog.kind() == DialogKind::About {
        return about_lines(dim_style);
    }

    let mut lines = Vec::new();
    for (idx, field) in dialog.fields().iter().enumerate() {
        let focused = idx == dialog.focus();
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        match field {
            Field::Text(text) => {
                lines.push(Line::styled(text.label, label_style));
                lines.extend(text_field_lines(text, focused));
            }
            Field::Toggle { label, value } => {
                let mark = if *value { "[x]" } else { "[ ]" };
                lines.push(Line::styled(format!("{mark} {label}"), label_style));
            }
        }
        lines.push(Line::raw(""));
    }

    if let Some(error) = dialog.error() {
        lines.push(Line::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let has_multiline = dialog
        .fields()
        .iter()
        .any(|f| matches!(f, Field::Text(text) if text.multiline));
    let hint = if has_multiline {
        "Tab next field \u{2502} Ctrl+D confirm \u{2502} Esc cancel"
    } else if dialog.kind() == DialogKind::Options {
        "Space toggles \u{2502} Enter saves \u{2502} Esc cancel"
    } else {
        "Tab next field \u{2502} Enter confirm \u{2502} Esc cancel"
    };
    lines.push(Line::styled(hint, dim_style));
    lines
}

/// The field's value, one row per line, with the caret drawn when focused.
fn text_field_lines(field: &TextField, focused: bool) -> Vec<Line<'static>> {
    let value_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let caret_style = Style::default().bg(Color::White).fg(Color::Black);

    let mut rows: Vec<&str> = field.value().split('\n').collect();
    // Locate the caret as (row, col) in chars.
    let mut remaining = field.cursor();
    let mut caret = (0, 0);
    for (row, text) in rows.iter().enumerate() {
        let len = text.chars().count();
        if remaining <= len {
            caret = (row, remaining);
            break;
        }
        remaining -= len + 1;
    }

    let first = if field.multiline {
        caret.0.saturating_sub(MULTILINE_ROWS - 1)
    } else {
        0
    };
    let shown = if field.multiline { MULTILINE_ROWS } else { 1 };
    rows = rows.into_iter().skip(first).take(shown).collect();

    let mut lines: Vec<Line<'static>> = rows
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let row = first + i;
            if !focused || row != caret.0 {
                return Line::from(Span::styled(format!(" {text}"), value_style));
            }
            let before: String = text.chars().take(caret.1).collect();
            let at: String = text.chars().nth(caret.1).map_or(" ".into(), String::from);
            let after: String = text.chars().skip(caret.1 + 1).collect();
            Line::from(vec![
                Span::styled(format!(" {before}"), value_style),
                Span::styled(at, caret_style),
                Span::styled(after, value_style),
            ])
        })
        .collect();
    if field.multiline {
        while lines.len() < MULTILINE_ROWS {
            lines.push(Line::from(Span::styled(" ", value_style)));
        }
    }
    lines
}

fn about_lines(dim_style: Style) -> Vec<Line<'static>> {
    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::styled(
        format!("mdpad {}", env!("CARGO_PKG_VERSION")),
        section_style,
    ));
    lines.push(Line::raw("A markdown pad for the terminal."));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Formatting", section_style));
    lines.push(Line::raw("  Ctrl+B / Ctrl+I      Bold / italic"));
    lines.push(Line::raw("  Ctrl+Shift+X         Strikethrough"));
    lines.push(Line::styled(
        "  (Ctrl+I is Tab on some terminals; use the I button)",
        dim_style,
    ));
    lines.push(Line::raw("  Ctrl+Q               Quote"));
    lines.push(Line::raw("  Alt+1 .. Alt+6       Header 1-6"));
    lines.push(Line::raw("  Ctrl+K / Alt+G       Link / image"));
    lines.push(Line::raw("  Alt+C                Code block"));
    lines.push(Line::raw("  Alt+L / Alt+N        Bulleted / numbered list"));
    lines.push(Line::raw("  Alt+T                Table"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("File", section_style));
    lines.push(Line::raw("  Ctrl+O / Ctrl+S      Open / save"));
    lines.push(Line::raw("  Alt+W                Close file"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Other", section_style));
    lines.push(Line::raw("  F1 / F2              About / options"));
    lines.push(Line::raw("  F3                   Cycle layout"));
    lines.push(Line::raw("  Ctrl+C / F10         Quit"));
    lines.push(Line::raw(""));
    lines.push(Line::styled("Enter or Esc closes", dim_style));
    lines
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
