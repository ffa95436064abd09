use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let dirty_indicator = if model.buffer.is_dirty() {
        " [modified]"
    } else {
        ""
    };
    let cursor = model.buffer.cursor();
    let spell = if model.spellcheck {
        "spell on"
    } else {
        "spell off"
    };

    let status = format!(
        " {}{}  Ln {}, Col {}  [{}]  [{}]  {}",
        model.display_name(),
        dirty_indicator,
        cursor.line + 1,
        cursor.col + 1,
        model.file_state.label(),
        model.screen_state.label(),
        spell,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}

pub fn render_hint_bar(frame: &mut Frame, area: Rect) {
    let hint = " Ctrl+S save  Ctrl+O open  F1 about  F2 options  F3 layout  Ctrl+C quit";
    let bar = Paragraph::new(hint).style(Style::default().fg(Color::Indexed(245)));
    frame.render_widget(bar, area);
}
