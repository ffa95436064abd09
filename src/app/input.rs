use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};
use crate::commands::Command;
use crate::dialog::ListKind;
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => self.handle_key(key, model),
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Paste(text) => {
                if !model.dialogs.is_empty() || !model.screen_state.shows_pad() {
                    return None;
                }
                Some(Message::EditorInsertStr(normalize_newlines(&text)))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        let area = Rect::new(0, 0, model.width, model.height);
        let areas = crate::ui::areas(area, model.screen_state);

        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
            && point_in_rect(mouse.column, mouse.row, areas.toolbar)
        {
            return crate::ui::toolbar::button_at(
                mouse.column - areas.toolbar.x,
                mouse.row - areas.toolbar.y,
                areas.toolbar.width,
            )
            .map(crate::ui::toolbar::ToolbarItem::message);
        }

        // Panes are inert behind a modal dialog.
        if !model.dialogs.is_empty() {
            return None;
        }

        let in_preview = areas
            .preview
            .is_some_and(|rect| point_in_rect(mouse.column, mouse.row, rect));
        let text_area = model.editor_text_area();
        let in_editor = text_area.is_some_and(|rect| point_in_rect(mouse.column, mouse.row, rect));

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if in_editor => {
                let (line, col) = editor_position(model, text_area?, mouse.column, mouse.row);
                Some(Message::EditorMoveTo(line, col))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let rect = text_area?;
                let column = mouse.column.clamp(rect.x, rect.x + rect.width.saturating_sub(1));
                let row = mouse.row.clamp(rect.y, rect.y + rect.height.saturating_sub(1));
                let (line, col) = editor_position(model, rect, column, row);
                Some(Message::EditorDragTo(line, col))
            }
            MouseEventKind::ScrollDown if in_preview => {
                Some(Message::PreviewScrollDown(WHEEL_LINES))
            }
            MouseEventKind::ScrollUp if in_preview => Some(Message::PreviewScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown if in_editor => Some(Message::EditorScrollDown(WHEEL_LINES)),
            MouseEventKind::ScrollUp if in_editor => Some(Message::EditorScrollUp(WHEEL_LINES)),
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if !model.dialogs.is_empty() {
            return Some(Message::DialogKey(key));
        }

        if let Some(msg) = shortcut(key) {
            return Some(msg);
        }

        if model.screen_state.shows_pad() {
            editor_key(key)
        } else {
            preview_key(key, model)
        }
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Global shortcuts, active whenever no dialog is open.
fn shortcut(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::F(1) => return Some(Message::ShowAbout),
        KeyCode::F(2) => return Some(Message::ShowOptions),
        KeyCode::F(3) => return Some(Message::CycleLayout),
        KeyCode::F(10) => return Some(Message::Quit),
        _ => {}
    }

    let KeyCode::Char(c) = key.code else {
        return None;
    };

    if ctrl {
        // Ctrl+Shift+X arrives as 'X', shifted 'x', or plain 'x' on legacy
        // terminals.
        if c.eq_ignore_ascii_case(&'x') {
            return Some(Message::Command(Command::Strikethrough));
        }
        return match c {
            'c' => Some(Message::Quit),
            'b' => Some(Message::Command(Command::Bold)),
            'i' => Some(Message::Command(Command::Italic)),
            'q' => Some(Message::Command(Command::Quote)),
            'k' => Some(Message::Command(Command::Link)),
            'o' => Some(Message::OpenFile),
            's' => Some(Message::SaveFile),
            'a' => Some(Message::EditorSelectAll),
            _ => None,
        };
    }

    if alt {
        if let Some(level) = c.to_digit(10).filter(|d| (1..=6).contains(d)) {
            return u8::try_from(level)
                .ok()
                .map(|level| Message::Command(Command::Header(level)));
        }
        return match c.to_ascii_lowercase() {
            'g' => Some(Message::Command(Command::Image)),
            'c' => Some(Message::Command(Command::Code)),
            'l' => Some(Message::Command(Command::List(ListKind::Bulleted))),
            'n' => Some(Message::Command(Command::List(ListKind::Numbered))),
            't' => Some(Message::Command(Command::Table)),
            'w' => Some(Message::CloseFile),
            _ => None,
        };
    }

    None
}

fn editor_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::EditorInsertChar(c))
        }
        KeyCode::Enter => Some(Message::EditorSplitLine),
        KeyCode::Tab => Some(Message::EditorInsertStr("    ".to_string())),
        KeyCode::Backspace => Some(Message::EditorDeleteBack),
        KeyCode::Delete => Some(Message::EditorDeleteForward),
        KeyCode::Left if ctrl => Some(Message::EditorMoveWordLeft(shift)),
        KeyCode::Right if ctrl => Some(Message::EditorMoveWordRight(shift)),
        KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left, shift)),
        KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right, shift)),
        KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up, shift)),
        KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down, shift)),
        KeyCode::Home if ctrl => Some(Message::EditorMoveToStart(shift)),
        KeyCode::End if ctrl => Some(Message::EditorMoveToEnd(shift)),
        KeyCode::Home => Some(Message::EditorMoveHome(shift)),
        KeyCode::End => Some(Message::EditorMoveEnd(shift)),
        KeyCode::PageUp => Some(Message::EditorPageUp(shift)),
        KeyCode::PageDown => Some(Message::EditorPageDown(shift)),
        _ => None,
    }
}

/// With the pad hidden, navigation keys scroll the preview.
fn preview_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let page = usize::from(model.height.saturating_sub(4)).max(1);
    match key.code {
        KeyCode::Up => Some(Message::PreviewScrollUp(1)),
        KeyCode::Down => Some(Message::PreviewScrollDown(1)),
        KeyCode::PageUp => Some(Message::PreviewScrollUp(page)),
        KeyCode::PageDown => Some(Message::PreviewScrollDown(page)),
        KeyCode::Home => Some(Message::PreviewScrollUp(usize::MAX)),
        KeyCode::End => Some(Message::PreviewScrollDown(usize::MAX)),
        _ => None,
    }
}

fn editor_position(model: &Model, area: Rect, column: u16, row: u16) -> (usize, usize) {
    let line = model.editor_scroll + usize::from(row.saturating_sub(area.y));
    let col = model.editor_hscroll + usize::from(column.saturating_sub(area.x));
    (line, col)
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x
        && col < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
