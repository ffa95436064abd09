use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::app::{Model, ToastLevel};
use crate::commands::{self, Action, Command};
use crate::dialog::{Dialog, DialogKind, DialogOutcome, DialogResult};
use crate::editor::Direction;
use crate::layout::ScreenState;
use crate::persistence::{FileError, FileState};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Toolbar
    /// Run a toolbar command against the current selection
    Command(Command),
    /// Ask for a file to open
    OpenFile,
    /// Save to the current file, or ask for a target
    SaveFile,
    /// Forget the current file and clear the document
    CloseFile,
    /// Show the about dialog
    ShowAbout,
    /// Show the options dialog
    ShowOptions,
    /// Step through the pane layouts
    CycleLayout,

    // Dialogs
    /// Key routed to the topmost dialog
    DialogKey(KeyEvent),
    /// Open the file at this path
    OpenPath(PathBuf),
    /// Save the document to this path
    SavePath(PathBuf),
    /// Change the spellcheck setting
    SetSpellcheck(bool),
    /// The settings store reported a new spellcheck value
    SpellcheckChanged(bool),

    // Editing
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert a string at the cursor (paste, tab)
    EditorInsertStr(String),
    /// Delete backward
    EditorDeleteBack,
    /// Delete forward
    EditorDeleteForward,
    /// Split line at the cursor
    EditorSplitLine,

    // Cursor movement; the flag extends the selection
    /// Move cursor one step
    EditorMoveCursor(Direction, bool),
    /// Move to start of line
    EditorMoveHome(bool),
    /// Move to end of line
    EditorMoveEnd(bool),
    /// Move one word left
    EditorMoveWordLeft(bool),
    /// Move one word right
    EditorMoveWordRight(bool),
    /// Move to start of document
    EditorMoveToStart(bool),
    /// Move to end of document
    EditorMoveToEnd(bool),
    /// Move up one screen
    EditorPageUp(bool),
    /// Move down one screen
    EditorPageDown(bool),
    /// Select the whole document
    EditorSelectAll,
    /// Place the caret at a line and column (mouse click)
    EditorMoveTo(usize, usize),
    /// Extend the selection to a line and column (mouse drag)
    EditorDragTo(usize, usize),

    // Scrolling
    /// Scroll the editor up by n lines
    EditorScrollUp(usize),
    /// Scroll the editor down by n lines
    EditorScrollDown(usize),
    /// Scroll the preview up by n lines
    PreviewScrollUp(usize),
    /// Scroll the preview down by n lines
    PreviewScrollDown(usize),

    // Window
    /// Terminal resized: columns, rows, layout width units
    Resize(u16, u16, u32),

    // Application
    /// Quit the application
    Quit,
}

impl Message {
    /// Messages that move or edit the caret.
    const fn touches_cursor(&self) -> bool {
        matches!(
            self,
            Self::Command(_)
                | Self::DialogKey(_)
                | Self::EditorInsertChar(_)
                | Self::EditorInsertStr(_)
                | Self::EditorDeleteBack
                | Self::EditorDeleteForward
                | Self::EditorSplitLine
                | Self::EditorMoveCursor(..)
                | Self::EditorMoveHome(_)
                | Self::EditorMoveEnd(_)
                | Self::EditorMoveWordLeft(_)
                | Self::EditorMoveWordRight(_)
                | Self::EditorMoveToStart(_)
                | Self::EditorMoveToEnd(_)
                | Self::EditorPageUp(_)
                | Self::EditorPageDown(_)
                | Self::EditorSelectAll
                | Self::EditorMoveTo(..)
                | Self::EditorDragTo(..)
        )
    }
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// File and settings I/O happen afterwards in the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // SaveFile keeps a pending quit so Ctrl+S can resolve it.
    if !matches!(
        msg,
        Message::Quit | Message::SaveFile | Message::Resize(..) | Message::SpellcheckChanged(_)
    ) {
        model.quit_confirmed = false;
    }
    let follow_cursor = msg.touches_cursor();

    match msg {
        Message::Command(command) => run_command(&mut model, command),
        Message::OpenFile => {
            if model.file_state == FileState::Disabled {
                model.show_toast(
                    ToastLevel::Error,
                    FileError::CapabilityUnavailable.to_string(),
                );
            } else {
                let default = model
                    .current_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("./"));
                model.open_dialog(Dialog::open_file(&default));
            }
        }
        // Performed by the side-effect handler
        Message::SaveFile | Message::OpenPath(_) | Message::SavePath(_) => {}
        Message::CloseFile => {
            model.load_document("");
        }
        Message::ShowAbout => model.open_dialog(Dialog::about()),
        Message::ShowOptions => model.open_dialog(Dialog::options(model.spellcheck)),
        Message::CycleLayout => {
            model.screen_state = model.screen_state.next();
            tracing::debug!(state = ?model.screen_state, "layout cycled");
        }

        Message::DialogKey(key) => {
            if let Some((kind, outcome)) = model.dialogs.handle_key(key) {
                finish_dialog(&mut model, kind, outcome);
            }
        }
        Message::SetSpellcheck(_) => {}
        Message::SpellcheckChanged(enabled) => model.spellcheck = enabled,

        Message::EditorInsertChar(ch) => model.buffer.insert_char(ch),
        Message::EditorInsertStr(s) => model.buffer.insert_str(&s),
        Message::EditorDeleteBack => {
            model.buffer.delete_back();
        }
        Message::EditorDeleteForward => {
            model.buffer.delete_forward();
        }
        Message::EditorSplitLine => model.buffer.split_line(),

        Message::EditorMoveCursor(dir, extend) => model.buffer.move_cursor(dir, extend),
        Message::EditorMoveHome(extend) => model.buffer.move_home(extend),
        Message::EditorMoveEnd(extend) => model.buffer.move_end(extend),
        Message::EditorMoveWordLeft(extend) => model.buffer.move_word_left(extend),
        Message::EditorMoveWordRight(extend) => model.buffer.move_word_right(extend),
        Message::EditorMoveToStart(extend) => model.buffer.move_to_start(extend),
        Message::EditorMoveToEnd(extend) => model.buffer.move_to_end(extend),
        Message::EditorPageUp(extend) => {
            for _ in 0..model.editor_rows().max(1) {
                model.buffer.move_cursor(Direction::Up, extend);
            }
        }
        Message::EditorPageDown(extend) => {
            for _ in 0..model.editor_rows().max(1) {
                model.buffer.move_cursor(Direction::Down, extend);
            }
        }
        Message::EditorSelectAll => model.buffer.select_all(),
        Message::EditorMoveTo(line, col) => model.buffer.move_to(line, col),
        Message::EditorDragTo(line, col) => model.buffer.extend_to(line, col),

        Message::EditorScrollUp(n) => {
            model.editor_scroll = model.editor_scroll.saturating_sub(n);
        }
        Message::EditorScrollDown(n) => {
            let max = model.buffer.line_count().saturating_sub(1);
            model.editor_scroll = model.editor_scroll.saturating_add(n).min(max);
        }
        Message::PreviewScrollUp(n) => {
            model.preview_scroll = model.preview_scroll.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            model.preview_scroll = model.preview_scroll.saturating_add(n);
            model.clamp_preview_scroll();
        }

        Message::Resize(width, height, units) => {
            model.width = width;
            model.height = height;
            let state = ScreenState::from_width(units);
            if state != model.screen_state {
                tracing::debug!(?state, units, "layout changed");
            }
            model.screen_state = state;
        }

        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+C again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }

    if follow_cursor {
        model.ensure_cursor_visible();
    }
    model
}

fn run_command(model: &mut Model, command: Command) {
    let action = commands::run(
        command,
        model.command_style,
        &model.buffer.text(),
        model.buffer.selection(),
    );
    match action {
        // The document is read-only behind a modal dialog.
        Action::Apply(_) if !model.dialogs.is_empty() => {
            tracing::debug!(?command, "ignored while a dialog is open");
        }
        Action::Apply(splice) => model.buffer.apply(splice),
        Action::Prompt(dialog) => model.open_dialog(dialog),
        Action::Nothing => {}
    }
}

fn finish_dialog(model: &mut Model, kind: DialogKind, outcome: DialogOutcome) {
    let result = match outcome {
        DialogOutcome::Pending => return,
        DialogOutcome::Cancelled => {
            tracing::debug!(?kind, "dialog cancelled");
            return;
        }
        DialogOutcome::Confirmed(result) => result,
    };
    tracing::debug!(?kind, "dialog confirmed");

    match (kind, result) {
        (DialogKind::OpenFile, DialogResult::Path(path)) => {
            model.push_followup(Message::OpenPath(path));
        }
        (DialogKind::SaveFile, DialogResult::Path(path)) => {
            model.push_followup(Message::SavePath(path));
        }
        (_, DialogResult::Options { spellcheck }) => {
            model.push_followup(Message::SetSpellcheck(spellcheck));
        }
        (_, DialogResult::Acknowledged) => {}
        (_, result) => {
            let doc = model.buffer.text();
            let selection = model.buffer.selection();
            if let Some(splice) = commands::complete(&result, &doc, selection) {
                model.buffer.apply(splice);
            }
        }
    }
}

