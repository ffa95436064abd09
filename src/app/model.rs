use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::text::Line;

use crate::commands::CommandStyle;
use crate::dialog::{Dialog, DialogStack};
use crate::editor::EditorBuffer;
use crate::layout::ScreenState;
use crate::observable::latest;
use crate::persistence::FileState;

use super::update::Message;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

/// Shown once at startup when the terminal cannot tell Ctrl+I from Tab.
pub const LEGACY_KEYBOARD_HINT: &str =
    "Ctrl+I arrives as Tab in this terminal; use the I toolbar button for italic";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. File and settings
/// state is owned by [`crate::app::App`]; the model keeps mirrors of what
/// the UI needs to show.
pub struct Model {
    /// The document being edited
    pub buffer: EditorBuffer,
    buffer_changes: Receiver<u64>,
    preview: Vec<Line<'static>>,
    preview_width: u16,
    /// Preview height in rows once wrapped to `preview_width`
    preview_rows: usize,
    preview_stale: bool,
    /// First visible preview row
    pub preview_scroll: usize,
    /// First visible editor line
    pub editor_scroll: usize,
    /// First visible editor column
    pub editor_hscroll: usize,
    /// Open modal dialogs, topmost last
    pub dialogs: DialogStack,
    pub screen_state: ScreenState,
    pub command_style: CommandStyle,
    /// Mirror of the persistence adapter state
    pub file_state: FileState,
    /// Mirror of the current file path
    pub current_file: Option<PathBuf>,
    /// Mirror of the `spellcheck` setting
    pub spellcheck: bool,
    toast: Option<Toast>,
    notice_count: usize,
    followups: VecDeque<Message>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after the first quit request with unsaved changes
    pub quit_confirmed: bool,
    /// Terminal size in cells
    pub width: u16,
    pub height: u16,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("revision", &self.buffer.revision())
            .field("screen_state", &self.screen_state)
            .field("file_state", &self.file_state)
            .field("current_file", &self.current_file)
            .field("dialogs", &self.dialogs.len())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for a terminal of the given size.
    pub fn new(width: u16, height: u16, layout_units: u32) -> Self {
        Self {
            width,
            height,
            screen_state: ScreenState::from_width(layout_units),
            ..Self::default()
        }
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?level, %message, "toast");
        self.toast = Some(Toast {
            level,
            message,
            expires_at: Instant::now() + TOAST_DURATION,
        });
        self.notice_count += 1;
    }

    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Point at the toolbar when keyboard enhancement is unavailable, unless
    /// a startup notice is already showing.
    pub fn note_legacy_keyboard(&mut self) {
        if self.toast.is_none() {
            self.show_toast(ToastLevel::Info, LEGACY_KEYBOARD_HINT);
        }
    }

    /// Toasts shown since startup.
    pub const fn notice_count(&self) -> usize {
        self.notice_count
    }

    /// Open a dialog unless one of the same kind is already open.
    pub fn open_dialog(&mut self, dialog: Dialog) {
        let kind = dialog.kind();
        if self.dialogs.open(dialog) {
            tracing::debug!(?kind, "dialog opened");
        } else {
            tracing::debug!(?kind, "dialog already open");
        }
    }

    /// Replace the document with freshly loaded text. The result is clean.
    pub fn load_document(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.buffer.move_to_start(false);
        self.buffer.mark_clean();
        self.editor_scroll = 0;
        self.editor_hscroll = 0;
        self.preview_scroll = 0;
    }

    /// Queue a message to run after the current one.
    pub(super) fn push_followup(&mut self, msg: Message) {
        self.followups.push_back(msg);
    }

    pub(super) fn take_followups(&mut self) -> VecDeque<Message> {
        std::mem::take(&mut self.followups)
    }

    /// Re-render the preview if the buffer changed or the width did.
    /// Returns whether it rendered.
    pub fn refresh_preview(&mut self, width: u16) -> bool {
        let changed = latest(&self.buffer_changes).is_some();
        if !changed && !self.preview_stale && width == self.preview_width {
            return false;
        }
        self.preview = crate::preview::render(&self.buffer.text(), width);
        self.preview_width = width;
        let columns = usize::from(width.max(1));
        self.preview_rows = self
            .preview
            .iter()
            .map(|line| line.width().div_ceil(columns).max(1))
            .sum();
        self.preview_stale = false;
        self.clamp_preview_scroll();
        true
    }

    pub fn preview_lines(&self) -> &[Line<'static>] {
        &self.preview
    }

    pub(super) fn clamp_preview_scroll(&mut self) {
        self.preview_scroll = self
            .preview_scroll
            .min(self.preview_rows.saturating_sub(1));
    }

    /// Screen area of the editor text, excluding the line-number gutter.
    pub fn editor_text_area(&self) -> Option<Rect> {
        let area = Rect::new(0, 0, self.width, self.height);
        crate::ui::areas(area, self.screen_state)
            .editor
            .map(|editor| crate::ui::editor_text_area(editor, self.buffer.line_count()))
    }

    /// Visible editor rows.
    pub fn editor_rows(&self) -> usize {
        self.editor_text_area()
            .map_or(0, |area| usize::from(area.height))
    }

    /// Scroll the editor so the caret is on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let Some(area) = self.editor_text_area() else {
            return;
        };
        let cursor = self.buffer.cursor();
        let rows = usize::from(area.height);
        if rows == 0 {
            self.editor_scroll = cursor.line;
        } else if cursor.line < self.editor_scroll {
            self.editor_scroll = cursor.line;
        } else if cursor.line >= self.editor_scroll + rows {
            self.editor_scroll = cursor.line + 1 - rows;
        }

        // Keep one cell for the caret past end of line.
        let cols = usize::from(area.width).saturating_sub(1).max(1);
        if cursor.col < self.editor_hscroll {
            self.editor_hscroll = cursor.col;
        } else if cursor.col >= self.editor_hscroll + cols {
            self.editor_hscroll = cursor.col + 1 - cols;
        }
    }

    pub fn set_file_info(&mut self, state: FileState, current: Option<PathBuf>) {
        self.file_state = state;
        self.current_file = current;
    }

    /// File name shown in the status bar.
    pub fn display_name(&self) -> String {
        self.current_file
            .as_deref()
            .and_then(std::path::Path::file_name)
            .map_or_else(
                || "untitled".to_string(),
                |name| name.to_string_lossy().to_string(),
            )
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        let mut buffer = EditorBuffer::empty();
        let buffer_changes = buffer.subscribe();
        Self {
            buffer,
            buffer_changes,
            preview: Vec::new(),
            preview_width: 0,
            preview_rows: 0,
            preview_stale: true,
            preview_scroll: 0,
            editor_scroll: 0,
            editor_hscroll: 0,
            dialogs: DialogStack::new(),
            screen_state: ScreenState::default(),
            command_style: CommandStyle::default(),
            file_state: FileState::EnabledNoFile,
            current_file: None,
            spellcheck: true,
            toast: None,
            notice_count: 0,
            followups: VecDeque::new(),
            should_quit: false,
            quit_confirmed: false,
            width: 80,
            height: 24,
        }
    }
}
