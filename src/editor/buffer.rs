use std::sync::mpsc::Receiver;

use ropey::Rope;

use super::mutator::Splice;
use crate::observable::Subject;

/// A selection over the buffer in char offsets.
///
/// `anchor` is where the selection started, `head` is where the caret is.
/// When both are equal the selection is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub const fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Lower bound of the selected range.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Upper bound of the selected range (exclusive).
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub const fn is_caret(&self) -> bool {
        self.anchor == self.head
    }

    /// Clamp both ends to `len`.
    pub fn clamped(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            head: self.head.min(len),
        }
    }
}

/// Caret position as line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (char offset within the line).
    pub col: usize,
}

impl Cursor {
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The document text backed by a rope, plus the current selection.
///
/// Every content change bumps a revision counter and publishes it to the
/// subscribers returned by [`EditorBuffer::subscribe`].
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    /// Remembered column for vertical movement (sticky column).
    goal_col: Option<usize>,
    dirty: bool,
    revision: u64,
    changes: Subject<u64>,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::default(),
            goal_col: None,
            dirty: false,
            revision: 0,
            changes: Subject::new(),
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Subscribe to content changes. Each message is the new revision number.
    pub fn subscribe(&mut self) -> Receiver<u64> {
        self.changes.subscribe()
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection, clamped to the buffer length.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped(self.len_chars());
        self.goal_col = None;
    }

    /// The caret position as line/column.
    pub fn cursor(&self) -> Cursor {
        let head = self.selection.head.min(self.len_chars());
        let line = self.rope.char_to_line(head);
        Cursor::at(line, head - self.rope.line_to_char(line))
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        Some(line.chars().take(self.line_len(line_idx)).collect())
    }

    /// Char offset of the first char on `line_idx`.
    pub fn line_start(&self, line_idx: usize) -> usize {
        self.rope
            .line_to_char(line_idx.min(self.rope.len_lines().saturating_sub(1)))
    }

    /// Length of a line in chars (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(line_idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// The text covered by the current selection.
    pub fn selected_text(&self) -> String {
        let len = self.len_chars();
        let start = self.selection.start().min(len);
        let end = self.selection.end().min(len);
        self.rope.slice(start..end).to_string()
    }

    /// Replace the whole value. The caret moves to the end.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selection = Selection::caret(self.rope.len_chars());
        self.goal_col = None;
        self.touch();
    }

    /// Apply a splice computed by one of the [`super::mutator`] functions.
    pub fn apply(&mut self, splice: Splice) {
        self.rope = Rope::from_str(&splice.text);
        self.selection = splice.selection.clamped(self.rope.len_chars());
        self.goal_col = None;
        self.touch();
    }

    /// Insert a character, replacing any selected text.
    pub fn insert_char(&mut self, ch: char) {
        let mut tmp = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut tmp));
    }

    /// Insert a string, replacing any selected text.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() && self.selection.is_caret() {
            return;
        }
        let start = self.remove_selection();
        self.rope.insert(start, s);
        self.selection = Selection::caret(start + s.chars().count());
        self.goal_col = None;
        self.touch();
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if !self.selection.is_caret() {
            self.remove_selection();
            self.touch();
            return true;
        }
        let head = self.selection.head.min(self.len_chars());
        if head == 0 {
            return false;
        }
        let start = self.prev_boundary(head);
        self.rope.remove(start..head);
        self.selection = Selection::caret(start);
        self.goal_col = None;
        self.touch();
        true
    }

    /// Delete the selection, or the character at the caret (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if !self.selection.is_caret() {
            self.remove_selection();
            self.touch();
            return true;
        }
        let head = self.selection.head;
        if head >= self.len_chars() {
            return false;
        }
        let end = self.next_boundary(head);
        self.rope.remove(head..end);
        self.goal_col = None;
        self.touch();
        true
    }

    /// Move the caret in the given direction. With `extend` the anchor stays put.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        match direction {
            Direction::Left => {
                let target = if !extend && !self.selection.is_caret() {
                    self.selection.start()
                } else {
                    self.prev_boundary(self.selection.head.min(self.len_chars()))
                };
                self.place_head(target, extend);
            }
            Direction::Right => {
                let target = if !extend && !self.selection.is_caret() {
                    self.selection.end()
                } else {
                    self.next_boundary(self.selection.head)
                };
                self.place_head(target, extend);
            }
            Direction::Up => self.move_vertical(-1, extend),
            Direction::Down => self.move_vertical(1, extend),
        }
    }

    /// Move caret to the beginning of the line (Home).
    pub fn move_home(&mut self, extend: bool) {
        let line = self.cursor().line;
        self.place_head(self.line_start(line), extend);
    }

    /// Move caret to the end of the line (End).
    pub fn move_end(&mut self, extend: bool) {
        let line = self.cursor().line;
        self.place_head(self.line_start(line) + self.line_len(line), extend);
    }

    /// Move caret to the previous word start (Ctrl+Left).
    pub fn move_word_left(&mut self, extend: bool) {
        let mut pos = self.selection.head;
        while pos > 0 && !is_word_char(self.rope.char(pos - 1)) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(self.rope.char(pos - 1)) {
            pos -= 1;
        }
        self.place_head(pos, extend);
    }

    /// Move caret past the current word and following gap (Ctrl+Right).
    pub fn move_word_right(&mut self, extend: bool) {
        let len = self.len_chars();
        let mut pos = self.selection.head;
        while pos < len && is_word_char(self.rope.char(pos)) {
            pos += 1;
        }
        while pos < len && !is_word_char(self.rope.char(pos)) {
            pos += 1;
        }
        self.place_head(pos, extend);
    }

    /// Move caret to a specific line and column, clamped to the buffer.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.place_head(self.offset_at(line, col), false);
    }

    /// Move only the head to a line and column, keeping the anchor (mouse drag).
    pub fn extend_to(&mut self, line: usize, col: usize) {
        self.place_head(self.offset_at(line, col), true);
    }

    fn offset_at(&self, line: usize, col: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        self.line_start(line) + col.min(self.line_len(line))
    }

    /// Move caret to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self, extend: bool) {
        self.place_head(0, extend);
    }

    /// Move caret to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self, extend: bool) {
        self.place_head(self.len_chars(), extend);
    }

    /// Select the whole buffer (Ctrl+A).
    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.len_chars());
        self.goal_col = None;
    }

    // --- Private helpers ---

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
        self.changes.emit(&self.revision);
    }

    /// Remove the selected range and return where it started.
    fn remove_selection(&mut self) -> usize {
        let len = self.len_chars();
        let start = self.selection.start().min(len);
        let end = self.selection.end().min(len);
        if start < end {
            self.rope.remove(start..end);
        }
        self.selection = Selection::caret(start);
        start
    }

    /// A `\r\n` pair is one step; the caret never sits between the two.
    fn is_crlf_at(&self, pos: usize) -> bool {
        pos + 1 < self.len_chars()
            && self.rope.char(pos) == '\r'
            && self.rope.char(pos + 1) == '\n'
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        if pos >= 2 && self.is_crlf_at(pos - 2) {
            pos - 2
        } else {
            pos.saturating_sub(1)
        }
    }

    fn next_boundary(&self, pos: usize) -> usize {
        if self.is_crlf_at(pos) {
            pos + 2
        } else {
            (pos + 1).min(self.len_chars())
        }
    }

    fn place_head(&mut self, pos: usize, extend: bool) {
        let mut pos = pos.min(self.len_chars());
        if pos > 0 && self.is_crlf_at(pos - 1) {
            pos += 1;
        }
        if extend {
            self.selection.head = pos;
        } else {
            self.selection = Selection::caret(pos);
        }
        self.goal_col = None;
    }

    fn move_vertical(&mut self, delta: isize, extend: bool) {
        let cursor = self.cursor();
        let goal = self.goal_col.unwrap_or(cursor.col);
        let Some(target_line) = cursor.line.checked_add_signed(delta) else {
            return;
        };
        if target_line >= self.line_count() {
            return;
        }
        let col = goal.min(self.line_len(target_line));
        self.place_head(self.line_start(target_line) + col, extend);
        self.goal_col = Some(goal);
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
    }

    #[test]
    fn test_line_len_ignores_crlf() {
        let buf = EditorBuffer::from_text("ab\r\ncd");
        assert_eq!(buf.line_len(0), 2);
        assert_eq!(buf.line_at(0), Some("ab".to_string()));
    }

    #[test]
    fn test_crlf_is_one_caret_step() {
        let mut buf = EditorBuffer::from_text("ab\r\ncd");
        buf.move_end(false);
        buf.move_cursor(Direction::Right, false);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.insert_char('X');
        assert_eq!(buf.text(), "ab\r\nXcd");

        buf.move_home(false);
        buf.move_cursor(Direction::Left, false);
        assert_eq!(buf.selection(), Selection::caret(2));
    }

    #[test]
    fn test_crlf_deletes_as_a_pair() {
        let mut buf = EditorBuffer::from_text("ab\r\ncd");
        buf.move_to(1, 0);
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "abcd");

        let mut buf = EditorBuffer::from_text("ab\r\ncd");
        buf.move_to(0, 2);
        assert!(buf.delete_forward());
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_word_movement_skips_crlf() {
        let mut buf = EditorBuffer::from_text("ab\r\ncd");
        buf.move_word_right(false);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.move_to_end(false);
        buf.move_word_left(false);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    // --- Selection ---

    #[test]
    fn test_selection_orders_bounds() {
        let sel = Selection::new(7, 2);
        assert_eq!(sel.start(), 2);
        assert_eq!(sel.end(), 7);
        assert!(!sel.is_caret());
    }

    #[test]
    fn test_set_selection_clamps_to_length() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.set_selection(Selection::new(1, 99));
        assert_eq!(buf.selection(), Selection::new(1, 3));
        assert_eq!(buf.selected_text(), "bc");
    }

    #[test]
    fn test_cursor_reports_line_and_col() {
        let mut buf = EditorBuffer::from_text("ab\ncde");
        buf.set_selection(Selection::caret(4));
        assert_eq!(buf.cursor(), Cursor::at(1, 1));
    }

    // --- Change notification ---

    #[test]
    fn test_edits_bump_revision_and_notify() {
        let mut buf = EditorBuffer::from_text("hi");
        let rx = buf.subscribe();
        buf.insert_char('!');
        buf.set_text("fresh");
        assert_eq!(buf.revision(), 2);
        assert_eq!(rx.try_recv(), Ok(1));
        assert_eq!(rx.try_recv(), Ok(2));
    }

    #[test]
    fn test_cursor_movement_does_not_notify() {
        let mut buf = EditorBuffer::from_text("hello");
        let rx = buf.subscribe();
        buf.move_cursor(Direction::Right, false);
        buf.move_end(false);
        assert!(rx.try_recv().is_err());
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_set_text_places_caret_at_end() {
        let mut buf = EditorBuffer::empty();
        buf.set_text("héllo");
        assert_eq!(buf.selection(), Selection::caret(5));
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('!');
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    // --- Insertion and deletion ---

    #[test]
    fn test_insert_char_at_start() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_char('H');
        assert_eq!(buf.text(), "Hhello");
        assert_eq!(buf.cursor(), Cursor::at(0, 1));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(Selection::new(0, 5));
        buf.insert_str("howdy");
        assert_eq!(buf.text(), "howdy world");
        assert_eq!(buf.selection(), Selection::caret(5));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.insert_str("");
        assert!(!buf.is_dirty());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_to(0, 5);
        buf.split_line();
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        assert!(!buf.delete_back());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.delete_back();
        assert_eq!(buf.text(), "helloworld");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_removes_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.set_selection(Selection::new(11, 5));
        assert!(buf.delete_back());
        assert_eq!(buf.text(), "hello");
        assert_eq!(buf.selection(), Selection::caret(5));
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to_end(false);
        assert!(!buf.delete_forward());
    }

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.delete_forward();
        assert_eq!(buf.text(), "helloworld");
    }

    #[test]
    fn test_delete_back_multibyte() {
        let mut buf = EditorBuffer::from_text("café");
        buf.move_to_end(false);
        buf.delete_back();
        assert_eq!(buf.text(), "caf");
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_collapses_selection_to_start() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.set_selection(Selection::new(1, 4));
        buf.move_cursor(Direction::Left, false);
        assert_eq!(buf.selection(), Selection::caret(1));
    }

    #[test]
    fn test_shift_right_extends_selection() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_cursor(Direction::Right, true);
        buf.move_cursor(Direction::Right, true);
        assert_eq!(buf.selection(), Selection::new(0, 2));
        assert_eq!(buf.selected_text(), "he");
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_cursor(Direction::Right, false);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_move_up_at_first_line_is_noop() {
        let mut buf = EditorBuffer::from_text("hello\nworld");
        buf.move_cursor(Direction::Up, false);
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = EditorBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
        buf.move_cursor(Direction::Down, false);
        assert_eq!(buf.cursor(), Cursor::at(2, 4));
    }

    #[test]
    fn test_home_and_end() {
        let mut buf = EditorBuffer::from_text("ab\nhello");
        buf.move_to(1, 3);
        buf.move_home(false);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
        buf.move_end(true);
        assert_eq!(buf.selected_text(), "hello");
    }

    #[test]
    fn test_word_movement() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.move_word_right(false);
        assert_eq!(buf.selection().head, 6);
        buf.move_to(0, 8);
        buf.move_word_left(false);
        assert_eq!(buf.selection().head, 6);
        buf.move_word_left(false);
        assert_eq!(buf.selection().head, 0);
    }

    #[test]
    fn test_move_to_clamps() {
        let mut buf = EditorBuffer::from_text("hello");
        buf.move_to(100, 100);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_select_all() {
        let mut buf = EditorBuffer::from_text("one\ntwo");
        buf.select_all();
        assert_eq!(buf.selected_text(), "one\ntwo");
    }
}
