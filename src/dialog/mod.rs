//! Modal dialogs.
//!
//! A [`Dialog`] is a small form. Keys are fed to the topmost open dialog; the
//! dialog answers with a [`DialogOutcome`]. Cancellation is its own outcome,
//! distinct from a confirmed-but-empty result, so callers never mutate the
//! document on cancel.
//!
//! [`DialogStack`] holds every open dialog and refuses to open a second
//! dialog of a kind that is already open.

mod field;

pub use field::{Field, TextField};

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Upper bound for table rows and columns.
pub const MAX_TABLE_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    Link,
    Image,
    Code,
    /// Bulleted and numbered lists share one dialog kind.
    List,
    Table,
    OpenFile,
    SaveFile,
    About,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// Structured input collected by a confirmed dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Link {
        link: String,
        title: Option<String>,
    },
    Image {
        alt: String,
        link: String,
        title: Option<String>,
    },
    Code {
        language: String,
        code: String,
    },
    List {
        kind: ListKind,
        items: Vec<String>,
    },
    Table {
        rows: usize,
        columns: usize,
    },
    Path(PathBuf),
    Options {
        spellcheck: bool,
    },
    /// Informational dialogs closed with Enter.
    Acknowledged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Still open, waiting for more input.
    Pending,
    Confirmed(DialogResult),
    Cancelled,
}

/// An open modal form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    kind: DialogKind,
    title: &'static str,
    list_kind: Option<ListKind>,
    fields: Vec<Field>,
    focus: usize,
    error: Option<String>,
}

impl Dialog {
    fn new(kind: DialogKind, title: &'static str, fields: Vec<Field>) -> Self {
        Self {
            kind,
            title,
            list_kind: None,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn link() -> Self {
        Self::new(
            DialogKind::Link,
            "Insert link",
            vec![
                Field::Text(TextField::new("URL")),
                Field::Text(TextField::new("Title")),
            ],
        )
    }

    pub fn image() -> Self {
        Self::new(
            DialogKind::Image,
            "Insert image",
            vec![
                Field::Text(TextField::new("Alt text")),
                Field::Text(TextField::new("URL")),
                Field::Text(TextField::new("Title")),
            ],
        )
    }

    pub fn code() -> Self {
        Self::new(
            DialogKind::Code,
            "Insert code block",
            vec![
                Field::Text(TextField::new("Language")),
                Field::Text(TextField::multiline("Code")),
            ],
        )
    }

    pub fn list(kind: ListKind) -> Self {
        let title = match kind {
            ListKind::Bulleted => "Insert bulleted list",
            ListKind::Numbered => "Insert numbered list",
        };
        let mut dialog = Self::new(
            DialogKind::List,
            title,
            vec![Field::Text(TextField::multiline("Items (one per line)"))],
        );
        dialog.list_kind = Some(kind);
        dialog
    }

    pub fn table() -> Self {
        Self::new(
            DialogKind::Table,
            "Insert table",
            vec![
                Field::Text(TextField::new("Rows").with_value("2")),
                Field::Text(TextField::new("Columns").with_value("3")),
            ],
        )
    }

    pub fn open_file(default: &Path) -> Self {
        Self::new(
            DialogKind::OpenFile,
            "Open file",
            vec![Field::Text(
                TextField::new("Path").with_value(default.display().to_string()),
            )],
        )
    }

    pub fn save_file(default: &Path) -> Self {
        Self::new(
            DialogKind::SaveFile,
            "Save as",
            vec![Field::Text(
                TextField::new("Path").with_value(default.display().to_string()),
            )],
        )
    }

    pub fn about() -> Self {
        Self::new(DialogKind::About, "About mdpad", Vec::new())
    }

    pub fn options(spellcheck: bool) -> Self {
        Self::new(
            DialogKind::Options,
            "Options",
            vec![Field::Toggle {
                label: "Spellcheck",
                value: spellcheck,
            }],
        )
    }

    pub const fn kind(&self) -> DialogKind {
        self.kind
    }

    pub const fn title(&self) -> &'static str {
        self.title
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub const fn focus(&self) -> usize {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Feed one key press to the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if self.kind == DialogKind::About {
            return match key.code {
                KeyCode::Esc => DialogOutcome::Cancelled,
                KeyCode::Enter | KeyCode::F(1) => self.confirm(),
                _ => DialogOutcome::Pending,
            };
        }

        match key.code {
            KeyCode::Esc => return DialogOutcome::Cancelled,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Char('d') if ctrl => return self.confirm(),
            KeyCode::Enter if ctrl => return self.confirm(),
            KeyCode::Enter => {
                if let Some(field) = self.focused_text().filter(|f| f.multiline) {
                    field.insert_char('\n');
                    self.error = None;
                } else {
                    return self.confirm();
                }
            }
            KeyCode::Char(' ') if self.toggle_focused() => {}
            KeyCode::Char(ch) if !ctrl && !alt => {
                if let Some(field) = self.focused_text() {
                    field.insert_char(ch);
                    self.error = None;
                }
            }
            KeyCode::Backspace => self.edit_focused(TextField::delete_back),
            KeyCode::Delete => self.edit_focused(TextField::delete_forward),
            KeyCode::Left => self.edit_focused(TextField::move_left),
            KeyCode::Right => self.edit_focused(TextField::move_right),
            KeyCode::Home => self.edit_focused(TextField::move_home),
            KeyCode::End => self.edit_focused(TextField::move_end),
            _ => {}
        }
        DialogOutcome::Pending
    }

    fn confirm(&mut self) -> DialogOutcome {
        match self.validate() {
            Ok(result) => DialogOutcome::Confirmed(result),
            Err(message) => {
                self.error = Some(message);
                DialogOutcome::Pending
            }
        }
    }

    fn validate(&self) -> Result<DialogResult, String> {
        match self.kind {
            DialogKind::Link => Ok(DialogResult::Link {
                link: self.required(0, "URL is required")?,
                title: self.optional(1),
            }),
            DialogKind::Image => Ok(DialogResult::Image {
                alt: self.text(0).trim().to_string(),
                link: self.required(1, "URL is required")?,
                title: self.optional(2),
            }),
            DialogKind::Code => Ok(DialogResult::Code {
                language: self.text(0).trim().to_string(),
                code: self.text(1).trim_end_matches('\n').to_string(),
            }),
            DialogKind::List => Ok(DialogResult::List {
                kind: self.list_kind.unwrap_or(ListKind::Bulleted),
                items: self
                    .text(0)
                    .lines()
                    .map(str::trim_end)
                    .filter(|line| !line.trim().is_empty())
                    .map(ToString::to_string)
                    .collect(),
            }),
            DialogKind::Table => Ok(DialogResult::Table {
                rows: parse_table_size(self.text(0), "Rows")?,
                columns: parse_table_size(self.text(1), "Columns")?,
            }),
            DialogKind::OpenFile | DialogKind::SaveFile => Ok(DialogResult::Path(PathBuf::from(
                self.required(0, "Path is required")?,
            ))),
            DialogKind::Options => Ok(DialogResult::Options {
                spellcheck: matches!(self.fields.first(), Some(Field::Toggle { value: true, .. })),
            }),
            DialogKind::About => Ok(DialogResult::Acknowledged),
        }
    }

    fn text(&self, idx: usize) -> &str {
        match self.fields.get(idx) {
            Some(Field::Text(field)) => field.value(),
            _ => "",
        }
    }

    fn required(&self, idx: usize, message: &str) -> Result<String, String> {
        let value = self.text(idx).trim();
        if value.is_empty() {
            Err(message.to_string())
        } else {
            Ok(value.to_string())
        }
    }

    fn optional(&self, idx: usize) -> Option<String> {
        let value = self.text(idx).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn focused_text(&mut self) -> Option<&mut TextField> {
        match self.fields.get_mut(self.focus) {
            Some(Field::Text(field)) => Some(field),
            _ => None,
        }
    }

    fn edit_focused(&mut self, op: impl FnOnce(&mut TextField)) {
        if let Some(field) = self.focused_text() {
            op(field);
            self.error = None;
        }
    }

    fn toggle_focused(&mut self) -> bool {
        if let Some(Field::Toggle { value, .. }) = self.fields.get_mut(self.focus) {
            *value = !*value;
            return true;
        }
        false
    }

    fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }
}

fn parse_table_size(value: &str, what: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=MAX_TABLE_SIZE).contains(n))
        .ok_or_else(|| format!("{what} must be a number between 1 and {MAX_TABLE_SIZE}"))
}

/// Every open dialog, topmost last. At most one per [`DialogKind`].
#[derive(Debug, Default)]
pub struct DialogStack {
    open: Vec<Dialog>,
}

impl DialogStack {
    pub const fn new() -> Self {
        Self { open: Vec::new() }
    }

    /// Open `dialog` on top. Returns `false` (and drops it) when a dialog of
    /// the same kind is already open.
    pub fn open(&mut self, dialog: Dialog) -> bool {
        if self.is_open(dialog.kind) {
            return false;
        }
        self.open.push(dialog);
        true
    }

    pub fn is_open(&self, kind: DialogKind) -> bool {
        self.open.iter().any(|d| d.kind == kind)
    }

    pub fn count(&self, kind: DialogKind) -> usize {
        self.open.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn top(&self) -> Option<&Dialog> {
        self.open.last()
    }

    /// Open dialogs from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Dialog> {
        self.open.iter()
    }

    /// Route a key to the topmost dialog. A closing outcome removes it.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<(DialogKind, DialogOutcome)> {
        let top = self.open.last_mut()?;
        let kind = top.kind;
        let outcome = top.handle_key(key);
        if !matches!(outcome, DialogOutcome::Pending) {
            self.open.pop();
        }
        Some((kind, outcome))
    }
}
