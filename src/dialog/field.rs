/// A single editable line (or block) of text inside a dialog form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub label: &'static str,
    value: String,
    /// Caret position in chars.
    cursor: usize,
    pub multiline: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            cursor: 0,
            multiline: false,
        }
    }

    pub fn multiline(label: &'static str) -> Self {
        Self {
            multiline: true,
            ..Self::new(label)
        }
    }

    /// Builder-style initial value; caret goes to the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' && !self.multiline {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_at(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
    }

    pub fn delete_forward(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let at = self.byte_at(self.cursor);
        self.value.remove(at);
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    fn byte_at(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map_or(self.value.len(), |(byte, _)| byte)
    }
}

/// One focusable row of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Text(TextField),
    Toggle { label: &'static str, value: bool },
}

impl Field {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text(field) => field.label,
            Self::Toggle { label, .. } => label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_field_rejects_newline() {
        let mut field = TextField::new("URL");
        field.insert_char('a');
        field.insert_char('\n');
        assert_eq!(field.value(), "a");
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut field = TextField::new("Title").with_value("hllo");
        field.move_home();
        field.move_right();
        field.insert_char('e');
        assert_eq!(field.value(), "hello");
        field.move_end();
        field.delete_back();
        assert_eq!(field.value(), "hell");
        field.move_home();
        field.delete_forward();
        assert_eq!(field.value(), "ell");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = TextField::new("Alt").with_value("né");
        field.delete_back();
        field.insert_char('ü');
        assert_eq!(field.value(), "nü");
        assert_eq!(field.cursor(), 2);
    }
}
