//! Toolbar commands.
//!
//! Every toolbar button and its keyboard shortcut resolve to one [`Command`].
//! [`run`] turns a command into either an immediate [`Splice`] or a dialog to
//! open; [`complete`] turns a confirmed dialog result into the block splice.

use crate::dialog::{Dialog, DialogResult, ListKind};
use crate::editor::mutator::{insert_block, prefix_line, replace_all, wrap_markers};
use crate::editor::{Selection, Splice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    Strikethrough,
    Quote,
    Header(u8),
    Link,
    Image,
    Code,
    List(ListKind),
    Table,
}

/// How block commands get their fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandStyle {
    /// Ask through a dialog, insert at the selection end.
    #[default]
    Dialog,
    /// Append a fixed placeholder line to the document.
    Static,
}

/// What the root controller should do with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Apply(Splice),
    Prompt(Dialog),
    Nothing,
}

pub const BOLD_PLACEHOLDER: &str = "bold text here";
pub const ITALIC_PLACEHOLDER: &str = "italic text here";
pub const STRIKETHROUGH_PLACEHOLDER: &str = "stroked text here";
pub const QUOTE_PLACEHOLDER: &str = "Quote";

pub fn run(command: Command, style: CommandStyle, doc: &str, selection: Selection) -> Action {
    match command {
        Command::Bold => Action::Apply(wrap_markers(doc, selection, "**", BOLD_PLACEHOLDER)),
        Command::Italic => Action::Apply(wrap_markers(doc, selection, "*", ITALIC_PLACEHOLDER)),
        Command::Strikethrough => Action::Apply(wrap_markers(
            doc,
            selection,
            "~~",
            STRIKETHROUGH_PLACEHOLDER,
        )),
        Command::Quote => Action::Apply(prefix_line(doc, selection, ">", QUOTE_PLACEHOLDER)),
        Command::Header(level) => header_prefix(level).map_or(Action::Nothing, |prefix| {
            Action::Apply(prefix_line(
                doc,
                selection,
                &prefix,
                &format!("Header {level}"),
            ))
        }),
        Command::Link | Command::Image | Command::Code | Command::List(_) | Command::Table => {
            match style {
                CommandStyle::Dialog => Action::Prompt(dialog_for(command)),
                CommandStyle::Static => {
                    static_fragment(command).map_or(Action::Nothing, |fragment| {
                        Action::Apply(append_line(doc, &fragment))
                    })
                }
            }
        }
    }
}

/// Build the block for a confirmed dialog and insert it at the selection end.
///
/// Results that are not markdown fragments (paths, options) yield `None`.
pub fn complete(result: &DialogResult, doc: &str, selection: Selection) -> Option<Splice> {
    let block = match result {
        DialogResult::Link { link, title } => link_block(link, title.as_deref()),
        DialogResult::Image { alt, link, title } => image_block(alt, link, title.as_deref()),
        DialogResult::Code { language, code } => code_block(language, code),
        DialogResult::List { kind, items } => list_block(*kind, items),
        DialogResult::Table { rows, columns } => table_block(*rows, *columns),
        DialogResult::Path(_) | DialogResult::Options { .. } | DialogResult::Acknowledged => {
            return None;
        }
    };
    Some(insert_block(doc, selection, &block))
}

/// `#` repeated `level` times plus a space, for levels 1 through 6.
pub fn header_prefix(level: u8) -> Option<String> {
    (1..=6)
        .contains(&level)
        .then(|| format!("{} ", "#".repeat(usize::from(level))))
}

pub fn link_block(link: &str, title: Option<&str>) -> String {
    format!("[{}]({link})", title.unwrap_or(link))
}

pub fn image_block(alt: &str, link: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("![{alt}]({link} \"{title}\")"),
        None => format!("![{alt}]({link})"),
    }
}

pub fn code_block(language: &str, code: &str) -> String {
    format!("```{language}\n{code}\n```")
}

pub fn list_block(kind: ListKind, items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match kind {
            ListKind::Bulleted => format!("- {item}"),
            ListKind::Numbered => format!("{}. {item}", i + 1),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A pipe table with `columns` labelled header cells and `rows` data rows.
pub fn table_block(rows: usize, columns: usize) -> String {
    let header: String = (1..=columns).map(|c| format!(" Column {c} |")).collect();
    let separator: String = (1..=columns).map(|_| " --------- |").collect();
    let mut lines = vec![format!("|{header}"), format!("|{separator}")];
    for r in 1..=rows {
        let row: String = (1..=columns).map(|c| format!(" R{r}C{c} |")).collect();
        lines.push(format!("|{row}"));
    }
    lines.join("\n")
}

fn dialog_for(command: Command) -> Dialog {
    match command {
        Command::Image => Dialog::image(),
        Command::Code => Dialog::code(),
        Command::List(kind) => Dialog::list(kind),
        Command::Table => Dialog::table(),
        _ => Dialog::link(),
    }
}

/// Fixed fragments used when block commands run without dialogs.
pub fn static_fragment(command: Command) -> Option<String> {
    let fragment = match command {
        Command::Link => link_block("https://example.com", Some("link title")),
        Command::Image => image_block(
            "alt text",
            "https://example.com/image.png",
            Some("image title"),
        ),
        Command::Code => code_block("", "code here"),
        Command::List(kind) => list_block(kind, &["list item".to_string()]),
        Command::Table => table_block(2, 2),
        _ => return None,
    };
    Some(fragment)
}

fn append_line(doc: &str, line: &str) -> Splice {
    if doc.is_empty() {
        replace_all(line)
    } else {
        replace_all(&format!("{doc}\n{line}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::DialogKind;

    fn apply(command: Command, doc: &str, selection: Selection) -> Splice {
        match run(command, CommandStyle::Dialog, doc, selection) {
            Action::Apply(splice) => splice,
            other => panic!("expected a splice, got {other:?}"),
        }
    }

    #[test]
    fn test_bold_at_caret_selects_placeholder() {
        let out = apply(Command::Bold, "", Selection::caret(0));
        assert_eq!(out.text, "**bold text here**");
        assert_eq!(out.selection, Selection::new(2, 16));
    }

    #[test]
    fn test_italic_and_strikethrough_wrap_selection() {
        let out = apply(Command::Italic, "a b c", Selection::new(2, 3));
        assert_eq!(out.text, "a *b* c");
        let out = apply(Command::Strikethrough, "a b c", Selection::new(2, 3));
        assert_eq!(out.text, "a ~~b~~ c");
    }

    #[test]
    fn test_quote_prefix() {
        let out = apply(Command::Quote, "x", Selection::caret(1));
        assert_eq!(out.text, "x\n\n>Quote");
    }

    #[test]
    fn test_header_levels() {
        let out = apply(Command::Header(3), "", Selection::caret(0));
        assert_eq!(out.text, "\n\n### Header 3");
        assert_eq!(out.selection, Selection::new(6, 14));
    }

    #[test]
    fn test_header_out_of_range_is_noop() {
        for level in [0, 7, 200] {
            assert_eq!(
                run(Command::Header(level), CommandStyle::Dialog, "doc", Selection::caret(3)),
                Action::Nothing
            );
        }
    }

    #[test]
    fn test_block_commands_prompt_in_dialog_style() {
        let cases = [
            (Command::Link, DialogKind::Link),
            (Command::Image, DialogKind::Image),
            (Command::Code, DialogKind::Code),
            (Command::List(ListKind::Numbered), DialogKind::List),
            (Command::Table, DialogKind::Table),
        ];
        for (command, kind) in cases {
            let Action::Prompt(dialog) =
                run(command, CommandStyle::Dialog, "", Selection::caret(0))
            else {
                panic!("{command:?} should prompt");
            };
            assert_eq!(dialog.kind(), kind);
        }
    }

    #[test]
    fn test_static_style_appends_one_line() {
        let Action::Apply(out) = run(Command::Link, CommandStyle::Static, "# Doc", Selection::caret(0))
        else {
            panic!("static link should apply");
        };
        assert_eq!(out.text, "# Doc\n[link title](https://example.com)");
        assert_eq!(out.selection, Selection::caret(out.text.chars().count()));
    }

    #[test]
    fn test_static_style_on_empty_doc_has_no_leading_newline() {
        let Action::Apply(out) = run(
            Command::List(ListKind::Bulleted),
            CommandStyle::Static,
            "",
            Selection::caret(0),
        ) else {
            panic!("static list should apply");
        };
        assert_eq!(out.text, "- list item");
    }

    #[test]
    fn test_link_uses_url_when_title_missing() {
        assert_eq!(link_block("https://a.b", None), "[https://a.b](https://a.b)");
        assert_eq!(link_block("https://a.b", Some("A")), "[A](https://a.b)");
    }

    #[test]
    fn test_image_block_with_and_without_title() {
        assert_eq!(image_block("cat", "c.png", Some("Cat")), "![cat](c.png \"Cat\")");
        assert_eq!(image_block("cat", "c.png", None), "![cat](c.png)");
    }

    #[test]
    fn test_code_block_fences() {
        assert_eq!(code_block("rust", "let x = 1;"), "```rust\nlet x = 1;\n```");
    }

    #[test]
    fn test_list_blocks() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(list_block(ListKind::Bulleted, &items), "- a\n- b");
        assert_eq!(list_block(ListKind::Numbered, &items), "1. a\n2. b");
        assert_eq!(list_block(ListKind::Bulleted, &[]), "");
    }

    #[test]
    fn test_table_two_rows_three_columns() {
        let table = table_block(2, 3);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| Column 1 | Column 2 | Column 3 |");
        assert_eq!(lines[1], "| --------- | --------- | --------- |");
        assert_eq!(lines[3], "| R2C1 | R2C2 | R2C3 |");
        for line in lines {
            assert!(line.starts_with('|') && line.ends_with('|'));
            // 3 cells means 4 pipes including the bounding ones
            assert_eq!(line.matches('|').count(), 4);
        }
    }

    #[test]
    fn test_complete_inserts_at_selection_end() {
        let result = DialogResult::Link {
            link: "https://x.y".to_string(),
            title: Some("X".to_string()),
        };
        let out = complete(&result, "see here", Selection::new(4, 8)).unwrap();
        assert_eq!(out.text, "see here[X](https://x.y)");
        assert_eq!(out.selection, Selection::caret(8 + 16));
    }

    #[test]
    fn test_complete_ignores_non_fragment_results() {
        assert!(complete(&DialogResult::Acknowledged, "", Selection::caret(0)).is_none());
        assert!(
            complete(&DialogResult::Options { spellcheck: true }, "", Selection::caret(0))
                .is_none()
        );
    }
}
