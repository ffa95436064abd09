//! Rendered markdown for the result pane.
//!
//! The buffer is parsed with comrak (GFM extensions on) and walked into
//! styled ratatui lines. Paragraph text is left unwrapped here; the pane
//! wraps it. Code frames, tables and rules are sized to `width`.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::highlight::{code_style, highlight_code};

pub fn render(source: &str, width: u16) -> Vec<Line<'static>> {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);
    let mut renderer = Renderer::new(usize::from(width.max(1)));
    renderer.block(root);
    renderer.finish()
}

fn create_options() -> Options {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn heading_style(level: u8) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match level {
        1 => base.fg(Color::Magenta).add_modifier(Modifier::UNDERLINED),
        2 => base.fg(Color::Cyan),
        3 => base.fg(Color::Blue),
        _ => base,
    }
}

/// A line prefix owned by an enclosing block (quote bar, list marker).
struct Frame {
    first: String,
    rest: String,
    style: Style,
    used: bool,
}

impl Frame {
    fn quote() -> Self {
        Self {
            first: "│ ".to_string(),
            rest: "│ ".to_string(),
            style: dim(),
            used: false,
        }
    }

    fn marker(marker: String, style: Style) -> Self {
        let rest = " ".repeat(marker.width());
        Self {
            first: marker,
            rest,
            style,
            used: false,
        }
    }
}

struct Renderer {
    width: usize,
    lines: Vec<Line<'static>>,
    frames: Vec<Frame>,
    list_depth: usize,
    last_blank: bool,
}

impl Renderer {
    const fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            frames: Vec::new(),
            list_depth: 0,
            last_blank: false,
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        if self.last_blank {
            self.lines.pop();
        }
        self.lines
    }

    fn inner_width(&self) -> usize {
        let used: usize = self.frames.iter().map(|f| f.first.width()).sum();
        self.width.saturating_sub(used).max(1)
    }

    fn push(&mut self, spans: Vec<Span<'static>>) {
        let mut out = Vec::with_capacity(self.frames.len() + spans.len());
        for frame in &mut self.frames {
            let text = if frame.used {
                frame.rest.clone()
            } else {
                frame.used = true;
                frame.first.clone()
            };
            out.push(Span::styled(text, frame.style));
        }
        out.extend(spans);
        self.lines.push(Line::from(out));
        self.last_blank = false;
    }

    /// Blank separator between blocks. Tight inside lists.
    fn gap(&mut self) {
        if self.list_depth > 0 || self.last_blank || self.lines.is_empty() {
            return;
        }
        self.push(Vec::new());
        self.last_blank = true;
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>) {
        let value = node.data.borrow().value.clone();
        match value {
            NodeValue::Heading(heading) => {
                let style = heading_style(heading.level);
                let mut spans = vec![Span::styled(
                    format!("{} ", "#".repeat(usize::from(heading.level))),
                    style,
                )];
                for line in inline_lines(node) {
                    spans.extend(line.into_iter().map(|s| s.patch_style(style)));
                }
                self.push(spans);
                self.gap();
            }
            NodeValue::Paragraph => {
                for line in inline_lines(node) {
                    self.push(line);
                }
                self.gap();
            }
            NodeValue::BlockQuote => {
                self.frames.push(Frame::quote());
                self.children(node);
                self.frames.pop();
                self.gap();
            }
            NodeValue::List(list) => {
                self.list_depth += 1;
                let count = node.children().count();
                let number_width = (list.start + count.saturating_sub(1)).to_string().len();
                for (index, item) in node.children().enumerate() {
                    let task = match item.data.borrow().value {
                        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
                        _ => None,
                    };
                    let marker = match (task, list.list_type) {
                        (Some(true), _) => "☑ ".to_string(),
                        (Some(false), _) => "☐ ".to_string(),
                        (None, ListType::Bullet) => "• ".to_string(),
                        (None, ListType::Ordered) => {
                            let delimiter = match list.delimiter {
                                ListDelimType::Period => '.',
                                ListDelimType::Paren => ')',
                            };
                            format!("{:>number_width$}{delimiter} ", list.start + index)
                        }
                    };
                    self.frames.push(Frame::marker(marker, Style::default().fg(Color::Yellow)));
                    self.children(item);
                    if self.frames.last().is_some_and(|f| !f.used) {
                        self.push(Vec::new());
                    }
                    self.frames.pop();
                }
                self.list_depth -= 1;
                self.gap();
            }
            NodeValue::CodeBlock(code) => {
                self.code_block(&code.info, &code.literal);
                self.gap();
            }
            NodeValue::Table(_) => {
                self.table(node);
                self.gap();
            }
            NodeValue::ThematicBreak => {
                let rule = "─".repeat(self.inner_width());
                self.push(vec![Span::styled(rule, dim())]);
                self.gap();
            }
            NodeValue::HtmlBlock(html) => {
                for line in html.literal.lines() {
                    self.push(vec![Span::styled(line.to_string(), dim())]);
                }
                self.gap();
            }
            _ => self.children(node),
        }
    }

    fn children<'a>(&mut self, node: &'a AstNode<'a>) {
        for child in node.children() {
            self.block(child);
        }
    }

    fn code_block(&mut self, info: &str, literal: &str) {
        let language = info.split_whitespace().next();
        let label = language.unwrap_or("code");
        let inner = self.inner_width();
        let frame = dim();

        let fill = inner.saturating_sub(label.width() + 4);
        self.push(vec![Span::styled(
            format!("╭─ {label} {}", "─".repeat(fill)),
            frame,
        )]);
        for line in highlight_code(language, literal) {
            let mut spans = vec![Span::styled("│ ", frame)];
            spans.extend(line);
            self.push(spans);
        }
        self.push(vec![Span::styled(
            format!("╰{}", "─".repeat(inner.saturating_sub(1))),
            frame,
        )]);
    }

    fn table<'a>(&mut self, node: &'a AstNode<'a>) {
        let alignments = match &node.data.borrow().value {
            NodeValue::Table(table) => table.alignments.clone(),
            _ => Vec::new(),
        };
        let mut rows: Vec<(bool, Vec<String>)> = Vec::new();
        for row in node.children() {
            let header = match row.data.borrow().value {
                NodeValue::TableRow(header) => header,
                _ => continue,
            };
            let cells = row
                .children()
                .map(|cell| collapse_whitespace(&plain_text(cell)))
                .collect();
            rows.push((header, cells));
        }
        let columns = rows.iter().map(|(_, cells)| cells.len()).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![1usize; columns];
        for (_, cells) in &rows {
            for (idx, cell) in cells.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.width());
            }
        }
        fit_widths(&mut widths, self.inner_width());

        let border = dim();
        self.push(vec![Span::styled(table_border(&widths, '┌', '┬', '┐'), border)]);
        for (header, cells) in &rows {
            let style = if *header {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled("│", border)];
            for (idx, width) in widths.iter().enumerate() {
                let cell = cells.get(idx).map_or("", String::as_str);
                let align = alignments.get(idx).copied().unwrap_or(TableAlignment::None);
                spans.push(Span::styled(
                    format!(" {} ", align_cell(cell, *width, align)),
                    style,
                ));
                spans.push(Span::styled("│", border));
            }
            self.push(spans);
            if *header {
                self.push(vec![Span::styled(table_border(&widths, '├', '┼', '┤'), border)]);
            }
        }
        self.push(vec![Span::styled(table_border(&widths, '└', '┴', '┘'), border)]);
    }
}

/// Inline content split at hard line breaks.
fn inline_lines<'a>(node: &'a AstNode<'a>) -> Vec<Vec<Span<'static>>> {
    let mut lines = vec![Vec::new()];
    for child in node.children() {
        collect_inline(child, Style::default(), &mut lines);
    }
    lines
}

fn collect_inline<'a>(node: &'a AstNode<'a>, style: Style, lines: &mut Vec<Vec<Span<'static>>>) {
    let value = node.data.borrow().value.clone();
    let nested = |style: Style, lines: &mut Vec<Vec<Span<'static>>>| {
        for child in node.children() {
            collect_inline(child, style, lines);
        }
    };
    match value {
        NodeValue::Text(text) => push_span(lines, Span::styled(text, style)),
        NodeValue::Code(code) => push_span(
            lines,
            Span::styled(code.literal, style.patch(code_style()).fg(Color::Yellow)),
        ),
        NodeValue::Emph => nested(style.add_modifier(Modifier::ITALIC), lines),
        NodeValue::Strong => nested(style.add_modifier(Modifier::BOLD), lines),
        NodeValue::Strikethrough => nested(style.add_modifier(Modifier::CROSSED_OUT), lines),
        NodeValue::Link(_) => nested(
            style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            lines,
        ),
        NodeValue::Image(link) => {
            let alt = plain_text(node);
            let label = if alt.is_empty() { link.url } else { alt };
            push_span(lines, Span::styled(format!("[image: {label}]"), dim()));
        }
        NodeValue::HtmlInline(html) => push_span(lines, Span::styled(html, dim())),
        NodeValue::FootnoteReference(reference) => {
            push_span(lines, Span::styled(format!("[^{}]", reference.name), dim()));
        }
        NodeValue::SoftBreak => push_span(lines, Span::styled(" ", style)),
        NodeValue::LineBreak => lines.push(Vec::new()),
        _ => nested(style, lines),
    }
}

fn push_span(lines: &mut Vec<Vec<Span<'static>>>, span: Span<'static>) {
    match lines.last_mut() {
        Some(line) => line.push(span),
        None => lines.push(vec![span]),
    }
}

fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.descendants() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shrink the widest columns until the table fits `available` cells.
fn fit_widths(widths: &mut [usize], available: usize) {
    let chrome = 3 * widths.len() + 1;
    let budget = available.saturating_sub(chrome).max(widths.len());
    while widths.iter().sum::<usize>() > budget {
        let Some(widest) = widths.iter_mut().max() else {
            return;
        };
        if *widest <= 1 {
            return;
        }
        *widest -= 1;
    }
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let inner = widths
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join(&middle.to_string());
    format!("{left}{inner}{right}")
}

fn align_cell(text: &str, width: usize, align: TableAlignment) -> String {
    let text = truncate(text, width);
    let pad = width.saturating_sub(text.width());
    match align {
        TableAlignment::Right => format!("{}{text}", " ".repeat(pad)),
        TableAlignment::Center => {
            let left = pad / 2;
            format!("{}{text}{}", " ".repeat(left), " ".repeat(pad - left))
        }
        TableAlignment::Left | TableAlignment::None => format!("{text}{}", " ".repeat(pad)),
    }
}

fn truncate(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn texts(source: &str, width: u16) -> Vec<String> {
        render(source, width).iter().map(text).collect()
    }

    #[test]
    fn test_heading_and_paragraph_are_separated() {
        assert_eq!(texts("# Title\n\nBody", 40), vec!["# Title", "", "Body"]);
    }

    #[test]
    fn test_inline_styles() {
        let lines = render("**b** *i* ~~s~~ `c`", 40);
        let spans = &lines[0].spans;
        let find = |needle: &str| {
            spans
                .iter()
                .find(|s| s.content == needle)
                .map(|s| s.style)
                .unwrap()
        };
        assert!(find("b").add_modifier.contains(Modifier::BOLD));
        assert!(find("i").add_modifier.contains(Modifier::ITALIC));
        assert!(find("s").add_modifier.contains(Modifier::CROSSED_OUT));
        assert_eq!(find("c").fg, Some(Color::Yellow));
    }

    #[test]
    fn test_hard_break_splits_lines() {
        assert_eq!(texts("one  \ntwo", 40), vec!["one", "two"]);
        assert_eq!(texts("one\ntwo", 40), vec!["one two"]);
    }

    #[test]
    fn test_lists_and_tasks() {
        assert_eq!(
            texts("- a\n- b\n  - c\n\n1. x\n2. y\n\n- [ ] todo\n- [x] done", 40),
            vec![
                "• a", "• b", "  • c", "", "1. x", "2. y", "", "☐ todo", "☑ done"
            ]
        );
    }

    #[test]
    fn test_quote_prefix_on_every_line() {
        assert_eq!(
            texts("> one\n>\n> two", 40),
            vec!["│ one", "│ ", "│ two"]
        );
    }

    #[test]
    fn test_code_block_frame() {
        let lines = texts("```rust\nlet x = 1;\n```", 20);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("╭─ rust "));
        assert_eq!(lines[0].chars().count(), 20);
        assert_eq!(lines[1], "│ let x = 1;");
        assert!(lines[2].starts_with('╰'));
    }

    #[test]
    fn test_table_is_boxed() {
        let lines = texts("| A | Bee |\n| - | --: |\n| 1 | 2 |", 40);
        assert_eq!(
            lines,
            vec![
                "┌───┬─────┐",
                "│ A │ Bee │",
                "├───┼─────┤",
                "│ 1 │   2 │",
                "└───┴─────┘",
            ]
        );
    }

    #[test]
    fn test_wide_table_is_truncated_to_width() {
        let source = "| aaaaaaaaaaaaaaaa | bbbbbbbbbbbbbbbb |\n| - | - |\n| 1 | 2 |";
        for line in texts(source, 20) {
            assert!(line.width() <= 20, "{line:?} is too wide");
        }
    }

    #[test]
    fn test_thematic_break_spans_width() {
        assert_eq!(texts("---", 10), vec!["─".repeat(10)]);
    }

    #[test]
    fn test_image_is_shown_as_label() {
        assert_eq!(texts("![cat](c.png)", 40), vec!["[image: cat]"]);
    }

    #[test]
    fn test_empty_source_renders_nothing() {
        assert!(render("", 40).is_empty());
    }
}
