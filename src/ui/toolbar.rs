//! The clickable command row.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Message;
use crate::commands::Command;
use crate::dialog::ListKind;

/// What a toolbar button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarItem {
    Command(Command),
    Open,
    Save,
    Close,
    About,
    Options,
    Layout,
}

impl ToolbarItem {
    /// The same message the keyboard shortcut sends.
    pub const fn message(self) -> Message {
        match self {
            Self::Command(command) => Message::Command(command),
            Self::Open => Message::OpenFile,
            Self::Save => Message::SaveFile,
            Self::Close => Message::CloseFile,
            Self::About => Message::ShowAbout,
            Self::Options => Message::ShowOptions,
            Self::Layout => Message::CycleLayout,
        }
    }
}

pub const BUTTONS: &[(&str, ToolbarItem)] = &[
    ("B", ToolbarItem::Command(Command::Bold)),
    ("I", ToolbarItem::Command(Command::Italic)),
    ("S", ToolbarItem::Command(Command::Strikethrough)),
    (">", ToolbarItem::Command(Command::Quote)),
    ("H1", ToolbarItem::Command(Command::Header(1))),
    ("H2", ToolbarItem::Command(Command::Header(2))),
    ("H3", ToolbarItem::Command(Command::Header(3))),
    ("H4", ToolbarItem::Command(Command::Header(4))),
    ("H5", ToolbarItem::Command(Command::Header(5))),
    ("H6", ToolbarItem::Command(Command::Header(6))),
    ("Link", ToolbarItem::Command(Command::Link)),
    ("Img", ToolbarItem::Command(Command::Image)),
    ("Code", ToolbarItem::Command(Command::Code)),
    ("UL", ToolbarItem::Command(Command::List(ListKind::Bulleted))),
    ("OL", ToolbarItem::Command(Command::List(ListKind::Numbered))),
    ("Table", ToolbarItem::Command(Command::Table)),
    ("Open", ToolbarItem::Open),
    ("Save", ToolbarItem::Save),
    ("Close", ToolbarItem::Close),
    ("?", ToolbarItem::About),
    ("Opt", ToolbarItem::Options),
    ("View", ToolbarItem::Layout),
];

/// Columns between buttons.
const GAP: u16 = 1;

fn button_width(label: &str) -> u16 {
    u16::try_from(label.chars().count()).unwrap_or(u16::MAX)
}

/// `(x, row, width)` of each button in [`BUTTONS`] order, wrapping to a new
/// row when the next button would pass `columns`.
fn placements(columns: u16) -> Vec<(u16, u16, u16)> {
    let mut placed = Vec::with_capacity(BUTTONS.len());
    let (mut x, mut row) = (0u16, 0u16);
    for (label, _) in BUTTONS {
        let width = button_width(label);
        if x > 0 && x.saturating_add(width) > columns {
            x = 0;
            row += 1;
        }
        placed.push((x, row, width));
        x = x.saturating_add(width + GAP);
    }
    placed
}

/// Rows the toolbar needs at this terminal width.
pub fn toolbar_rows(columns: u16) -> u16 {
    placements(columns).last().map_or(1, |&(_, row, _)| row + 1)
}

/// Which button covers this cell, relative to the toolbar's top-left corner.
pub fn button_at(column: u16, row: u16, columns: u16) -> Option<ToolbarItem> {
    placements(columns)
        .into_iter()
        .zip(BUTTONS)
        .find(|((x, r, width), _)| {
            *r == row && column >= *x && column < x.saturating_add(*width)
        })
        .map(|(_, (_, item))| *item)
}

pub fn render_toolbar(frame: &mut Frame, area: Rect) {
    let button = Style::default().bg(Color::DarkGray).fg(Color::White);
    let row_count = usize::from(toolbar_rows(area.width));
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new(); row_count];
    for ((x, row, _), (label, _)) in placements(area.width).into_iter().zip(BUTTONS) {
        if let Some(spans) = rows.get_mut(usize::from(row)) {
            if x > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*label, button));
        }
    }
    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines), area);
}
