//! Terminal UI components.
//!
//! The screen is, top to bottom: the [`toolbar`] (one row, more when the
//! terminal is narrow), the editor and/or preview panes, a toast or hint row,
//! and the status bar. Dialogs draw as centered overlays on top.

pub mod toolbar;

mod overlays;
mod render;
mod status;

pub use overlays::dialog_rect;
pub use render::{editor_text_area, line_number_width, render};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::layout::ScreenState;

/// Rows taken by the toolbar, toast row and status bar while the toolbar
/// fits on one row.
pub const CHROME_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub toolbar: Rect,
    pub editor: Option<Rect>,
    pub preview: Option<Rect>,
    pub toast: Rect,
    pub status: Rect,
}

/// Split the screen for the given layout.
pub fn areas(area: Rect, state: ScreenState) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(toolbar::toolbar_rows(area.width)),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    let main = rows[1];

    let (editor, preview) = match state {
        ScreenState::PadOnly => (Some(main), None),
        ScreenState::ResultOnly => (None, Some(main)),
        ScreenState::Both => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(main);
            (Some(columns[0]), Some(columns[1]))
        }
    };

    Areas {
        toolbar: rows[0],
        editor,
        preview,
        toast: rows[2],
        status: rows[3],
    }
}
