//! One or two panes, picked from the terminal width.

/// Widths above this show editor and preview side by side.
pub const WIDE_LAYOUT_THRESHOLD: u32 = 720;

/// Assumed cell width in pixels when the terminal does not report pixels.
pub const FALLBACK_CELL_WIDTH: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    #[default]
    PadOnly,
    ResultOnly,
    Both,
}

impl ScreenState {
    pub const fn from_width(width: u32) -> Self {
        if width > WIDE_LAYOUT_THRESHOLD {
            Self::Both
        } else {
            Self::PadOnly
        }
    }

    /// Manual cycling order: Both, PadOnly, ResultOnly.
    pub const fn next(self) -> Self {
        match self {
            Self::Both => Self::PadOnly,
            Self::PadOnly => Self::ResultOnly,
            Self::ResultOnly => Self::Both,
        }
    }

    pub const fn shows_pad(self) -> bool {
        matches!(self, Self::PadOnly | Self::Both)
    }

    pub const fn shows_result(self) -> bool {
        matches!(self, Self::ResultOnly | Self::Both)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PadOnly => "pad",
            Self::ResultOnly => "result",
            Self::Both => "split",
        }
    }
}

/// Width in layout units: reported pixels if known, else columns times
/// [`FALLBACK_CELL_WIDTH`].
pub fn layout_units(columns: u16, pixel_width: u16) -> u32 {
    if pixel_width > 0 {
        u32::from(pixel_width)
    } else {
        u32::from(columns) * FALLBACK_CELL_WIDTH
    }
}

/// Measure the current terminal. `None` when no size is available.
pub fn measure() -> Option<u32> {
    match crossterm::terminal::window_size() {
        Ok(size) => Some(layout_units(size.columns, size.width)),
        Err(_) => crossterm::terminal::size()
            .ok()
            .map(|(columns, _)| layout_units(columns, 0)),
    }
}
