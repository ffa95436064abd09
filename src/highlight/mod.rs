//! Syntax highlighting for fenced code in the preview.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

/// Base style for code text; highlighted spans add a foreground on top.
pub fn code_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Highlight `code` line by line. Unknown or missing languages come back as
/// plain spans in [`code_style`].
pub fn highlight_code(language: Option<&str>, code: &str) -> Vec<Vec<Span<'static>>> {
    let syntax_set = syntax_set();
    let syntax = language
        .filter(|lang| !lang.is_empty())
        .and_then(|lang| {
            syntax_set
                .find_syntax_by_token(lang)
                .or_else(|| syntax_set.find_syntax_by_name(lang))
        });

    let Some(syntax) = syntax else {
        return code
            .lines()
            .map(|line| vec![Span::styled(line.to_string(), code_style())])
            .collect();
    };

    let background = Background::detect();
    let mut highlighter = HighlightLines::new(syntax, theme(background));
    code.lines()
        .map(|line| {
            let ranges = match highlighter.highlight_line(line, syntax_set) {
                Ok(ranges) => ranges,
                Err(err) => {
                    tracing::debug!(error = %err, "highlighting failed for line");
                    return vec![Span::styled(line.to_string(), code_style())];
                }
            };
            ranges
                .into_iter()
                .map(|(style, text)| {
                    let fg = style.foreground;
                    let (r, g, b) = background.adjust(fg.r, fg.g, fg.b);
                    Span::styled(text.to_string(), code_style().fg(Color::Rgb(r, g, b)))
                })
                .collect()
        })
        .collect()
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme(background: Background) -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let theme_set = ThemeSet::load_defaults();
        let preferred = match background {
            Background::Dark => ["base16-ocean.dark", "base16-eighties.dark", "Solarized (dark)"],
            Background::Light => ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"],
        };
        preferred
            .iter()
            .find_map(|name| theme_set.themes.get(*name).cloned())
            .or_else(|| theme_set.themes.values().next().cloned())
            .unwrap_or_default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Background {
    Dark,
    Light,
}

impl Background {
    fn detect() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); ANSI 7 and up
    /// are light backgrounds.
    fn from_colorfgbg(value: Option<&str>) -> Self {
        let bg = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.parse::<u8>().ok());
        match bg {
            Some(bg) if bg >= 7 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Darken bright foregrounds so they stay readable on light terminals.
    fn adjust(self, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        if self == Self::Dark || luma(r, g, b) < 155.0 {
            return (r, g, b);
        }
        let scale = |c: u8| (f32::from(c) * 0.42).round() as u8;
        (scale(r), scale(g), scale(b))
    }
}

fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_rgb(lines: &[Vec<Span<'static>>]) -> bool {
        lines
            .iter()
            .flatten()
            .any(|span| matches!(span.style.fg, Some(Color::Rgb(..))))
    }

    #[test]
    fn test_highlight_rust_produces_colored_spans() {
        let lines = highlight_code(Some("rust"), "fn main() {\n    let x = 1;\n}\n");
        assert_eq!(lines.len(), 3);
        assert!(has_rgb(&lines), "expected at least one colored span for Rust");
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let lines = highlight_code(Some("nope"), "just text");
        assert_eq!(lines.len(), 1);
        assert!(!has_rgb(&lines));
        assert_eq!(lines[0][0].content, "just text");
    }

    #[test]
    fn test_no_background_is_set() {
        let lines = highlight_code(Some("rust"), "fn main() {}");
        assert!(lines.iter().flatten().all(|span| span.style.bg.is_none()));
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert_eq!(Background::from_colorfgbg(Some("15;0")), Background::Dark);
        assert_eq!(Background::from_colorfgbg(Some("0;15")), Background::Light);
        assert_eq!(Background::from_colorfgbg(Some("0;default;15")), Background::Light);
        assert_eq!(Background::from_colorfgbg(None), Background::Dark);
        assert_eq!(Background::from_colorfgbg(Some("garbage")), Background::Dark);
    }

    #[test]
    fn test_light_background_darkens_bright_colors() {
        let (r, g, b) = Background::Light.adjust(240, 230, 120);
        assert!(luma(r, g, b) < 120.0);
        assert_eq!(Background::Dark.adjust(240, 230, 120), (240, 230, 120));
        assert_eq!(Background::Light.adjust(10, 20, 30), (10, 20, 30));
    }
}
