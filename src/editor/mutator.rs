//! Selection-aware splices.
//!
//! Each function takes the current document and selection and returns the new
//! document with where the selection should land. Offsets are char offsets;
//! reversed or out-of-range selections are ordered and clamped first, so no
//! input can make these panic.

use super::buffer::Selection;

/// A computed document value plus its new selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub text: String,
    pub selection: Selection,
}

/// Start a new paragraph with `prefix`, or prefix an existing selection.
///
/// With a caret, inserts `\n\n{prefix}{placeholder}` and selects the
/// placeholder. With a selection, inserts `prefix` before it and keeps the
/// same text selected.
pub fn prefix_line(doc: &str, selection: Selection, prefix: &str, placeholder: &str) -> Splice {
    let (before, selected, after) = split3(doc, selection);
    let offset = char_len(before);
    let prefix_len = char_len(prefix);

    if selected.is_empty() {
        let text = format!("{before}\n\n{prefix}{placeholder}{after}");
        let start = offset + 2 + prefix_len;
        Splice {
            text,
            selection: Selection::new(start, start + char_len(placeholder)),
        }
    } else {
        let text = format!("{before}{prefix}{selected}{after}");
        let start = offset + prefix_len;
        Splice {
            text,
            selection: Selection::new(start, start + char_len(selected)),
        }
    }
}

/// Surround the selection with `marker`, or insert a marked placeholder.
pub fn wrap_markers(doc: &str, selection: Selection, marker: &str, placeholder: &str) -> Splice {
    let (before, selected, after) = split3(doc, selection);
    let inner = if selected.is_empty() {
        placeholder
    } else {
        selected
    };
    let start = char_len(before) + char_len(marker);
    Splice {
        text: format!("{before}{marker}{inner}{marker}{after}"),
        selection: Selection::new(start, start + char_len(inner)),
    }
}

/// Insert `block` at the end of the selection and put the caret after it.
///
/// Selected text stays in the document.
pub fn insert_block(doc: &str, selection: Selection, block: &str) -> Splice {
    let len = char_len(doc);
    let end = selection.end().min(len);
    let split = byte_offset(doc, end);
    let (head, tail) = doc.split_at(split);
    Splice {
        text: format!("{head}{block}{tail}"),
        selection: Selection::caret(end + char_len(block)),
    }
}

/// Replace the entire document. The caret lands at the end.
pub fn replace_all(text: &str) -> Splice {
    Splice {
        text: text.to_string(),
        selection: Selection::caret(char_len(text)),
    }
}

fn split3(doc: &str, selection: Selection) -> (&str, &str, &str) {
    let len = char_len(doc);
    let start = byte_offset(doc, selection.start().min(len));
    let end = byte_offset(doc, selection.end().min(len));
    (&doc[..start], &doc[start..end], &doc[end..])
}

fn byte_offset(doc: &str, char_idx: usize) -> usize {
    doc.char_indices()
        .nth(char_idx)
        .map_or(doc.len(), |(byte, _)| byte)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn selected(splice: &Splice) -> String {
        splice
            .text
            .chars()
            .skip(splice.selection.start())
            .take(splice.selection.end() - splice.selection.start())
            .collect()
    }

    #[test]
    fn test_prefix_line_at_caret_starts_new_paragraph() {
        let out = prefix_line("intro", Selection::caret(5), "## ", "Header 2");
        assert_eq!(out.text, "intro\n\n## Header 2");
        assert_eq!(out.selection, Selection::new(10, 18));
        assert_eq!(selected(&out), "Header 2");
    }

    #[test]
    fn test_prefix_line_with_selection_has_no_newlines() {
        let out = prefix_line("say hi now", Selection::new(4, 6), ">", "Quote");
        assert_eq!(out.text, "say >hi now");
        assert_eq!(selected(&out), "hi");
    }

    #[test]
    fn test_wrap_markers_on_empty_document() {
        let out = wrap_markers("", Selection::caret(0), "**", "bold text here");
        assert_eq!(out.text, "**bold text here**");
        assert_eq!(out.selection, Selection::new(2, 16));
    }

    #[test]
    fn test_wrap_markers_with_reversed_selection() {
        let out = wrap_markers("a word b", Selection::new(6, 2), "~~", "x");
        assert_eq!(out.text, "a ~~word~~ b");
        assert_eq!(selected(&out), "word");
    }

    #[test]
    fn test_wrap_markers_counts_chars_not_bytes() {
        let out = wrap_markers("héé", Selection::new(1, 3), "*", "");
        assert_eq!(out.text, "h*éé*");
        assert_eq!(out.selection, Selection::new(2, 4));
    }

    #[test]
    fn test_insert_block_keeps_selected_text() {
        let out = insert_block("keep this", Selection::new(0, 4), "[x](y)");
        assert_eq!(out.text, "keep[x](y) this");
        assert_eq!(out.selection, Selection::caret(10));
    }

    #[test]
    fn test_insert_block_past_end_is_clamped() {
        let out = insert_block("abc", Selection::caret(40), "!");
        assert_eq!(out.text, "abc!");
        assert_eq!(out.selection, Selection::caret(4));
    }

    #[test]
    fn test_replace_all_moves_caret_to_end() {
        let out = replace_all("new value");
        assert_eq!(out.text, "new value");
        assert_eq!(out.selection, Selection::caret(9));
    }

    proptest! {
        #[test]
        fn prop_caret_wrap_grows_by_markers_and_placeholder(
            doc in "\\PC{0,40}",
            pos in 0usize..60,
            marker in "[*~_]{1,3}",
            placeholder in "[a-z ]{0,16}",
        ) {
            let len = doc.chars().count();
            let caret = pos.min(len);
            let out = wrap_markers(&doc, Selection::caret(caret), &marker, &placeholder);
            prop_assert_eq!(
                out.text.chars().count(),
                len + 2 * marker.chars().count() + placeholder.chars().count()
            );
            prop_assert_eq!(selected(&out), placeholder);
        }

        #[test]
        fn prop_selection_wrap_preserves_selected_text(
            doc in "[a-zé ]{1,40}",
            a in 0usize..40,
            b in 0usize..40,
            marker in "[*~]{1,2}",
        ) {
            let len = doc.chars().count();
            let (a, b) = (a.min(len), b.min(len));
            prop_assume!(a != b);
            let original: String = doc.chars().skip(a.min(b)).take(a.abs_diff(b)).collect();
            let out = wrap_markers(&doc, Selection::new(a, b), &marker, "unused");
            let expected = format!("{marker}{original}{marker}");
            let start = a.min(b);
            let bracketed: String = out
                .text
                .chars()
                .skip(start)
                .take(expected.chars().count())
                .collect();
            prop_assert_eq!(bracketed, expected);
            prop_assert_eq!(selected(&out), original);
        }

        #[test]
        fn prop_prefix_line_newlines_only_for_caret(
            doc in "[a-z\\n]{0,30}",
            a in 0usize..40,
            b in 0usize..40,
        ) {
            let len = doc.chars().count();
            let (a, b) = (a.min(len), b.min(len));
            let out = prefix_line(&doc, Selection::new(a, b), "> ", "Quote");
            let added = out.text.chars().count() - len;
            if a == b {
                prop_assert_eq!(added, 2 + 2 + 5);
                let inserted: String = out.text.chars().skip(a).take(2).collect();
                prop_assert_eq!(inserted, "\n\n");
            } else {
                prop_assert_eq!(added, 2);
            }
        }

        #[test]
        fn prop_offsets_stay_in_bounds(
            doc in "\\PC{0,30}",
            a in 0usize..80,
            b in 0usize..80,
            block in "\\PC{0,10}",
        ) {
            for out in [
                prefix_line(&doc, Selection::new(a, b), "#", "h"),
                wrap_markers(&doc, Selection::new(a, b), "*", "i"),
                insert_block(&doc, Selection::new(a, b), &block),
                replace_all(&block),
            ] {
                let len = out.text.chars().count();
                prop_assert!(out.selection.start() <= len);
                prop_assert!(out.selection.end() <= len);
            }
        }
    }
}
