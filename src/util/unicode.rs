//! Terminal-cell arithmetic for task titles, names and form input.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: char = '\u{2026}';

/// Width of `s` in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `max_cells`, ending in `…` when anything was dropped.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }
    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = display_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push(ELLIPSIS);
    out
}

/// Right-pad `s` with spaces to `cells` wide. Longer input is returned as is.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    let mut out = String::with_capacity(s.len() + cells.saturating_sub(w));
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', cells.saturating_sub(w)));
    out
}

/// Truncate then pad, so the result is exactly `cells` wide
pub fn fit_to_width(s: &str, cells: usize) -> String {
    pad_to_width(&truncate_to_width(s, cells), cells)
}

// ---------------------------------------------------------------------------
// Cursor movement
// ---------------------------------------------------------------------------

/// Byte offset of the grapheme after the one at `at`, or `None` at the end
pub fn next_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    if at >= s.len() {
        return None;
    }
    s[at..]
        .grapheme_indices(true)
        .nth(1)
        .map(|(i, _)| at + i)
        .or(Some(s.len()))
}

/// Byte offset of the grapheme before `at`, or `None` at the start
pub fn prev_grapheme_boundary(s: &str, at: usize) -> Option<usize> {
    if at == 0 {
        return None;
    }
    s[..at].grapheme_indices(true).last().map(|(i, _)| i)
}

/// Start of the word left of `at` (whitespace-delimited); used by Ctrl-W
pub fn word_start_before(s: &str, at: usize) -> usize {
    let prefix = &s[..at.min(s.len())];
    let trimmed = prefix.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}

/// Cells between the start of `s` and byte offset `at`
pub fn cursor_column(s: &str, at: usize) -> usize {
    display_width(&s[..at.min(s.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(display_width("Ship it"), 7);
        assert_eq!(display_width("設計"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_to_width("Deploy", 10), "Deploy");
        assert_eq!(truncate_to_width("Deploy", 6), "Deploy");
        assert_eq!(truncate_to_width("Deploy staging", 8), "Deploy \u{2026}");
        assert_eq!(truncate_to_width("Deploy", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Deploy", 0), "");
    }

    #[test]
    fn truncation_keeps_wide_chars_whole() {
        // budget of 4 cells fits one 2-cell char; the next would overflow
        let cut = truncate_to_width("設計書類", 5);
        assert_eq!(cut, "設計\u{2026}");
        let cut = truncate_to_width("設計書類", 4);
        assert_eq!(cut, "設\u{2026}");
        assert!(display_width(&cut) <= 4);
    }

    #[test]
    fn padding() {
        assert_eq!(pad_to_width("ab", 5), "ab   ");
        assert_eq!(pad_to_width("設", 4), "設  ");
        assert_eq!(pad_to_width("abcdef", 3), "abcdef");
        assert_eq!(fit_to_width("abcdef", 4), "abc\u{2026}");
        assert_eq!(fit_to_width("ab", 4), "ab  ");
    }

    #[test]
    fn grapheme_steps() {
        let s = "a設e\u{0301}";
        assert_eq!(next_grapheme_boundary(s, 0), Some(1));
        assert_eq!(next_grapheme_boundary(s, 1), Some(4));
        assert_eq!(next_grapheme_boundary(s, 4), Some(s.len()));
        assert_eq!(next_grapheme_boundary(s, s.len()), None);

        assert_eq!(prev_grapheme_boundary(s, s.len()), Some(4));
        assert_eq!(prev_grapheme_boundary(s, 4), Some(1));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn word_start() {
        let s = "fix login  bug";
        assert_eq!(word_start_before(s, s.len()), 11);
        assert_eq!(word_start_before(s, 11), 4);
        assert_eq!(word_start_before(s, 3), 0);
        assert_eq!(word_start_before("", 0), 0);
    }

    #[test]
    fn cursor_columns() {
        assert_eq!(cursor_column("設計", 3), 2);
        assert_eq!(cursor_column("abc", 10), 3);
    }
}
