//! Text Measurement
//!
//! Display widths come from `unicode-width`:
//! - ASCII printable: 1 cell
//! - CJK and most emoji: 2 cells
//! - Control and combining characters: 0 cells
//!
//! Card excerpts are word-wrapped and then line-clamped; anything cut off is
//! marked with a single `…`.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Width of one character in terminal cells.
#[inline]
pub fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

/// Width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.width().min(u16::MAX as usize) as u16
}

/// Word-wrap text to `width` cells.
///
/// Explicit newlines start a new line. Runs of whitespace collapse to one
/// space. A word wider than the line is broken by character.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    // Measured in usize: a single word can be wider than u16::MAX cells.
    let width = width as usize;
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0usize;

        for word in paragraph.split_whitespace() {
            let word_width = word.width();

            if line_width > 0 && line_width.saturating_add(1).saturating_add(word_width) <= width {
                line.push(' ');
                line.push_str(word);
                line_width += 1 + word_width;
                continue;
            }

            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            // Hard break
            for c in word.chars() {
                let cw = c.width().unwrap_or(0);
                if line_width + cw > width && line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += cw;
            }
        }

        lines.push(line);
    }

    lines
}

/// Truncate text to `width` cells, ending in `…` if anything was cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    if text.width() <= width as usize {
        return text.to_string();
    }
    with_ellipsis(text, width)
}

/// Wrap, then keep at most `max_lines` lines. If text was dropped, the last
/// kept line ends in `…`.
pub fn clamp_lines(text: &str, width: u16, max_lines: usize) -> Vec<String> {
    let mut lines = wrap_text(text, width);
    if lines.len() <= max_lines {
        return lines;
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = with_ellipsis(last, width);
    }
    lines
}

/// Fit `text` plus a trailing `…` into `width` cells.
fn with_ellipsis(text: &str, width: u16) -> String {
    let target = width.saturating_sub(1) as usize;
    let mut result = String::new();
    let mut current = 0usize;

    for c in text.chars() {
        let cw = c.width().unwrap_or(0);
        if current + cw > target {
            break;
        }
        result.push(c);
        current += cw;
    }

    result.push(ELLIPSIS);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("日本"), 4);
        assert_eq!(char_width('\u{0301}'), 0);
    }

    #[test]
    fn test_wrap_at_word_boundaries() {
        assert_eq!(wrap_text("hello world", 5), vec!["hello", "world"]);
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(
            wrap_text("supercalifragilistic", 5),
            vec!["super", "calif", "ragil", "istic"]
        );
    }

    #[test]
    fn test_wrap_word_wider_than_u16() {
        let text = format!("a {}", "b".repeat(70_000));
        let lines = wrap_text(&text, 40);
        assert_eq!(lines[0], "a");
        assert_eq!(lines.len(), 1 + 70_000 / 40);
        assert!(lines[1..].iter().all(|line| line.len() == 40));

        let cut = truncate_text(&text, 10);
        assert_eq!(cut, "a bbbbbbb…");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 5), "hello");
        assert_eq!(truncate_text("hello", 4), "hel…");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("日本語", 5), "日本…");
        assert_eq!(truncate_text("hello", 0), "");
    }

    #[test]
    fn test_clamp_lines() {
        let lines = clamp_lines("one two three four five six", 9, 2);
        assert_eq!(lines, vec!["one two", "three…"]);

        let lines = clamp_lines("short", 9, 2);
        assert_eq!(lines, vec!["short"]);
    }

    #[test]
    fn test_clamp_full_last_line() {
        // Last kept line already fills the width, so it loses a character
        let lines = clamp_lines("abcde fghij klmno", 5, 2);
        assert_eq!(lines, vec!["abcde", "fghi…"]);
    }
}
