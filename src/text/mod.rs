//! # Text Layout
//!
//! Greedy word wrapping and single-line measurement.
//!
//! Wrapping works per paragraph (`\n`), then per word (single spaces). A word
//! that cannot fit on a line by itself is sliced character by character, so
//! every call terminates and every character of the input survives.

use crate::font::FontContext;
use crate::style::Typeface;

pub struct TextLayout;

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break a string into lines that fit within `max_width`.
    ///
    /// A non-positive (or NaN) width disables wrapping and returns the input
    /// as a single line. Empty paragraphs produce an empty line.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font_size: f64,
        typeface: &Typeface,
    ) -> Vec<String> {
        if max_width.is_nan() || max_width <= 0.0 {
            return vec![text.to_string()];
        }

        let measure = |s: &str| font_context.measure(s, typeface, font_size);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            if paragraph.is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in paragraph.split(' ') {
                if measure(word) > max_width {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    self.slice_long_word(word, max_width, &measure, &mut lines);
                    continue;
                }

                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };

                if measure(&candidate) <= max_width {
                    current = candidate;
                } else {
                    if !current.is_empty() {
                        lines.push(current);
                    }
                    current = word.to_string();
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }

        lines
    }

    /// Emit the longest prefixes that fit, one line each. Always takes at
    /// least one character per line.
    fn slice_long_word(
        &self,
        word: &str,
        max_width: f64,
        measure: &impl Fn(&str) -> f64,
        lines: &mut Vec<String>,
    ) {
        let chars: Vec<char> = word.chars().collect();
        let mut start = 0;
        while start < chars.len() {
            let mut end = chars.len();
            let mut piece: String = chars[start..end].iter().collect();
            while end - start > 1 && measure(&piece) > max_width {
                end -= 1;
                piece.pop();
            }
            lines.push(piece);
            start = end;
        }
    }

    /// Number of lines `text` wraps to.
    pub fn line_count(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font_size: f64,
        typeface: &Typeface,
    ) -> usize {
        self.break_into_lines(font_context, text, max_width, font_size, typeface)
            .len()
    }

    /// Measure the width of a string on a single line.
    pub fn measure_width(
        &self,
        font_context: &FontContext,
        text: &str,
        font_size: f64,
        typeface: &Typeface,
    ) -> f64 {
        font_context.measure(text, typeface, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FontContext {
        FontContext::new()
    }

    fn wrap(text: &str, max_width: f64) -> Vec<String> {
        TextLayout::new().break_into_lines(&ctx(), text, max_width, 12.0, &Typeface::default())
    }

    #[test]
    fn test_single_line() {
        assert_eq!(wrap("Hello", 200.0), vec!["Hello"]);
    }

    #[test]
    fn test_line_break_at_space() {
        let lines = wrap("Hello World", 40.0);
        assert_eq!(lines, vec!["Hello", "World"]);
    }

    #[test]
    fn test_explicit_newline() {
        assert_eq!(wrap("Hello\nWorld", 200.0), vec!["Hello", "World"]);
    }

    #[test]
    fn test_empty_paragraphs_kept() {
        assert_eq!(wrap("a\n\nb", 200.0), vec!["a", "", "b"]);
        assert_eq!(wrap("", 200.0), vec![""]);
    }

    #[test]
    fn test_non_positive_width_returns_input() {
        assert_eq!(wrap("one two three", 0.0), vec!["one two three"]);
        assert_eq!(wrap("one two", -5.0), vec!["one two"]);
        assert_eq!(wrap("one two", f64::NAN), vec!["one two"]);
    }

    #[test]
    fn test_long_word_is_sliced() {
        // 'W' is 944/1000 em in Helvetica: 11.328pt at 12pt, two fit in 25pt.
        let lines = wrap("WWWWW", 25.0);
        assert_eq!(lines, vec!["WW", "WW", "W"]);
    }

    #[test]
    fn test_long_word_flushes_current_line() {
        let lines = wrap("a WWWWW b", 25.0);
        assert_eq!(lines, vec!["a", "WW", "WW", "W", "b"]);
    }

    #[test]
    fn test_slice_takes_one_char_even_when_too_wide() {
        let lines = wrap("WWW", 1.0);
        assert_eq!(lines, vec!["W", "W", "W"]);
    }

    #[test]
    fn test_lines_fit_and_preserve_words() {
        let fc = ctx();
        let tl = TextLayout::new();
        let tf = Typeface::default();
        let text = "The quick brown fox jumps over the lazy dog near the quiet river bank";
        let lines = tl.break_into_lines(&fc, text, 90.0, 12.0, &tf);
        for line in &lines {
            assert!(tl.measure_width(&fc, line, 12.0, &tf) <= 90.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_bold_wraps_sooner() {
        let fc = ctx();
        let tl = TextLayout::new();
        let text = "mmmm mmmm mmmm mmmm mmmm mmmm";
        let regular = tl.line_count(&fc, text, 120.0, 12.0, &Typeface::default());
        let bold = tl.line_count(&fc, text, 120.0, 12.0, &Typeface::bold());
        assert!(bold >= regular);
    }
}
