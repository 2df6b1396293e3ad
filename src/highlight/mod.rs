//! HTML highlighting of grammar errors and corrections.
//!
//! Two highlighters share this module's [`Marker`] and escaping rules:
//! [`matches`] wraps the error spans reported for the original text, and
//! [`word_diff`] wraps the words of the corrected text that differ from the
//! original. Both produce HTML-safe strings.

pub mod matches;
pub mod word_diff;

use crate::{GrammarMatch, InvalidSpan};
use std::borrow::Cow;
use word_diff::{DiffStrategy, WordChange};

pub const DEFAULT_INPUT_COLOR: &str = "#ffd6d6";
pub const DEFAULT_OUTPUT_COLOR: &str = "#d6ffd6";

/// Markup wrapped around a highlighted span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub open: String,
    pub close: String,
}

impl Marker {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// An inline span with the given background color.
    pub fn background(color: &str) -> Self {
        Self::new(
            format!("<span style='background-color:{}'>", escape_html(color)),
            "</span>",
        )
    }

    pub fn wrap(&self, content: &str) -> String {
        let mut wrapped = String::with_capacity(self.open.len() + content.len() + self.close.len());
        wrapped.push_str(&self.open);
        wrapped.push_str(content);
        wrapped.push_str(&self.close);
        wrapped
    }

    /// Characters added around every wrapped span.
    pub fn overhead(&self) -> usize {
        self.open.chars().count() + self.close.chars().count()
    }
}

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

#[derive(Debug, Clone)]
pub struct HighlightOptions {
    pub input_marker: Marker,
    pub output_marker: Marker,
    pub diff_strategy: DiffStrategy,
    /// Wrap corrected words that have no original word at the same position.
    pub highlight_appended_words: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            input_marker: Marker::background(DEFAULT_INPUT_COLOR),
            output_marker: Marker::background(DEFAULT_OUTPUT_COLOR),
            diff_strategy: DiffStrategy::Positional,
            highlight_appended_words: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlights {
    pub highlighted_input: String,
    pub highlighted_output: String,
    /// The corrected words behind `highlighted_output`, with their changed flags.
    pub words: Vec<WordChange>,
}

/// Highlight error spans in `original` and changed words in `corrected`.
pub fn compute_highlights(
    original: &str,
    grammar_matches: &[GrammarMatch],
    corrected: &str,
    options: &HighlightOptions,
) -> Result<Highlights, InvalidSpan> {
    let highlighted_input =
        matches::highlight_matches(original, grammar_matches, &options.input_marker)?;

    let words = word_diff::diff_words(
        original,
        corrected,
        options.diff_strategy,
        options.highlight_appended_words,
    );
    let highlighted_output = word_diff::render_words(&words, &options.output_marker);

    Ok(Highlights {
        highlighted_input,
        highlighted_output,
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_default_marker_matches_inline_span() {
        let marker = Marker::background(DEFAULT_INPUT_COLOR);
        assert_eq!(
            marker.wrap("helo"),
            "<span style='background-color:#ffd6d6'>helo</span>"
        );
        assert_eq!(marker.overhead(), marker.wrap("").len());
    }

    #[test]
    fn test_compute_highlights() {
        let options = HighlightOptions {
            input_marker: Marker::new("<mark>", "</mark>"),
            output_marker: Marker::new("<ins>", "</ins>"),
            ..Default::default()
        };
        let highlights = compute_highlights(
            "teh cat sat",
            &[GrammarMatch::new(0, 3)],
            "the cat sat",
            &options,
        )
        .unwrap();

        assert_eq!(highlights.highlighted_input, "<mark>teh</mark> cat sat");
        assert_eq!(highlights.highlighted_output, "<ins>the</ins> cat sat");
        assert_eq!(highlights.words.len(), 3);
        assert!(highlights.words[0].changed);
    }

    #[test]
    fn test_compute_highlights_rejects_bad_spans() {
        let result = compute_highlights(
            "short",
            &[GrammarMatch::new(3, 10)],
            "short",
            &HighlightOptions::default(),
        );
        assert!(matches!(result, Err(InvalidSpan::OutOfBounds { .. })));
    }
}
