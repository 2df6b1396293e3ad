use super::{escape_html, Marker};
use crate::checker::tokenizer::split_words;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};
use std::fmt;
use std::str::FromStr;

/// How corrected words are matched up with original words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStrategy {
    /// Compare words at the same index. An inserted or deleted word shifts
    /// every comparison after it.
    #[default]
    Positional,
    /// Align the two word sequences with a Myers diff before comparing.
    Aligned,
}

impl FromStr for DiffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positional" => Ok(DiffStrategy::Positional),
            "aligned" => Ok(DiffStrategy::Aligned),
            _ => Err(format!("Unknown diff strategy: {}", s)),
        }
    }
}

impl fmt::Display for DiffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffStrategy::Positional => write!(f, "positional"),
            DiffStrategy::Aligned => write!(f, "aligned"),
        }
    }
}

/// A word of the corrected text and whether it differs from the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordChange {
    pub word: String,
    pub changed: bool,
}

impl WordChange {
    fn new(word: &str, changed: bool) -> Self {
        Self {
            word: word.to_string(),
            changed,
        }
    }
}

/// Flag each word of `corrected` that differs from `original`.
pub fn diff_words(
    original: &str,
    corrected: &str,
    strategy: DiffStrategy,
    highlight_appended: bool,
) -> Vec<WordChange> {
    let input_words = split_words(original);
    let output_words = split_words(corrected);

    match strategy {
        DiffStrategy::Positional => positional(&input_words, &output_words, highlight_appended),
        DiffStrategy::Aligned => aligned(&input_words, &output_words),
    }
}

fn positional(input_words: &[&str], output_words: &[&str], highlight_appended: bool) -> Vec<WordChange> {
    output_words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let changed = match input_words.get(i) {
                Some(input_word) => input_word != word,
                None => highlight_appended,
            };
            WordChange::new(word, changed)
        })
        .collect()
}

fn aligned(input_words: &[&str], output_words: &[&str]) -> Vec<WordChange> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(input_words, output_words);

    diff.iter_all_changes()
        .filter_map(|change| match change.tag() {
            ChangeTag::Equal => Some(WordChange::new(change.value(), false)),
            ChangeTag::Insert => Some(WordChange::new(change.value(), true)),
            ChangeTag::Delete => None,
        })
        .collect()
}

/// Escape every word, wrap the changed ones, and join with single spaces.
pub fn render_words(words: &[WordChange], marker: &Marker) -> String {
    words
        .iter()
        .map(|change| {
            let escaped = escape_html(&change.word);
            if change.changed {
                marker.wrap(&escaped)
            } else {
                escaped.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ins() -> Marker {
        Marker::new("<ins>", "</ins>")
    }

    fn highlight_positional(original: &str, corrected: &str) -> String {
        render_words(
            &diff_words(original, corrected, DiffStrategy::Positional, false),
            &ins(),
        )
    }

    fn changed(words: &[WordChange]) -> Vec<&str> {
        words
            .iter()
            .filter(|w| w.changed)
            .map(|w| w.word.as_str())
            .collect()
    }

    #[test]
    fn test_only_changed_word_is_wrapped() {
        let output = highlight_positional("teh cat sat", "the cat sat");
        assert_eq!(output, "<ins>the</ins> cat sat");
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let output = highlight_positional("a  b\tc", "  a b\n\nc ");
        assert_eq!(output, "a b c");
    }

    #[test]
    fn test_words_are_escaped() {
        let output = highlight_positional("fish and chips", "fish & chips");
        assert_eq!(output, "fish <ins>&amp;</ins> chips");
    }

    #[test]
    fn test_appended_words_unwrapped_by_default() {
        let words = diff_words("I am", "I am here", DiffStrategy::Positional, false);
        assert!(changed(&words).is_empty());

        let words = diff_words("I am", "I am here", DiffStrategy::Positional, true);
        assert_eq!(changed(&words), vec!["here"]);
    }

    #[test]
    fn test_positional_misaligns_after_insertion() {
        let words = diff_words(
            "I went store today",
            "I went to store today",
            DiffStrategy::Positional,
            false,
        );
        assert_eq!(changed(&words), vec!["to", "store"]);
    }

    #[test]
    fn test_aligned_flags_only_insertion() {
        let words = diff_words(
            "I went store today",
            "I went to store today",
            DiffStrategy::Aligned,
            false,
        );
        assert_eq!(changed(&words), vec!["to"]);
        assert_eq!(words.len(), 5);
    }

    #[test]
    fn test_aligned_drops_deleted_words() {
        let words = diff_words("the the cat", "the cat", DiffStrategy::Aligned, false);
        assert_eq!(words.len(), 2);
        assert!(changed(&words).is_empty());
    }

    #[test]
    fn test_empty_corrected_text() {
        let output = highlight_positional("word", "");
        assert_eq!(output, "");
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("aligned".parse::<DiffStrategy>(), Ok(DiffStrategy::Aligned));
        assert_eq!("Positional".parse::<DiffStrategy>(), Ok(DiffStrategy::Positional));
        assert!("fuzzy".parse::<DiffStrategy>().is_err());
    }
}
