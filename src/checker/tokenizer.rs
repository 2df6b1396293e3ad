// Whitespace tokenization shared by the word diff and the word count.

/// Split on runs of whitespace, never producing empty tokens.
///
/// The ASCII information separators (U+001C..U+001F) also count as
/// whitespace, so text pasted from other tools splits the same way.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(is_separator)
        .filter(|word| !word.is_empty())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split(is_separator)
        .filter(|word| !word.is_empty())
        .count()
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}
