use super::{escape_html, Marker};
use crate::{GrammarMatch, InvalidSpan};

/// Wrap every match span of `original` in `marker`.
///
/// The whole text is escaped before any offset is used. Match offsets are
/// character positions in the unescaped text and are translated into the
/// growing buffer only by the running shift of markup inserted so far; a
/// match placed after characters that escaping lengthens therefore lands
/// early by the size of those entities.
///
/// Matches must be in ascending offset order and must not overlap.
pub fn highlight_matches(
    original: &str,
    matches: &[GrammarMatch],
    marker: &Marker,
) -> Result<String, InvalidSpan> {
    let escaped = escape_html(original).into_owned();
    validate_spans(matches, escaped.chars().count())?;

    let (highlighted, _shift) = matches.iter().enumerate().try_fold(
        (escaped, 0usize),
        |(buffer, shift), (index, grammar_match)| {
            wrap_match(buffer, shift, index, grammar_match, marker)
        },
    )?;

    Ok(highlighted)
}

/// Reject match lists that would wrap the wrong text.
///
/// `buffer_len` is the character length of the escaped text, reported when a
/// span's end cannot even be represented.
pub fn validate_spans(matches: &[GrammarMatch], buffer_len: usize) -> Result<(), InvalidSpan> {
    if let Some((index, grammar_match)) = matches
        .iter()
        .enumerate()
        .find(|(_, grammar_match)| grammar_match.end().is_none())
    {
        return Err(InvalidSpan::OutOfBounds {
            index,
            start: grammar_match.offset,
            end: usize::MAX,
            buffer_len,
        });
    }

    for (index, pair) in matches.windows(2).enumerate() {
        let (previous, current) = (&pair[0], &pair[1]);
        let previous_end = previous.end().unwrap_or(usize::MAX);
        if current.offset < previous.offset {
            return Err(InvalidSpan::Unordered {
                index: index + 1,
                offset: current.offset,
                previous: previous.offset,
            });
        }
        if current.offset < previous_end {
            return Err(InvalidSpan::Overlapping {
                index: index + 1,
                offset: current.offset,
                previous_end,
            });
        }
    }
    Ok(())
}

fn wrap_match(
    buffer: String,
    shift: usize,
    index: usize,
    grammar_match: &GrammarMatch,
    marker: &Marker,
) -> Result<(String, usize), InvalidSpan> {
    let start = grammar_match.offset.saturating_add(shift);
    let end = start.saturating_add(grammar_match.length);

    let out_of_bounds = || InvalidSpan::OutOfBounds {
        index,
        start,
        end,
        buffer_len: buffer.chars().count(),
    };
    if end == usize::MAX {
        return Err(out_of_bounds());
    }
    let start_byte = char_to_byte(&buffer, start).ok_or_else(out_of_bounds)?;
    let end_byte = char_to_byte(&buffer, end).ok_or_else(out_of_bounds)?;

    // Already escaped; wrap as-is.
    let error_text = &buffer[start_byte..end_byte];
    let span = marker.wrap(error_text);

    let mut highlighted = String::with_capacity(buffer.len() + marker.open.len() + marker.close.len());
    highlighted.push_str(&buffer[..start_byte]);
    highlighted.push_str(&span);
    highlighted.push_str(&buffer[end_byte..]);

    Ok((highlighted, shift + marker.overhead()))
}

/// Byte index of the character at `position`, or the end of the string when
/// `position` equals its character count.
fn char_to_byte(text: &str, position: usize) -> Option<usize> {
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(position)
}
