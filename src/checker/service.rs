use crate::{GrammarMatch, ServiceError};

/// Result of one grammar check.
#[derive(Debug, Clone, Default)]
pub struct ServiceResponse {
    pub matches: Vec<GrammarMatch>,
    pub corrected_text: String,
}

/// Capability to grammar-check a block of text.
pub trait GrammarService {
    fn check_text(&self, text: &str) -> Result<ServiceResponse, ServiceError>;
}

impl<S: GrammarService + ?Sized> GrammarService for &S {
    fn check_text(&self, text: &str) -> Result<ServiceResponse, ServiceError> {
        (**self).check_text(text)
    }
}

impl<S: GrammarService + ?Sized> GrammarService for Box<S> {
    fn check_text(&self, text: &str) -> Result<ServiceResponse, ServiceError> {
        (**self).check_text(text)
    }
}

/// Apply the first replacement of each match to `text`.
///
/// Matches without replacements, past the end of the text, or overlapping a
/// correction already applied are skipped.
pub fn apply_corrections(text: &str, matches: &[GrammarMatch]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut corrected = String::with_capacity(text.len());
    let mut cursor = 0;

    for grammar_match in matches {
        let Some(replacement) = grammar_match.replacements.first() else {
            continue;
        };
        let Some(end) = grammar_match.end() else {
            continue;
        };
        if grammar_match.offset < cursor || end > chars.len() {
            continue;
        }

        corrected.extend(&chars[cursor..grammar_match.offset]);
        corrected.push_str(replacement);
        cursor = end;
    }

    corrected.extend(&chars[cursor..]);
    corrected
}
