pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod highlight;

pub use checker::GrammarChecker;
pub use config::Config;
pub use error::{CheckError, InvalidSpan, ServiceError};
pub use highlight::{compute_highlights, Highlights, HighlightOptions};

use highlight::word_diff::WordChange;
use serde::Serialize;

/// One grammatical error reported by the grammar service.
///
/// `offset` and `length` count characters of the checked text, so the error
/// covers the half-open range `offset..offset + length`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarMatch {
    pub offset: usize,
    pub length: usize,
    pub message: String,
    pub rule_id: Option<String>,
    pub replacements: Vec<String>,
}

impl GrammarMatch {
    pub fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            ..Default::default()
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacements.push(replacement.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// End of the span, or `None` when `offset + length` overflows.
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.length)
    }
}

/// Outcome of checking one block of text.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    #[serde(skip)]
    pub original_text: String,
    #[serde(skip)]
    pub corrected_text: String,
    #[serde(skip)]
    pub matches: Vec<GrammarMatch>,
    #[serde(skip)]
    pub words: Vec<WordChange>,

    pub highlighted_input: String,
    pub highlighted_output: String,
    pub accuracy_percent: u8,
    pub word_count: usize,
}
