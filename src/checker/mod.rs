pub mod languagetool;
pub mod service;
pub mod tokenizer;

use crate::highlight::{compute_highlights, Highlights, HighlightOptions};
use crate::{CheckError, CheckReport};
use service::GrammarService;
use tracing::{debug, info_span};

pub use languagetool::LanguageToolClient;
pub use service::ServiceResponse;

/// Runs a grammar service over text and highlights what it finds.
pub struct GrammarChecker<S> {
    service: S,
    options: HighlightOptions,
}

impl<S: GrammarService> GrammarChecker<S> {
    pub fn new(service: S, options: HighlightOptions) -> Self {
        Self { service, options }
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    pub fn check(&self, text: &str) -> Result<CheckReport, CheckError> {
        let original_text = text.trim();
        if original_text.is_empty() {
            return Err(CheckError::EmptyInput);
        }

        let _span = info_span!("check", chars = original_text.chars().count()).entered();

        let ServiceResponse {
            matches,
            corrected_text,
        } = self.service.check_text(original_text)?;

        let Highlights {
            highlighted_input,
            highlighted_output,
            words,
        } = compute_highlights(original_text, &matches, &corrected_text, &self.options)?;

        let word_count = tokenizer::word_count(original_text);
        let accuracy_percent = accuracy_percent(matches.len(), word_count);

        debug!(
            matches = matches.len(),
            word_count, accuracy_percent, "Grammar check complete"
        );

        Ok(CheckReport {
            original_text: original_text.to_string(),
            corrected_text,
            matches,
            words,
            highlighted_input,
            highlighted_output,
            accuracy_percent,
            word_count,
        })
    }
}

/// Share of words without a reported error, as a rounded percentage.
///
/// Text without words scores 100; more matches than words scores 0.
pub fn accuracy_percent(match_count: usize, word_count: usize) -> u8 {
    if word_count == 0 {
        return 100;
    }

    let ratio = 1.0 - match_count as f64 / word_count as f64;
    (100.0 * ratio).round().clamp(0.0, 100.0) as u8
}
