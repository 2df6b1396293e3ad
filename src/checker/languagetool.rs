use super::service::{apply_corrections, GrammarService, ServiceResponse};
use crate::{Config, GrammarMatch, ServiceError};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.languagetool.org/v2";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client for a LanguageTool server's `/check` endpoint.
pub struct LanguageToolClient {
    client: Client,
    check_url: String,
    language: String,
    disabled_rules: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    message: String,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    rule: Option<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: String,
}

impl LanguageToolClient {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            check_url: format!("{}/check", config.api_url.trim_end_matches('/')),
            language: config.language.clone(),
            disabled_rules: config.disabled_rules.clone(),
        })
    }

    fn fetch_matches(&self, text: &str) -> Result<Vec<RawMatch>, ServiceError> {
        let mut form = vec![("text", text.to_string()), ("language", self.language.clone())];
        if !self.disabled_rules.is_empty() {
            form.push(("disabledRules", self.disabled_rules.join(",")));
        }

        debug!(url = %self.check_url, language = %self.language, "Sending grammar check request");

        let response = self
            .client
            .post(&self.check_url)
            .form(&form)
            .send()
            .map_err(|e| ServiceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Grammar service rate limit hit");
            return Err(ServiceError::RateLimited);
        }
        if !status.is_success() {
            return Err(ServiceError::Unavailable(format!("HTTP {}", status)));
        }

        let body: CheckResponse = response
            .json()
            .map_err(|e| ServiceError::InvalidResponse(e.to_string()))?;
        Ok(body.matches)
    }
}

impl GrammarService for LanguageToolClient {
    fn check_text(&self, text: &str) -> Result<ServiceResponse, ServiceError> {
        let raw_matches = self.fetch_matches(text)?;
        let matches = convert_matches(text, raw_matches)?;
        debug!(matches = matches.len(), "Grammar check response received");

        let corrected_text = apply_corrections(text, &matches);
        Ok(ServiceResponse {
            matches,
            corrected_text,
        })
    }
}

/// Translate UTF-16 offsets reported by the server into character offsets.
fn convert_matches(text: &str, raw_matches: Vec<RawMatch>) -> Result<Vec<GrammarMatch>, ServiceError> {
    let boundaries = utf16_boundaries(text);
    let to_char = |utf16: usize| {
        boundaries.binary_search(&utf16).map_err(|_| {
            ServiceError::InvalidResponse(format!(
                "offset {} is not a character boundary",
                utf16
            ))
        })
    };

    raw_matches
        .into_iter()
        .map(|raw| -> Result<GrammarMatch, ServiceError> {
            let start = to_char(raw.offset)?;
            let raw_end = raw.offset.checked_add(raw.length).ok_or_else(|| {
                ServiceError::InvalidResponse(format!(
                    "match at offset {} has an unrepresentable length {}",
                    raw.offset, raw.length
                ))
            })?;
            let end = to_char(raw_end)?;
            Ok(GrammarMatch {
                offset: start,
                length: end - start,
                message: raw.message,
                rule_id: raw.rule.map(|rule| rule.id),
                replacements: raw.replacements.into_iter().map(|r| r.value).collect(),
            })
        })
        .collect()
}

/// UTF-16 offset of every character start, plus the end of the text.
fn utf16_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = Vec::with_capacity(text.len() + 1);
    let mut position = 0;
    boundaries.push(position);
    for ch in text.chars() {
        position += ch.len_utf16();
        boundaries.push(position);
    }
    boundaries
}
