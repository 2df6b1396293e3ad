use thiserror::Error;

/// A grammar match that cannot be applied to the text without corrupting it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSpan {
    #[error("match {index} at {start}..{end} falls outside the {buffer_len}-character buffer")]
    OutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        buffer_len: usize,
    },

    #[error("match {index} at offset {offset} precedes the previous match at offset {previous}")]
    Unordered {
        index: usize,
        offset: usize,
        previous: usize,
    },

    #[error("match {index} at offset {offset} overlaps the previous match ending at {previous_end}")]
    Overlapping {
        index: usize,
        offset: usize,
        previous_end: usize,
    },
}

/// Failures of the external grammar-checking service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("grammar service rate limit exceeded")]
    RateLimited,

    #[error("grammar service unavailable: {0}")]
    Unavailable(String),

    #[error("grammar service returned an invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("input text is empty")]
    EmptyInput,

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("invalid grammar match: {0}")]
    InvalidSpan(#[from] InvalidSpan),
}

impl CheckError {
    /// HTTP-style status for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckError::EmptyInput => 400,
            CheckError::Service(ServiceError::RateLimited) => 429,
            CheckError::Service(_) => 503,
            CheckError::InvalidSpan(_) => 502,
        }
    }

    /// Message suitable for showing to the person who submitted the text.
    pub fn user_message(&self) -> &'static str {
        match self {
            CheckError::EmptyInput => "Please enter some text.",
            CheckError::Service(ServiceError::RateLimited) => {
                "⚠️ Too many requests. Please wait 30–60 seconds and try again."
            }
            CheckError::Service(_) => {
                "⚠️ Grammar service temporarily unavailable. Please try again later."
            }
            CheckError::InvalidSpan(_) => {
                "⚠️ Grammar service returned inconsistent results. Please try again later."
            }
        }
    }
}
