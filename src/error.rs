//! Failure taxonomy for one analysis submission.
//!
//! Every failure ends up as a single human-readable message in the
//! presentation layer (`AnalysisFailure::user_message`). Nothing here is
//! retried and nothing is fatal; the caller goes back to an idle state.

use std::time::Duration;

use thiserror::Error;

/// Local, pre-network input problems. `code()` is stable and used by tests
/// and logs; `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a URL")]
    Empty,
    #[error("Please enter a valid http(s) URL")]
    BadUrl,
    #[error("Please enter some text to analyze")]
    EmptyText,
    #[error("Text must be at least 50 characters long")]
    TooShort,
    #[error("Please select a file first")]
    NoFile,
    #[error("Please select only .txt or .pdf files")]
    UnsupportedType,
    #[error("File size must be less than 16MB")]
    TooLarge,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Empty => "empty",
            ValidationError::BadUrl => "bad_url",
            ValidationError::EmptyText => "empty_text",
            ValidationError::TooShort => "too_short",
            ValidationError::NoFile => "no_file",
            ValidationError::UnsupportedType => "unsupported_type",
            ValidationError::TooLarge => "too_large",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Upload call rejected or answered `success: false`.
    #[error("{0}")]
    Upload(String),
    /// Analyze call rejected or answered `success: false`.
    #[error("{0}")]
    Analysis(String),
    /// Transport failure or a body that is not JSON.
    #[error("Network error: {0}")]
    Network(String),
    #[error("The analysis service did not answer within {}s", .0.as_secs())]
    Timeout(Duration),
    /// A newer submission (or a mode switch) replaced this one.
    #[error("superseded by a newer request")]
    Superseded,
}

impl AnalysisFailure {
    /// Short label for logs and the `kind` metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisFailure::Validation(_) => "validation",
            AnalysisFailure::Upload(_) => "upload",
            AnalysisFailure::Analysis(_) => "analysis",
            AnalysisFailure::Network(_) => "network",
            AnalysisFailure::Timeout(_) => "timeout",
            AnalysisFailure::Superseded => "superseded",
        }
    }

    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, AnalysisFailure::Superseded)
    }
}
