//! Error handling for the site interaction layer
//!
//! Each concern gets its own thiserror enum; `SiteError` wraps them so
//! callers that do not care about the distinction can use `?` throughout.

use reqwest::StatusCode;
use thiserror::Error;

use crate::form::FieldName;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One or more contact form fields failed their rule.
///
/// Never shown to the user as text; the dispatcher turns it into
/// per-field error markers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid fields: {}", display_fields(.invalid))]
pub struct ValidationError {
    pub invalid: Vec<FieldName>,
}

impl ValidationError {
    pub fn contains(&self, field: FieldName) -> bool {
        self.invalid.contains(&field)
    }
}

fn display_fields(fields: &[FieldName]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures of the outbound HTTP call itself
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("form action '{0}' is not an http(s) URL")]
    InvalidAction(String),
}

/// Why a submission attempt did not succeed
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("server answered with status {0}")]
    Status(StatusCode),

    #[error("network failure: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid form action URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for site operations
pub type Result<T> = std::result::Result<T, SiteError>;
