use thiserror::Error;

use crate::remote::CreationStep;

#[derive(Error, Debug)]
pub enum HelpdeskError {
    // Ticket list errors
    #[error("ticket query failed: {0}")]
    QueryFailed(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("ticket mutation failed: {0}")]
    MutationFailed(String),

    #[error("{step} creation failed: {message}")]
    CreationStepFailed { step: CreationStep, message: String },

    #[error("invalid page '{0}': pages start at 1")]
    InvalidPage(u32),

    #[error("invalid facet '{0}', expected one of: category, type, priority, status, agent")]
    InvalidFacet(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("{0}")]
    ConfirmationRequired(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HelpdeskError>;
