//! HTTP failure details from the helpdesk backend.
//!
//! Failures are captured as an [`ApiError`] first so the status and the
//! host's error code survive, then converted into the crate error that
//! matches the operation (read, write, or creation step).

use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::HelpdeskError;

use super::CreationStep;

/// Error body the host framework returns for REST failures
#[derive(Debug, Clone, Deserialize)]
pub struct HostErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// API error with HTTP status information, if any
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code, absent for transport failures
    pub status: Option<StatusCode>,
    /// Host error code (e.g. `rest_forbidden`)
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            code: None,
            message: message.into(),
        }
    }

    /// Build from a non-success status and its (possibly empty) body
    pub fn from_status_body(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<HostErrorBody>(body).ok();
        let code = parsed.as_ref().and_then(|b| b.code.clone());
        let message = parsed
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            });

        Self {
            status: Some(status),
            code,
            message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    pub fn into_query_error(self) -> HelpdeskError {
        HelpdeskError::QueryFailed(self.to_string())
    }

    /// Write failures; 401/403 mean the credential lacks edit rights
    pub fn into_mutation_error(self) -> HelpdeskError {
        if self.is_unauthorized() {
            HelpdeskError::MutationFailed(format!("not authorized: {self}"))
        } else {
            HelpdeskError::MutationFailed(self.to_string())
        }
    }

    pub fn into_creation_error(self, step: CreationStep) -> HelpdeskError {
        HelpdeskError::CreationStepFailed {
            step,
            message: self.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.status, &self.code) {
            (Some(status), Some(code)) => {
                write!(f, "{} ({}, {})", self.message, status.as_u16(), code)
            }
            (Some(status), None) => write!(f, "{} ({})", self.message, status.as_u16()),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status(),
            code: None,
            message: err.to_string(),
        }
    }
}
