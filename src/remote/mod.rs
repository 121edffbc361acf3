//! Helpdesk backend boundary.
//!
//! The host framework owns ticket storage, authentication and file uploads.
//! This module describes the three services the list engine consumes and
//! provides a REST implementation of them in [`rest`].

pub mod error;
pub mod rest;

use std::fmt;
use std::future::Future;
use std::path::Path;

use secrecy::SecretBox;

use crate::error::{HelpdeskError, Result};
use crate::query::TicketQuery;
use crate::types::{PageResult, TicketProperties};

pub use error::ApiError;
pub use rest::RestClient;

/// Caller-supplied authentication for write endpoints
#[derive(Debug)]
pub enum Credential {
    /// No authentication; only public reads will succeed
    Anonymous,
    /// Session nonce sent in the `X-WP-Nonce` header
    Nonce(SecretBox<String>),
    /// Host application password sent as HTTP basic auth
    ApplicationPassword {
        username: String,
        password: SecretBox<String>,
    },
}

impl Credential {
    pub fn nonce(value: impl Into<String>) -> Self {
        Credential::Nonce(SecretBox::new(Box::new(value.into())))
    }

    pub fn application_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credential::ApplicationPassword {
            username: username.into(),
            password: SecretBox::new(Box::new(password.into())),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Credential::Anonymous)
    }
}

/// File uploaded alongside a new ticket
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read an attachment from disk, keeping only the file name for upload
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                HelpdeskError::Other(format!("invalid attachment path '{}'", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }
}

/// Input for the ticket creation flow
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub ticket_type: String,
    pub category: String,
    /// Body of the first reply
    pub description: String,
    pub attachment: Option<Attachment>,
}

/// Sub-steps of ticket creation, each performed independently by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationStep {
    Ticket,
    Attachment,
    Reply,
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationStep::Ticket => write!(f, "ticket"),
            CreationStep::Attachment => write!(f, "attachment"),
            CreationStep::Reply => write!(f, "reply"),
        }
    }
}

/// Result of one creation sub-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Created(u64),
    /// Nothing to do, e.g. no file was attached
    Skipped,
    Failed(String),
}

impl StepOutcome {
    pub fn id(&self) -> Option<u64> {
        match self {
            StepOutcome::Created(id) => Some(*id),
            _ => None,
        }
    }
}

/// What the creation flow produced. Steps that succeeded are not rolled back
/// when a later step fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationReport {
    pub ticket_id: u64,
    pub attachment: StepOutcome,
    pub reply: StepOutcome,
}

impl CreationReport {
    /// Failed sub-steps as errors
    pub fn failures(&self) -> Vec<HelpdeskError> {
        [
            (CreationStep::Attachment, &self.attachment),
            (CreationStep::Reply, &self.reply),
        ]
        .into_iter()
        .filter_map(|(step, outcome)| match outcome {
            StepOutcome::Failed(message) => Some(HelpdeskError::CreationStepFailed {
                step,
                message: message.clone(),
            }),
            _ => None,
        })
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        !matches!(self.attachment, StepOutcome::Failed(_))
            && !matches!(self.reply, StepOutcome::Failed(_))
    }
}

/// Paged, filtered reads of the ticket collection
pub trait TicketQueryService: Send + Sync {
    fn fetch_page(&self, query: &TicketQuery)
    -> impl Future<Output = Result<PageResult>> + Send;
}

/// Writes against existing tickets
pub trait TicketMutationService: Send + Sync {
    fn update_ticket(
        &self,
        credential: &Credential,
        ticket_id: u64,
        properties: &TicketProperties,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete_ticket(
        &self,
        credential: &Credential,
        ticket_id: u64,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Ticket creation, including the optional attachment and first reply
pub trait TicketCreationService: Send + Sync {
    fn create_ticket(
        &self,
        credential: &Credential,
        ticket: NewTicket,
    ) -> impl Future<Output = Result<CreationReport>> + Send;
}
