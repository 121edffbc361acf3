//! REST implementation of the helpdesk services.
//!
//! Endpoints, relative to the configured REST root:
//! - `GET  wp/v2/ticket/?page=N&ticket_*=..` lists tickets; the page count is
//!   reported in the `x-wp-totalpages` header
//! - `DELETE wp/v2/ticket/{id}` removes a ticket
//! - `PUT  helpdesk/v1/tickets` updates ticket facets
//! - `POST helpdesk/v1/tickets` creates a ticket, its attachment and first reply
//!
//! # Security Note - Logging
//!
//! Credential header values are marked sensitive so they are redacted if
//! reqwest debug logging is ever enabled. URLs are logged at debug level;
//! credentials never travel in the URL.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, multipart};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{HelpdeskError, Result};
use crate::query::TicketQuery;
use crate::types::{PageResult, Ticket, TicketProperties};

use super::{
    ApiError, CreationReport, CreationStep, Credential, NewTicket, StepOutcome,
    TicketCreationService, TicketMutationService, TicketQueryService,
};

const COLLECTION_PATH: &str = "wp/v2/ticket/";
const ACTIONS_PATH: &str = "helpdesk/v1/tickets";

pub const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";
pub const TOTAL_ITEMS_HEADER: &str = "x-wp-total";
const NONCE_HEADER: &str = "X-WP-Nonce";

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Client for a helpdesk-enabled host's REST API
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base: Url,
}

impl RestClient {
    /// Create a client rooted at `base_url` (e.g. `https://example.com/wp-json/`)
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = parse_base_url(base_url)?;

        let client = Client::builder()
            .user_agent(concat!("helpdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .build()?;

        Ok(Self { client, base })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let url = config.url().ok_or_else(|| {
            HelpdeskError::Config(
                "helpdesk URL not configured. Set HELPDESK_URL environment variable or run: helpdesk config set url <url>".to_string(),
            )
        })?;
        Self::with_timeout(&url, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Full URL for a collection query
    pub fn collection_url(&self, query: &TicketQuery) -> Result<Url> {
        let mut url = self.join(COLLECTION_PATH)?;
        url.set_query(Some(&query.to_query_string()));
        Ok(url)
    }

    fn ticket_url(&self, ticket_id: u64) -> Result<Url> {
        self.join(&format!("{COLLECTION_PATH}{ticket_id}"))
    }

    fn actions_url(&self) -> Result<Url> {
        self.join(ACTIONS_PATH)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| HelpdeskError::Config(format!("invalid endpoint path '{path}': {e}")))
    }
}

/// Normalize a REST root: trailing slash, http or https only
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut normalized = base_url.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }

    let url = Url::parse(&normalized)
        .map_err(|e| HelpdeskError::Config(format!("invalid helpdesk URL '{base_url}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HelpdeskError::Config(format!(
            "unsupported URL scheme '{other}', expected http or https"
        ))),
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| HelpdeskError::Auth("credential contains invalid characters".to_string()))?;
    header.set_sensitive(true);
    Ok(header)
}

fn authorize(builder: RequestBuilder, credential: &Credential) -> Result<RequestBuilder> {
    Ok(match credential {
        Credential::Anonymous => builder,
        Credential::Nonce(nonce) => {
            builder.header(NONCE_HEADER, sensitive_header(nonce.expose_secret())?)
        }
        Credential::ApplicationPassword { username, password } => {
            builder.basic_auth(username, Some(password.expose_secret()))
        }
    })
}

/// Read the total page count from response metadata
pub fn parse_total_pages(headers: &HeaderMap) -> Result<u32> {
    let value = headers.get(TOTAL_PAGES_HEADER).ok_or_else(|| {
        HelpdeskError::MalformedResponse(format!("missing {TOTAL_PAGES_HEADER} header"))
    })?;

    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .ok_or_else(|| {
            HelpdeskError::MalformedResponse(format!(
                "non-numeric {TOTAL_PAGES_HEADER} header: {value:?}"
            ))
        })
}

/// Read the total item count; absent or unreadable counts are ignored
pub fn parse_total_items(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_ITEMS_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Parse the collection body into typed tickets
pub fn parse_tickets(body: &str) -> Result<Vec<Ticket>> {
    serde_json::from_str(body)
        .map_err(|e| HelpdeskError::MalformedResponse(format!("invalid ticket list: {e}")))
}

/// Read a non-success response into an [`ApiError`]
async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ApiError::from_status_body(status, &body)
}

#[derive(Serialize)]
struct UpdateRequest<'a> {
    ticket: u64,
    properties: &'a TicketProperties,
}

/// Serialized form of a host response object nested in the creation body
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StepEnvelope {
    Response {
        data: Value,
        status: u16,
    },
    Failure {
        code: String,
        message: String,
    },
    Error {
        errors: HashMap<String, Vec<String>>,
    },
}

#[derive(Debug, Deserialize)]
struct CreationBody {
    ticket: Option<StepEnvelope>,
    media: Option<StepEnvelope>,
    reply: Option<StepEnvelope>,
}

fn step_outcome(envelope: Option<&StepEnvelope>) -> StepOutcome {
    match envelope {
        Some(StepEnvelope::Response { data, status }) if *status == 201 => {
            match data.as_u64().or_else(|| data.as_str()?.parse().ok()) {
                Some(id) => StepOutcome::Created(id),
                None => StepOutcome::Failed(format!("unexpected identifier {data}")),
            }
        }
        Some(StepEnvelope::Response { status, .. }) if (200..300).contains(status) => {
            StepOutcome::Skipped
        }
        Some(StepEnvelope::Response { status, .. }) => {
            StepOutcome::Failed(format!("host answered status {status}"))
        }
        Some(StepEnvelope::Failure { code, message }) => {
            StepOutcome::Failed(format!("{message} ({code})"))
        }
        Some(StepEnvelope::Error { errors }) => StepOutcome::Failed(
            errors
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| "unknown host error".to_string()),
        ),
        None => StepOutcome::Failed("missing from response".to_string()),
    }
}

/// Interpret a successful creation response body
pub fn parse_creation_response(body: &str) -> Result<CreationReport> {
    let parsed: CreationBody = serde_json::from_str(body)
        .map_err(|e| HelpdeskError::MalformedResponse(format!("invalid creation response: {e}")))?;

    let ticket_id = match step_outcome(parsed.ticket.as_ref()) {
        StepOutcome::Created(id) => id,
        StepOutcome::Failed(message) => {
            return Err(HelpdeskError::CreationStepFailed {
                step: CreationStep::Ticket,
                message,
            });
        }
        StepOutcome::Skipped => {
            return Err(HelpdeskError::CreationStepFailed {
                step: CreationStep::Ticket,
                message: "no ticket identifier returned".to_string(),
            });
        }
    };

    Ok(CreationReport {
        ticket_id,
        attachment: step_outcome(parsed.media.as_ref()),
        reply: step_outcome(parsed.reply.as_ref()),
    })
}

impl TicketQueryService for RestClient {
    async fn fetch_page(&self, query: &TicketQuery) -> Result<PageResult> {
        let url = self.collection_url(query)?;
        debug!(%url, "fetching ticket page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::from(e).into_query_error())?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await.into_query_error());
        }

        let total_pages = parse_total_pages(response.headers())?;
        let total_items = parse_total_items(response.headers());

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from(e).into_query_error())?;
        let items = parse_tickets(&body)?;

        debug!(count = items.len(), total_pages, "ticket page received");

        Ok(PageResult {
            items,
            total_pages,
            total_items,
        })
    }
}

impl TicketMutationService for RestClient {
    async fn update_ticket(
        &self,
        credential: &Credential,
        ticket_id: u64,
        properties: &TicketProperties,
    ) -> Result<()> {
        let url = self.actions_url()?;
        debug!(%url, ticket_id, "updating ticket properties");

        let request = self.client.put(url).json(&UpdateRequest {
            ticket: ticket_id,
            properties,
        });
        let response = authorize(request, credential)?
            .send()
            .await
            .map_err(|e| ApiError::from(e).into_mutation_error())?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await.into_mutation_error());
        }
        Ok(())
    }

    async fn delete_ticket(&self, credential: &Credential, ticket_id: u64) -> Result<()> {
        let url = self.ticket_url(ticket_id)?;
        debug!(%url, ticket_id, "deleting ticket");

        let response = authorize(self.client.delete(url), credential)?
            .send()
            .await
            .map_err(|e| ApiError::from(e).into_mutation_error())?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await.into_mutation_error());
        }
        Ok(())
    }
}

impl TicketCreationService for RestClient {
    async fn create_ticket(
        &self,
        credential: &Credential,
        ticket: NewTicket,
    ) -> Result<CreationReport> {
        let url = self.actions_url()?;
        debug!(%url, title = %ticket.title, "creating ticket");

        let mut form = multipart::Form::new()
            .text("title", ticket.title)
            .text("type", ticket.ticket_type)
            .text("category", ticket.category)
            .text("description", ticket.description);

        if let Some(attachment) = ticket.attachment {
            let part = multipart::Part::bytes(attachment.bytes).file_name(attachment.file_name);
            form = form.part("media", part);
        }

        let response = authorize(self.client.post(url).multipart(form), credential)?
            .send()
            .await
            .map_err(|e| ApiError::from(e).into_creation_error(CreationStep::Ticket))?;

        if !response.status().is_success() {
            return Err(error_from_response(response)
                .await
                .into_creation_error(CreationStep::Ticket));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from(e).into_creation_error(CreationStep::Ticket))?;
        parse_creation_response(&body)
    }
}
