use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HelpdeskError;

pub const HELPDESK_DIR: &str = ".helpdesk";

/// One filterable ticket dimension, backed by a host taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Category,
    Type,
    Priority,
    Status,
    Agent,
}

impl Facet {
    /// Order in which facet constraints are written into a list query.
    pub const QUERY_ORDER: [Facet; 5] = [
        Facet::Category,
        Facet::Type,
        Facet::Status,
        Facet::Priority,
        Facet::Agent,
    ];

    /// Taxonomy name used as the query parameter for this facet
    pub fn taxonomy(&self) -> &'static str {
        match self {
            Facet::Category => "ticket_category",
            Facet::Type => "ticket_type",
            Facet::Priority => "ticket_priority",
            Facet::Status => "ticket_status",
            Facet::Agent => "ticket_agent",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Facet::Category => write!(f, "category"),
            Facet::Type => write!(f, "type"),
            Facet::Priority => write!(f, "priority"),
            Facet::Status => write!(f, "status"),
            Facet::Agent => write!(f, "agent"),
        }
    }
}

impl FromStr for Facet {
    type Err = HelpdeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "category" => Ok(Facet::Category),
            "type" => Ok(Facet::Type),
            "priority" => Ok(Facet::Priority),
            "status" => Ok(Facet::Status),
            "agent" => Ok(Facet::Agent),
            _ => Err(HelpdeskError::InvalidFacet(s.to_string())),
        }
    }
}

/// Ticket as listed by the collection endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: u64,
    #[serde(deserialize_with = "rendered_or_plain")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub category: String,
    #[serde(rename = "type", default, deserialize_with = "nullable_string")]
    pub ticket_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub user: String,
}

/// Titles arrive either as `{"rendered": "..."}` or as a bare string.
fn rendered_or_plain<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Title {
        Plain(String),
        Rendered { rendered: String },
    }

    Ok(match Title::deserialize(deserializer)? {
        Title::Plain(s) => s,
        Title::Rendered { rendered } => rendered,
    })
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Active facet constraints for a ticket list query.
///
/// A facet that is `None` or empty places no constraint on the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for a single facet
    pub fn with(mut self, facet: Facet, value: impl Into<String>) -> Self {
        *self.slot_mut(facet) = Some(value.into());
        self
    }

    pub fn get(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Category => &self.category,
            Facet::Type => &self.ticket_type,
            Facet::Priority => &self.priority,
            Facet::Status => &self.status,
            Facet::Agent => &self.agent,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    fn slot_mut(&mut self, facet: Facet) -> &mut Option<String> {
        match facet {
            Facet::Category => &mut self.category,
            Facet::Type => &mut self.ticket_type,
            Facet::Priority => &mut self.priority,
            Facet::Status => &mut self.status,
            Facet::Agent => &mut self.agent,
        }
    }

    /// Present constraints in query order
    pub fn constraints(&self) -> impl Iterator<Item = (Facet, &str)> {
        Facet::QUERY_ORDER
            .into_iter()
            .filter_map(move |facet| self.get(facet).map(|value| (facet, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.constraints().next().is_none()
    }
}

/// Partial facet map sent to the update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ticket_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl TicketProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, facet: Facet, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match facet {
            Facet::Category => self.category = value,
            Facet::Type => self.ticket_type = value,
            Facet::Priority => self.priority = value,
            Facet::Status => self.status = value,
            Facet::Agent => self.agent = value,
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.ticket_type.is_none()
            && self.agent.is_none()
    }
}

/// One page of the ticket collection, as answered by a single query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub items: Vec<Ticket>,
    pub total_pages: u32,
    /// Total number of matching tickets, when the backend reports it
    pub total_items: Option<u64>,
}

impl PageResult {
    pub fn new(items: Vec<Ticket>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages,
            total_items: None,
        }
    }
}
