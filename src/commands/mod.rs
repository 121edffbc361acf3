mod config;
mod create;
mod delete;
pub mod interactive;
mod ls;
mod update;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use create::{CreateOptions, cmd_create};
pub use delete::cmd_delete;
pub use ls::cmd_ls;
pub use update::cmd_update;

use owo_colors::OwoColorize;
use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::Config;
use crate::controller::{ListSnapshot, TicketListController};
use crate::error::Result;
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::remote::RestClient;
use crate::types::Ticket;

/// Result of a command, rendered as JSON or text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn print(self, output_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !output_json => println!("{text}"),
            _ => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints notifications to stderr so they never mix with JSON output
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => eprintln!("{}", notification.message.green()),
            NotificationKind::Failure => eprintln!("{}", notification.message.red()),
        }
    }
}

/// Build a list controller for the configured host
pub(crate) fn connect() -> Result<TicketListController<RestClient>> {
    let config = Config::load()?;
    let client = RestClient::from_config(&config)?;
    Ok(TicketListController::new(client, config.credential()).with_notifier(ConsoleNotifier))
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    ticket_type: String,
    #[tabled(rename = "User")]
    user: String,
}

impl From<&Ticket> for TicketRow {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            title: ticket.title.clone(),
            status: ticket.status.clone(),
            category: ticket.category.clone(),
            ticket_type: ticket.ticket_type.clone(),
            user: ticket.user.clone(),
        }
    }
}

/// JSON form of a list page
pub(crate) fn snapshot_json(snapshot: &ListSnapshot) -> Value {
    json!({
        "page": snapshot.page,
        "total_pages": snapshot.total_pages,
        "total_items": snapshot.total_items,
        "filters": snapshot.filters,
        "items": snapshot.items,
    })
}

/// Text form of a list page: a table followed by the pager line
pub(crate) fn format_snapshot(snapshot: &ListSnapshot) -> String {
    let mut text = String::new();

    if snapshot.items.is_empty() {
        text.push_str(&"No tickets found.".dimmed().to_string());
    } else {
        let rows: Vec<TicketRow> = snapshot.items.iter().map(TicketRow::from).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        text.push_str(&table.to_string());
    }

    text.push('\n');
    let pager = format!("Page {} of {}", snapshot.page, snapshot.total_pages);
    text.push_str(&pager.cyan().to_string());
    if let Some(total) = snapshot.total_items {
        text.push_str(&format!(" ({total} tickets)"));
    }

    let filters: Vec<String> = snapshot
        .filters
        .constraints()
        .map(|(facet, value)| format!("{facet}={value}"))
        .collect();
    if !filters.is_empty() {
        text.push_str(&format!("\nFilters: {}", filters.join(", ")));
    }

    text
}
