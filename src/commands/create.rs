use std::path::PathBuf;

use owo_colors::OwoColorize;
use serde_json::json;
use tracing::info;

use crate::commands::CommandOutput;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{
    Attachment, NewTicket, RestClient, StepOutcome, TicketCreationService,
};

/// Input of `helpdesk create`
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub title: String,
    pub ticket_type: String,
    pub category: String,
    pub description: String,
    pub attach: Option<PathBuf>,
}

fn outcome_json(outcome: &StepOutcome) -> serde_json::Value {
    match outcome {
        StepOutcome::Created(id) => json!({ "status": "created", "id": id }),
        StepOutcome::Skipped => json!({ "status": "skipped" }),
        StepOutcome::Failed(message) => json!({ "status": "failed", "error": message }),
    }
}

fn outcome_text(label: &str, outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Created(id) => format!("  {label}: {}", format!("#{id}").green()),
        StepOutcome::Skipped => format!("  {label}: {}", "none".dimmed()),
        StepOutcome::Failed(message) => format!("  {label}: {}", message.red()),
    }
}

/// Open a new ticket with its first reply and optional attachment
pub async fn cmd_create(options: CreateOptions, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let client = RestClient::from_config(&config)?;

    let attachment = match &options.attach {
        Some(path) => Some(Attachment::from_path(path).await?),
        None => None,
    };

    let ticket = NewTicket {
        title: options.title,
        ticket_type: options.ticket_type,
        category: options.category,
        description: options.description,
        attachment,
    };

    let report = client.create_ticket(&config.credential(), ticket).await?;
    info!(ticket_id = report.ticket_id, "ticket created");

    let mut text = format!("Created ticket {}", format!("#{}", report.ticket_id).green());
    text.push('\n');
    text.push_str(&outcome_text("attachment", &report.attachment));
    text.push('\n');
    text.push_str(&outcome_text("reply", &report.reply));
    for failure in report.failures() {
        text.push_str(&format!("\n{} {failure}", "warning:".yellow()));
    }

    CommandOutput::new(json!({
        "ticket_id": report.ticket_id,
        "attachment": outcome_json(&report.attachment),
        "reply": outcome_json(&report.reply),
        "complete": report.is_complete(),
    }))
    .with_text(text)
    .print(output_json)
}
