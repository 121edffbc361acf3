use serde_json::json;

use crate::commands::interactive::{self, is_stdin_tty};
use crate::commands::{CommandOutput, connect, format_snapshot, snapshot_json};
use crate::error::{HelpdeskError, Result};

/// Delete a ticket
///
/// # Arguments
/// * `id` - The ticket ID
/// * `force` - Skip confirmation prompt
/// * `output_json` - If true, output result as JSON
pub async fn cmd_delete(id: u64, force: bool, output_json: bool) -> Result<()> {
    if !force {
        if output_json || !is_stdin_tty() {
            return Err(HelpdeskError::ConfirmationRequired(
                "Ticket deletion requires --force flag in non-interactive contexts. Use --force to confirm deletion.".to_string(),
            ));
        }
        if !interactive::confirm(&format!("Delete ticket #{id}"))? {
            println!("Cancelled");
            return Ok(());
        }
    }

    let controller = connect()?;
    controller.delete_ticket(id).await?;

    let snapshot = controller.snapshot();
    let mut value = snapshot_json(&snapshot);
    value["ticket_id"] = json!(id);
    value["action"] = json!("deleted");

    CommandOutput::new(value)
        .with_text(format_snapshot(&snapshot))
        .print(output_json)
}
