use serde_json::json;

use crate::commands::{CommandOutput, connect, format_snapshot, snapshot_json};
use crate::error::{HelpdeskError, Result};
use crate::types::TicketProperties;

/// Change facets of a ticket and show the refreshed page
pub async fn cmd_update(
    id: u64,
    properties: TicketProperties,
    page: u32,
    output_json: bool,
) -> Result<()> {
    if properties.is_empty() {
        return Err(HelpdeskError::Other(
            "nothing to update; pass at least one of --category, --type, --priority, --status, --agent"
                .to_string(),
        ));
    }

    let controller = connect()?;
    controller.set_page(page)?;

    controller.update_ticket_properties(id, properties.clone()).await?;

    let snapshot = controller.snapshot();
    let mut value = snapshot_json(&snapshot);
    value["ticket_id"] = json!(id);
    value["updated"] = serde_json::to_value(&properties)?;

    CommandOutput::new(value)
        .with_text(format_snapshot(&snapshot))
        .print(output_json)
}
