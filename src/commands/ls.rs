use crate::commands::{CommandOutput, connect, format_snapshot, snapshot_json};
use crate::error::Result;
use crate::types::FilterSet;

/// List one page of tickets
///
/// # Arguments
/// * `page` - 1-based page number
/// * `filters` - Facet constraints; empty means the whole collection
/// * `output_json` - If true, output result as JSON
pub async fn cmd_ls(page: u32, filters: FilterSet, output_json: bool) -> Result<()> {
    let controller = connect()?.with_filters(filters);

    if page == 1 {
        controller.initialize().await?;
    } else {
        controller.go_to_page(page).await?;
    }

    let snapshot = controller.snapshot();
    CommandOutput::new(snapshot_json(&snapshot))
        .with_text(format_snapshot(&snapshot))
        .print(output_json)
}
