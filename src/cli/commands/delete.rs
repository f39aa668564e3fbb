//! Delete command implementation.

use crate::config;
use crate::error::{PulseError, Result};
use crate::storage::EntityStore;
use tracing::info;

/// Execute the delete command.
///
/// # Errors
///
/// Returns `IssueNotFound` when the issue does not exist.
pub fn execute(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut store = config::open_store(cli)?;

    let issue = store
        .get_issue(id)?
        .ok_or_else(|| PulseError::IssueNotFound { id: id.to_string() })?;
    store.delete_issue(id)?;
    info!(id = %id, "deleted issue");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "deleted": id }))?
        );
    } else {
        println!("Deleted {}: {}", issue.id, issue.title);
    }
    Ok(())
}
