//! Status-only move path (`move`, `close`, `reopen`).
//!
//! The quick-move used by board interactions: identical to an update
//! carrying only the status field, including the completion-timestamp rule.

use crate::config;
use crate::error::{PulseError, Result};
use crate::lifecycle;
use crate::model::Status;
use crate::storage::EntityStore;
use tracing::info;

/// Move one issue to `new_status`.
///
/// # Errors
///
/// Returns an error if the status value is invalid or the issue does not
/// exist.
pub fn execute(id: &str, new_status: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let status: Status = new_status.parse()?;

    let mut store = config::open_store(cli)?;
    let mut issue = store
        .get_issue(id)?
        .ok_or_else(|| PulseError::IssueNotFound { id: id.to_string() })?;

    let previous = issue.status;
    lifecycle::apply_status_only(&mut issue, status)?;
    store.update_issue(&issue)?;
    info!(id = %issue.id, from = %previous, to = %status, "moved issue");

    if json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else if previous == status {
        println!("{} already {}", issue.id, status);
    } else {
        println!("Moved {}: {} -> {}", issue.id, previous, status);
    }
    Ok(())
}
