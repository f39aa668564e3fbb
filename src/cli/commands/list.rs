//! List command implementation.

use crate::cli::ListArgs;
use crate::config;
use crate::error::Result;
use crate::format::format_issue_line;
use crate::model::Status;
use crate::storage::{EntityStore, IssueFilters};
use tracing::debug;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a status filter value is invalid or the store
/// cannot be read.
pub fn execute(args: &ListArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let status: Option<Status> = args.status.as_deref().map(str::parse).transpose()?;

    let store = config::open_store(cli)?;
    let filters = IssueFilters {
        workspace_id: Some(args.workspace.clone()),
        status,
        cycle_id: args.cycle.clone(),
        limit: args.limit,
        offset: args.offset,
    };
    let issues = store.list_issues(&filters)?;
    debug!(count = issues.len(), workspace = %args.workspace, "listed issues");

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("No issues found");
    } else {
        for issue in &issues {
            println!("{}", format_issue_line(issue));
        }
    }
    Ok(())
}
