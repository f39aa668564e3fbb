//! Create command implementation.

use crate::cli::CreateArgs;
use crate::config;
use crate::error::{PulseError, Result};
use crate::model::{Issue, Priority, Status};
use crate::storage::EntityStore;
use crate::util::id::new_issue_id;
use chrono::Utc;
use tracing::info;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if the title is empty, the workspace does not exist,
/// or a supplied status/priority value is invalid.
pub fn execute(args: &CreateArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    if args.title.trim().is_empty() {
        return Err(PulseError::validation("title", "cannot be empty"));
    }

    let status: Status = args
        .status
        .as_deref()
        .map(str::parse)
        .transpose()?
        .unwrap_or_default();
    let priority: Priority = args
        .priority
        .as_deref()
        .map(str::parse)
        .transpose()?
        .unwrap_or_default();

    let mut store = config::open_store(cli)?;

    if store.get_workspace(&args.workspace)?.is_none() {
        return Err(PulseError::WorkspaceNotFound {
            id: args.workspace.clone(),
        });
    }

    let now = Utc::now();
    let issue = Issue {
        id: new_issue_id(),
        workspace_id: args.workspace.clone(),
        title: args.title.clone(),
        description: args.description.clone(),
        status,
        priority,
        assignee_id: args.assignee.clone(),
        estimate: args.estimate.unwrap_or(0),
        cycle_id: args.cycle.clone(),
        labels: split_labels(args.labels.as_deref()),
        parent_id: args.parent.clone(),
        created_at: now,
        updated_at: now,
        completed_at: status.is_done().then_some(now),
    };

    store.create_issue(&issue)?;
    info!(id = %issue.id, workspace = %issue.workspace_id, "created issue");

    if json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        println!("Created {}: {}", issue.id, issue.title);
    }
    Ok(())
}

/// Split a comma-separated label list, dropping empty entries.
pub fn split_labels(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}
