//! Show command implementation.

use crate::config;
use crate::error::{PulseError, Result};
use crate::model::Issue;
use crate::storage::EntityStore;

/// Execute the show command.
///
/// # Errors
///
/// Returns `IssueNotFound` for the first missing ID.
pub fn execute(ids: &[String], json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;

    let mut issues: Vec<Issue> = Vec::with_capacity(ids.len());
    for id in ids {
        let issue = store
            .get_issue(id)?
            .ok_or_else(|| PulseError::IssueNotFound { id: id.clone() })?;
        issues.push(issue);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        for issue in &issues {
            print_issue(issue);
        }
    }
    Ok(())
}

fn print_issue(issue: &Issue) {
    println!("{} {}", issue.id, issue.title);
    println!("  workspace: {}", issue.workspace_id);
    println!("  status: {}  priority: {}", issue.status, issue.priority);
    if let Some(ref assignee) = issue.assignee_id {
        println!("  assignee: {assignee}");
    }
    if issue.estimate > 0 {
        println!("  estimate: {} pts", issue.estimate);
    }
    if let Some(ref cycle_id) = issue.cycle_id {
        println!("  cycle: {cycle_id}");
    }
    if let Some(ref parent_id) = issue.parent_id {
        println!("  parent: {parent_id}");
    }
    if !issue.labels.is_empty() {
        println!("  labels: {}", issue.labels.join(", "));
    }
    println!("  created: {}", issue.created_at.to_rfc3339());
    println!("  updated: {}", issue.updated_at.to_rfc3339());
    if let Some(completed_at) = issue.completed_at {
        println!("  completed: {}", completed_at.to_rfc3339());
    }
    if let Some(ref description) = issue.description {
        println!("\n  {description}");
    }
}
