//! Update command implementation.

use crate::cli::UpdateArgs;
use crate::config;
use crate::error::{PulseError, Result};
use crate::lifecycle::{self, IssueChanges};
use crate::model::Issue;
use crate::storage::EntityStore;
use tracing::{debug, info};

/// Execute the update command.
///
/// Builds a sparse change set from the flags, applies it through the
/// lifecycle rules, and persists the result.
///
/// # Errors
///
/// Returns an error if the issue does not exist, a status/priority value is
/// invalid, or a supplied title is empty.
pub fn execute(args: &UpdateArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut store = config::open_store(cli)?;

    let mut issue = store
        .get_issue(&args.id)?
        .ok_or_else(|| PulseError::IssueNotFound {
            id: args.id.clone(),
        })?;
    let before = issue.clone();

    let changes = build_changes(args, &issue)?;
    if changes.is_empty() {
        println!("No updates specified for {}", args.id);
        return Ok(());
    }
    debug!(id = %args.id, "applying update");

    lifecycle::apply_update(&mut issue, &changes)?;
    store.update_issue(&issue)?;
    info!(id = %issue.id, "updated issue");

    if json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        print_update_summary(&before, &issue);
    }
    Ok(())
}

/// Translate CLI flags into a sparse change set.
///
/// Empty strings on clearable flags (description, assignee, cycle, parent)
/// mean "clear the field". Label add/remove flags are resolved against the
/// current label set here, so the lifecycle sees one wholesale replacement.
fn build_changes(args: &UpdateArgs, current: &Issue) -> Result<IssueChanges> {
    let status = args.status.as_deref().map(str::parse).transpose()?;
    let priority = args.priority.as_deref().map(str::parse).transpose()?;

    let labels = if let Some(ref raw) = args.labels {
        Some(super::create::split_labels(Some(raw.as_str())))
    } else if args.add_label.is_empty() && args.remove_label.is_empty() {
        None
    } else {
        let mut labels = current.labels.clone();
        for label in &args.add_label {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.clone());
            }
        }
        labels.retain(|l| !args.remove_label.contains(l));
        Some(labels)
    };

    Ok(IssueChanges {
        title: args.title.clone(),
        description: clearable(args.description.as_deref()),
        status,
        priority,
        assignee_id: clearable(args.assignee.as_deref()),
        estimate: args.estimate,
        cycle_id: clearable(args.cycle.as_deref()),
        parent_id: clearable(args.parent.as_deref()),
        labels,
    })
}

#[allow(clippy::option_option, clippy::single_option_map)]
fn clearable(value: Option<&str>) -> Option<Option<String>> {
    value.map(|v| {
        if v.is_empty() {
            None
        } else {
            Some(v.to_string())
        }
    })
}

/// Print a summary of what changed for the issue.
fn print_update_summary(before: &Issue, after: &Issue) {
    println!("Updated {}: {}", after.id, after.title);

    if before.status != after.status {
        println!(
            "  status: {} -> {}",
            before.status.as_str(),
            after.status.as_str()
        );
    }
    if before.priority != after.priority {
        println!("  priority: {} -> {}", before.priority, after.priority);
    }
    if before.assignee_id != after.assignee_id {
        let old = before.assignee_id.as_deref().unwrap_or("(none)");
        let new = after.assignee_id.as_deref().unwrap_or("(none)");
        println!("  assignee: {old} -> {new}");
    }
    if before.estimate != after.estimate {
        println!("  estimate: {} -> {}", before.estimate, after.estimate);
    }
    if before.labels != after.labels {
        println!("  labels: {}", after.labels.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Status};
    use chrono::{TimeZone, Utc};

    fn current() -> Issue {
        let t = Utc.timestamp_opt(1_735_689_600, 0).unwrap();
        Issue {
            id: "issue_1".to_string(),
            workspace_id: "default".to_string(),
            title: "t".to_string(),
            description: None,
            status: Status::Todo,
            priority: Priority::MEDIUM,
            assignee_id: None,
            estimate: 0,
            cycle_id: None,
            labels: vec!["bug".to_string()],
            parent_id: None,
            created_at: t,
            updated_at: t,
            completed_at: None,
        }
    }

    #[test]
    fn clearable_distinguishes_empty_from_absent() {
        assert_eq!(clearable(Some("alice")), Some(Some("alice".to_string())));
        assert_eq!(clearable(Some("")), Some(None));
        assert_eq!(clearable(None), None);
    }

    #[test]
    fn build_changes_resolves_label_edits() {
        let args = UpdateArgs {
            id: "issue_1".to_string(),
            add_label: vec!["auth".to_string(), "bug".to_string()],
            remove_label: vec!["bug".to_string()],
            ..UpdateArgs::default()
        };
        let changes = build_changes(&args, &current()).unwrap();
        assert_eq!(changes.labels, Some(vec!["auth".to_string()]));
    }

    #[test]
    fn build_changes_wholesale_labels_win() {
        let args = UpdateArgs {
            id: "issue_1".to_string(),
            labels: Some("x,y".to_string()),
            add_label: vec!["z".to_string()],
            ..UpdateArgs::default()
        };
        let changes = build_changes(&args, &current()).unwrap();
        assert_eq!(
            changes.labels,
            Some(vec!["x".to_string(), "y".to_string()])
        );
    }

    #[test]
    fn build_changes_rejects_bad_status() {
        let args = UpdateArgs {
            id: "issue_1".to_string(),
            status: Some("wontfix".to_string()),
            ..UpdateArgs::default()
        };
        assert!(matches!(
            build_changes(&args, &current()).unwrap_err(),
            PulseError::InvalidStatus { .. }
        ));
    }

    #[test]
    fn build_changes_empty_flags_is_empty() {
        let args = UpdateArgs {
            id: "issue_1".to_string(),
            ..UpdateArgs::default()
        };
        assert!(build_changes(&args, &current()).unwrap().is_empty());
    }
}
