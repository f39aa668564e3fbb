//! Issue lifecycle management.
//!
//! Applies sparse field updates to an issue and enforces the two invariants
//! this crate cares about:
//!
//! - `title` must be non-empty after trimming
//! - `completed_at` is non-null exactly when `status == Done`
//!
//! Updates are all-or-nothing: validation happens before any field is
//! touched, so a rejected update leaves the issue exactly as it was. The
//! functions here are pure over their inputs and perform no I/O; persistence
//! is the caller's job.

use crate::error::{PulseError, Result};
use crate::model::{Issue, Priority, Status};
use chrono::{DateTime, Utc};

/// A sparse set of field assignments for an issue.
///
/// `None` means "leave the field untouched". For clearable fields the inner
/// option distinguishes "set to a value" (`Some(Some(v))`) from "clear"
/// (`Some(None)`). Status arrives already parsed; unrecognized status
/// strings are rejected by `Status::from_str` at the boundary, before a
/// change set exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<Option<String>>,
    pub estimate: Option<i32>,
    pub cycle_id: Option<Option<String>>,
    pub parent_id: Option<Option<String>>,
    /// Replaces the whole label set.
    pub labels: Option<Vec<String>>,
}

impl IssueChanges {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.estimate.is_none()
            && self.cycle_id.is_none()
            && self.parent_id.is_none()
            && self.labels.is_none()
    }
}

/// Apply a sparse update to `issue`, stamping `updated_at` with `now`.
///
/// `updated_at` is set on every successful call, even when no business field
/// changed value. Completion bookkeeping: a transition into `Done` sets
/// `completed_at = now`; a transition out of `Done` clears it; an update
/// without a status change leaves it as-is.
///
/// # Errors
///
/// Returns `Validation` if a supplied title is empty after trimming. On
/// error the issue is left unmodified.
pub fn apply_update_at(
    issue: &mut Issue,
    changes: &IssueChanges,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(ref title) = changes.title {
        if title.trim().is_empty() {
            return Err(PulseError::validation("title", "cannot be empty"));
        }
    }

    if let Some(ref title) = changes.title {
        issue.title.clone_from(title);
    }
    if let Some(ref description) = changes.description {
        issue.description.clone_from(description);
    }
    if let Some(priority) = changes.priority {
        issue.priority = priority;
    }
    if let Some(ref assignee) = changes.assignee_id {
        issue.assignee_id.clone_from(assignee);
    }
    if let Some(estimate) = changes.estimate {
        issue.estimate = estimate;
    }
    if let Some(ref cycle_id) = changes.cycle_id {
        issue.cycle_id.clone_from(cycle_id);
    }
    if let Some(ref parent_id) = changes.parent_id {
        issue.parent_id.clone_from(parent_id);
    }
    if let Some(ref labels) = changes.labels {
        issue.labels.clone_from(labels);
    }

    if let Some(status) = changes.status {
        let was_done = issue.status.is_done();
        issue.status = status;
        if status.is_done() {
            if !was_done {
                issue.completed_at = Some(now);
            }
        } else if issue.completed_at.is_some() {
            issue.completed_at = None;
        }
    }

    issue.updated_at = now;
    Ok(())
}

/// Apply a sparse update using the current wall-clock time.
///
/// # Errors
///
/// See [`apply_update_at`].
pub fn apply_update(issue: &mut Issue, changes: &IssueChanges) -> Result<()> {
    apply_update_at(issue, changes, Utc::now())
}

/// Status-only quick-move path, stamping `updated_at` with `now`.
///
/// Behaves identically to [`apply_update_at`] restricted to the status
/// field, including the completion-timestamp rule.
///
/// # Errors
///
/// Currently infallible for well-formed input; returns `Result` for parity
/// with [`apply_update_at`].
pub fn apply_status_only_at(issue: &mut Issue, status: Status, now: DateTime<Utc>) -> Result<()> {
    apply_update_at(
        issue,
        &IssueChanges {
            status: Some(status),
            ..IssueChanges::default()
        },
        now,
    )
}

/// Status-only quick-move path using the current wall-clock time.
///
/// # Errors
///
/// See [`apply_status_only_at`].
pub fn apply_status_only(issue: &mut Issue, status: Status) -> Result<()> {
    apply_status_only_at(issue, status, Utc::now())
}
