#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use pulse_rust::model::{Issue, Priority, Status};

/// Base time for test fixtures; fixed for deterministic assertions.
pub fn base_time() -> DateTime<Utc> {
    Utc.timestamp_opt(1_735_689_600, 0).unwrap() // 2025-01-01 00:00:00 UTC
}

/// A minimal backlog issue in the default workspace.
pub fn issue(id: &str, title: &str) -> Issue {
    let base = base_time();
    Issue {
        id: id.to_string(),
        workspace_id: "default".to_string(),
        title: title.to_string(),
        description: None,
        status: Status::Backlog,
        priority: Priority::MEDIUM,
        assignee_id: None,
        estimate: 0,
        cycle_id: None,
        labels: vec![],
        parent_id: None,
        created_at: base,
        updated_at: base,
        completed_at: None,
    }
}

/// An issue already in `done`, completed `hours_to_complete` after creation.
pub fn done_issue(id: &str, title: &str, hours_to_complete: i64) -> Issue {
    let mut i = issue(id, title);
    i.status = Status::Done;
    i.completed_at = Some(i.created_at + Duration::hours(hours_to_complete));
    i.updated_at = i.completed_at.unwrap();
    i
}

/// An issue with status, estimate, and labels set.
pub fn classified_issue(id: &str, status: Status, estimate: i32, labels: &[&str]) -> Issue {
    let mut i = issue(id, id);
    i.status = status;
    i.estimate = estimate;
    i.labels = labels.iter().map(ToString::to_string).collect();
    if status == Status::Done {
        i.completed_at = Some(i.created_at + Duration::hours(1));
    }
    i
}
