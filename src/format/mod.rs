//! Output structures and text rendering for command results.
//!
//! JSON output serializes the model types directly; the helpers here cover
//! the one-line text renderings and the trimmed search-hit shape.

use crate::model::{Cycle, Issue, Workspace};
use serde::Serialize;

/// A search result row: the fields the board UI cares about, not the whole
/// issue record.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub title: String,
    pub status: String,
    pub labels: Vec<String>,
    pub estimate: i32,
    pub workspace: String,
}

impl From<&Issue> for SearchHit {
    fn from(issue: &Issue) -> Self {
        Self {
            kind: "issue",
            id: issue.id.clone(),
            title: issue.title.clone(),
            status: issue.status.as_str().to_string(),
            labels: issue.labels.clone(),
            estimate: issue.estimate,
            workspace: issue.workspace_id.clone(),
        }
    }
}

/// One-line issue rendering for list/search text output.
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    let mut line = format!(
        "{} [{}] [{}] {}",
        issue.id, issue.priority, issue.status, issue.title
    );
    if issue.estimate > 0 {
        line.push_str(&format!(" ({} pts)", issue.estimate));
    }
    if !issue.labels.is_empty() {
        line.push_str(&format!(" #{}", issue.labels.join(" #")));
    }
    if let Some(ref assignee) = issue.assignee_id {
        line.push_str(&format!(" @{assignee}"));
    }
    line
}

/// One-line workspace rendering.
#[must_use]
pub fn format_workspace_line(ws: &Workspace) -> String {
    match ws.description {
        Some(ref desc) => format!("{} {} - {}", ws.id, ws.name, desc),
        None => format!("{} {}", ws.id, ws.name),
    }
}

/// One-line cycle rendering.
#[must_use]
pub fn format_cycle_line(cycle: &Cycle) -> String {
    let mut line = format!("{} [{}] {}", cycle.id, cycle.status, cycle.name);
    if let Some(start) = cycle.start_date {
        line.push_str(&format!(" {}", start.format("%Y-%m-%d")));
        if let Some(end) = cycle.end_date {
            line.push_str(&format!("..{}", end.format("%Y-%m-%d")));
        }
    }
    line
}
