//! Durable keyed storage for Pulse entities.
//!
//! The core (lifecycle, metrics, search) never touches storage directly; a
//! request handler loads entities through [`EntityStore`], runs the core,
//! and persists the result. Two bindings satisfy the trait: [`SqliteStore`]
//! for durable on-disk state and [`MemoryStore`] for tests and ephemeral
//! sessions.
//!
//! Concurrency: each binding serializes concurrent writes to the same
//! record (SQLite immediate transactions, or a read/write lock). Beyond
//! that, last-write-wins at the record level.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL, apply_schema};
pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::model::{Cycle, Issue, Status, Workspace};
use std::collections::BTreeMap;

/// Filter options for listing issues.
#[derive(Debug, Clone, Default)]
pub struct IssueFilters {
    pub workspace_id: Option<String>,
    pub status: Option<Status>,
    pub cycle_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl IssueFilters {
    /// Filters scoped to one workspace, everything else unset.
    #[must_use]
    pub fn workspace(id: &str) -> Self {
        Self {
            workspace_id: Some(id.to_string()),
            ..Self::default()
        }
    }
}

/// Keyed CRUD storage per entity type.
///
/// Listings of issues are ordered by `priority ASC, created_at DESC`.
/// Update operations are full-record puts; they fail with the matching
/// NotFound error when the record does not exist. Deletes are idempotent.
pub trait EntityStore {
    // === Workspaces ===
    fn create_workspace(&mut self, ws: &Workspace) -> Result<()>;
    fn get_workspace(&self, id: &str) -> Result<Option<Workspace>>;
    fn list_workspaces(&self) -> Result<Vec<Workspace>>;
    fn update_workspace(&mut self, ws: &Workspace) -> Result<()>;
    /// Does not cascade to the workspace's issues or cycles.
    fn delete_workspace(&mut self, id: &str) -> Result<()>;

    // === Issues ===
    fn create_issue(&mut self, issue: &Issue) -> Result<()>;
    fn get_issue(&self, id: &str) -> Result<Option<Issue>>;
    fn list_issues(&self, filters: &IssueFilters) -> Result<Vec<Issue>>;
    fn update_issue(&mut self, issue: &Issue) -> Result<()>;
    fn delete_issue(&mut self, id: &str) -> Result<()>;

    /// Per-status issue counts for one workspace, keyed by status string.
    fn count_issues_by_status(&self, workspace_id: &str) -> Result<BTreeMap<String, usize>>;

    /// `(total, done)` counts for the issues scoped to one cycle.
    fn count_cycle_issues(&self, workspace_id: &str, cycle_id: &str) -> Result<(usize, usize)>;

    // === Cycles ===
    fn create_cycle(&mut self, cycle: &Cycle) -> Result<()>;
    fn get_cycle(&self, id: &str) -> Result<Option<Cycle>>;
    /// Cycles for a workspace, newest first.
    fn list_cycles(&self, workspace_id: &str) -> Result<Vec<Cycle>>;
    fn update_cycle(&mut self, cycle: &Cycle) -> Result<()>;
    fn delete_cycle(&mut self, id: &str) -> Result<()>;

    /// The active cycle for a workspace, if any.
    fn active_cycle(&self, workspace_id: &str) -> Result<Option<Cycle>>;

    /// Upcoming cycles for a workspace, oldest first.
    fn upcoming_cycles(&self, workspace_id: &str) -> Result<Vec<Cycle>>;
}
