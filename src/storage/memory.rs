//! In-memory storage implementation.
//!
//! A `RwLock`-guarded map per entity type. Useful for tests and ephemeral
//! sessions; semantics match the SQLite binding, including listing order
//! and last-write-wins on concurrent writes to the same record.

use crate::error::{PulseError, Result};
use crate::model::{Cycle, CycleStatus, Issue, Workspace};
use crate::storage::{EntityStore, IssueFilters};
use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Inner {
    workspaces: HashMap<String, Workspace>,
    issues: HashMap<String, Issue>,
    cycles: HashMap<String, Cycle>,
}

/// HashMap-backed storage behind a read/write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn issue_matches(issue: &Issue, filters: &IssueFilters) -> bool {
    if let Some(ref workspace_id) = filters.workspace_id {
        if issue.workspace_id != *workspace_id {
            return false;
        }
    }
    if let Some(status) = filters.status {
        if issue.status != status {
            return false;
        }
    }
    if let Some(ref cycle_id) = filters.cycle_id {
        if issue.cycle_id.as_deref() != Some(cycle_id.as_str()) {
            return false;
        }
    }
    true
}

impl EntityStore for MemoryStore {
    fn create_workspace(&mut self, ws: &Workspace) -> Result<()> {
        let mut inner = self.write();
        if inner.workspaces.contains_key(&ws.id) {
            return Err(PulseError::IdCollision { id: ws.id.clone() });
        }
        inner.workspaces.insert(ws.id.clone(), ws.clone());
        Ok(())
    }

    fn get_workspace(&self, id: &str) -> Result<Option<Workspace>> {
        Ok(self.read().workspaces.get(id).cloned())
    }

    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let mut workspaces: Vec<Workspace> = self.read().workspaces.values().cloned().collect();
        workspaces.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(workspaces)
    }

    fn update_workspace(&mut self, ws: &Workspace) -> Result<()> {
        let mut inner = self.write();
        if !inner.workspaces.contains_key(&ws.id) {
            return Err(PulseError::WorkspaceNotFound { id: ws.id.clone() });
        }
        inner.workspaces.insert(ws.id.clone(), ws.clone());
        Ok(())
    }

    fn delete_workspace(&mut self, id: &str) -> Result<()> {
        self.write().workspaces.remove(id);
        Ok(())
    }

    fn create_issue(&mut self, issue: &Issue) -> Result<()> {
        let mut inner = self.write();
        if inner.issues.contains_key(&issue.id) {
            return Err(PulseError::IdCollision {
                id: issue.id.clone(),
            });
        }
        inner.issues.insert(issue.id.clone(), issue.clone());
        Ok(())
    }

    fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        Ok(self.read().issues.get(id).cloned())
    }

    fn list_issues(&self, filters: &IssueFilters) -> Result<Vec<Issue>> {
        let mut issues: Vec<Issue> = self
            .read()
            .issues
            .values()
            .filter(|i| issue_matches(i, filters))
            .cloned()
            .collect();
        issues.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        let offset = filters.offset.unwrap_or(0);
        let issues: Vec<Issue> = match filters.limit {
            Some(limit) => issues.into_iter().skip(offset).take(limit).collect(),
            None => issues.into_iter().skip(offset).collect(),
        };
        Ok(issues)
    }

    fn update_issue(&mut self, issue: &Issue) -> Result<()> {
        let mut inner = self.write();
        if !inner.issues.contains_key(&issue.id) {
            return Err(PulseError::IssueNotFound {
                id: issue.id.clone(),
            });
        }
        inner.issues.insert(issue.id.clone(), issue.clone());
        Ok(())
    }

    fn delete_issue(&mut self, id: &str) -> Result<()> {
        self.write().issues.remove(id);
        Ok(())
    }

    fn count_issues_by_status(&self, workspace_id: &str) -> Result<BTreeMap<String, usize>> {
        let inner = self.read();
        let mut counts = BTreeMap::new();
        for issue in inner.issues.values() {
            if issue.workspace_id == workspace_id {
                *counts
                    .entry(issue.status.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn count_cycle_issues(&self, workspace_id: &str, cycle_id: &str) -> Result<(usize, usize)> {
        let inner = self.read();
        let mut total = 0;
        let mut done = 0;
        for issue in inner.issues.values() {
            if issue.workspace_id == workspace_id
                && issue.cycle_id.as_deref() == Some(cycle_id)
            {
                total += 1;
                if issue.status.is_done() {
                    done += 1;
                }
            }
        }
        Ok((total, done))
    }

    fn create_cycle(&mut self, cycle: &Cycle) -> Result<()> {
        let mut inner = self.write();
        if inner.cycles.contains_key(&cycle.id) {
            return Err(PulseError::IdCollision {
                id: cycle.id.clone(),
            });
        }
        inner.cycles.insert(cycle.id.clone(), cycle.clone());
        Ok(())
    }

    fn get_cycle(&self, id: &str) -> Result<Option<Cycle>> {
        Ok(self.read().cycles.get(id).cloned())
    }

    fn list_cycles(&self, workspace_id: &str) -> Result<Vec<Cycle>> {
        let mut cycles: Vec<Cycle> = self
            .read()
            .cycles
            .values()
            .filter(|c| c.workspace_id == workspace_id)
            .cloned()
            .collect();
        cycles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cycles)
    }

    fn update_cycle(&mut self, cycle: &Cycle) -> Result<()> {
        let mut inner = self.write();
        if !inner.cycles.contains_key(&cycle.id) {
            return Err(PulseError::CycleNotFound {
                id: cycle.id.clone(),
            });
        }
        inner.cycles.insert(cycle.id.clone(), cycle.clone());
        Ok(())
    }

    fn delete_cycle(&mut self, id: &str) -> Result<()> {
        self.write().cycles.remove(id);
        Ok(())
    }

    fn active_cycle(&self, workspace_id: &str) -> Result<Option<Cycle>> {
        Ok(self
            .read()
            .cycles
            .values()
            .find(|c| c.workspace_id == workspace_id && c.status == CycleStatus::Active)
            .cloned())
    }

    fn upcoming_cycles(&self, workspace_id: &str) -> Result<Vec<Cycle>> {
        let mut cycles: Vec<Cycle> = self
            .read()
            .cycles
            .values()
            .filter(|c| c.workspace_id == workspace_id && c.status == CycleStatus::Upcoming)
            .cloned()
            .collect();
        cycles.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(cycles)
    }
}
