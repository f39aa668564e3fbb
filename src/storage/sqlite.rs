//! `SQLite` storage implementation.

use crate::error::{PulseError, Result};
use crate::model::{Cycle, CycleStatus, Issue, Workspace};
use crate::storage::schema::apply_schema;
use crate::storage::{EntityStore, IssueFilters};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

const ISSUE_COLUMNS: &str = "id, workspace_id, title, description, status, priority, \
     assignee_id, estimate, cycle_id, labels, parent_id, created_at, updated_at, completed_at";

const CYCLE_COLUMNS: &str = "id, workspace_id, name, start_date, end_date, status, created_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a connection to the database at the given path, applying the
    /// schema if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(30_000))?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&naive);
    }
    Utc::now()
}

fn map_issue_row(row: &Row<'_>) -> rusqlite::Result<Issue> {
    let status_str: String = row.get(4)?;
    let labels_json: String = row.get(9)?;
    let created_at: String = row.get(11)?;
    let updated_at: String = row.get(12)?;
    let completed_at: Option<String> = row.get(13)?;

    Ok(Issue {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: status_str.parse().unwrap_or_default(),
        priority: crate::model::Priority(row.get(5)?),
        assignee_id: row.get(6)?,
        estimate: row.get(7)?,
        cycle_id: row.get(8)?,
        labels: serde_json::from_str(&labels_json).unwrap_or_default(),
        parent_id: row.get(10)?,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
        completed_at: completed_at.map(|s| parse_datetime(&s)),
    })
}

fn map_workspace_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    let settings_json: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;
    Ok(Workspace {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        settings: serde_json::from_str(&settings_json).unwrap_or_default(),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

fn map_cycle_row(row: &Row<'_>) -> rusqlite::Result<Cycle> {
    let start_date: Option<String> = row.get(3)?;
    let end_date: Option<String> = row.get(4)?;
    let status_str: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Cycle {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        name: row.get(2)?,
        start_date: start_date.map(|s| parse_datetime(&s)),
        end_date: end_date.map(|s| parse_datetime(&s)),
        status: status_str.parse().unwrap_or(CycleStatus::Upcoming),
        created_at: parse_datetime(&created_at),
    })
}

impl EntityStore for SqliteStore {
    fn create_workspace(&mut self, ws: &Workspace) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let exists: Option<String> = tx
            .query_row("SELECT id FROM workspaces WHERE id = ?", [&ws.id], |r| {
                r.get(0)
            })
            .optional()?;
        if exists.is_some() {
            return Err(PulseError::IdCollision { id: ws.id.clone() });
        }
        tx.execute(
            "INSERT INTO workspaces (id, name, description, settings, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                ws.id,
                ws.name,
                ws.description,
                serde_json::to_string(&ws.settings)?,
                ws.created_at.to_rfc3339(),
                ws.updated_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_workspace(&self, id: &str) -> Result<Option<Workspace>> {
        let ws = self
            .conn
            .query_row(
                "SELECT id, name, description, settings, created_at, updated_at
                 FROM workspaces WHERE id = ?",
                [id],
                map_workspace_row,
            )
            .optional()?;
        Ok(ws)
    }

    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, settings, created_at, updated_at
             FROM workspaces ORDER BY created_at DESC",
        )?;
        let rows = stmt.query_map([], map_workspace_row)?;
        let mut workspaces = Vec::new();
        for row in rows {
            workspaces.push(row?);
        }
        Ok(workspaces)
    }

    fn update_workspace(&mut self, ws: &Workspace) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE workspaces SET name = ?, description = ?, settings = ?, updated_at = ?
             WHERE id = ?",
            rusqlite::params![
                ws.name,
                ws.description,
                serde_json::to_string(&ws.settings)?,
                ws.updated_at.to_rfc3339(),
                ws.id,
            ],
        )?;
        if changed == 0 {
            return Err(PulseError::WorkspaceNotFound { id: ws.id.clone() });
        }
        Ok(())
    }

    fn delete_workspace(&mut self, id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM workspaces WHERE id = ?", [id])?;
        Ok(())
    }

    fn create_issue(&mut self, issue: &Issue) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let exists: Option<String> = tx
            .query_row("SELECT id FROM issues WHERE id = ?", [&issue.id], |r| {
                r.get(0)
            })
            .optional()?;
        if exists.is_some() {
            return Err(PulseError::IdCollision {
                id: issue.id.clone(),
            });
        }
        tx.execute(
            "INSERT INTO issues (
                id, workspace_id, title, description, status, priority, assignee_id,
                estimate, cycle_id, labels, parent_id, created_at, updated_at, completed_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                issue.id,
                issue.workspace_id,
                issue.title,
                issue.description,
                issue.status.as_str(),
                issue.priority.0,
                issue.assignee_id,
                issue.estimate,
                issue.cycle_id,
                serde_json::to_string(&issue.labels)?,
                issue.parent_id,
                issue.created_at.to_rfc3339(),
                issue.updated_at.to_rfc3339(),
                issue.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?");
        let issue = self.conn.query_row(&sql, [id], map_issue_row).optional()?;
        Ok(issue)
    }

    fn list_issues(&self, filters: &IssueFilters) -> Result<Vec<Issue>> {
        let mut sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref workspace_id) = filters.workspace_id {
            sql.push_str(" AND workspace_id = ?");
            params.push(Box::new(workspace_id.clone()));
        }
        if let Some(status) = filters.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str().to_string()));
        }
        if let Some(ref cycle_id) = filters.cycle_id {
            sql.push_str(" AND cycle_id = ?");
            params.push(Box::new(cycle_id.clone()));
        }

        sql.push_str(" ORDER BY priority ASC, created_at DESC");

        if let Some(limit) = filters.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }
        if let Some(offset) = filters.offset {
            // OFFSET requires a LIMIT clause in SQLite
            if filters.limit.is_none() {
                sql.push_str(" LIMIT -1");
            }
            sql.push_str(" OFFSET ?");
            params.push(Box::new(offset as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), map_issue_row)?;
        let mut issues = Vec::new();
        for row in rows {
            issues.push(row?);
        }
        Ok(issues)
    }

    fn update_issue(&mut self, issue: &Issue) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE issues SET
                workspace_id = ?, title = ?, description = ?, status = ?, priority = ?,
                assignee_id = ?, estimate = ?, cycle_id = ?, labels = ?, parent_id = ?,
                updated_at = ?, completed_at = ?
             WHERE id = ?",
            rusqlite::params![
                issue.workspace_id,
                issue.title,
                issue.description,
                issue.status.as_str(),
                issue.priority.0,
                issue.assignee_id,
                issue.estimate,
                issue.cycle_id,
                serde_json::to_string(&issue.labels)?,
                issue.parent_id,
                issue.updated_at.to_rfc3339(),
                issue.completed_at.map(|dt| dt.to_rfc3339()),
                issue.id,
            ],
        )?;
        if changed == 0 {
            return Err(PulseError::IssueNotFound {
                id: issue.id.clone(),
            });
        }
        Ok(())
    }

    fn delete_issue(&mut self, id: &str) -> Result<()> {
        self.conn.execute("DELETE FROM issues WHERE id = ?", [id])?;
        Ok(())
    }

    fn count_issues_by_status(&self, workspace_id: &str) -> Result<BTreeMap<String, usize>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM issues WHERE workspace_id = ? GROUP BY status",
        )?;
        let rows = stmt.query_map([workspace_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;
        let mut counts = BTreeMap::new();
        for row in rows {
            let (status, count) = row?;
            counts.insert(status, usize::try_from(count).unwrap_or(0));
        }
        Ok(counts)
    }

    fn count_cycle_issues(&self, workspace_id: &str, cycle_id: &str) -> Result<(usize, usize)> {
        let (total, done): (i64, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END)
             FROM issues WHERE workspace_id = ? AND cycle_id = ?",
            [workspace_id, cycle_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((
            usize::try_from(total).unwrap_or(0),
            usize::try_from(done.unwrap_or(0)).unwrap_or(0),
        ))
    }

    fn create_cycle(&mut self, cycle: &Cycle) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let exists: Option<String> = tx
            .query_row("SELECT id FROM cycles WHERE id = ?", [&cycle.id], |r| {
                r.get(0)
            })
            .optional()?;
        if exists.is_some() {
            return Err(PulseError::IdCollision {
                id: cycle.id.clone(),
            });
        }
        tx.execute(
            "INSERT INTO cycles (id, workspace_id, name, start_date, end_date, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                cycle.id,
                cycle.workspace_id,
                cycle.name,
                cycle.start_date.map(|dt| dt.to_rfc3339()),
                cycle.end_date.map(|dt| dt.to_rfc3339()),
                cycle.status.as_str(),
                cycle.created_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_cycle(&self, id: &str) -> Result<Option<Cycle>> {
        let sql = format!("SELECT {CYCLE_COLUMNS} FROM cycles WHERE id = ?");
        let cycle = self.conn.query_row(&sql, [id], map_cycle_row).optional()?;
        Ok(cycle)
    }

    fn list_cycles(&self, workspace_id: &str) -> Result<Vec<Cycle>> {
        let sql = format!(
            "SELECT {CYCLE_COLUMNS} FROM cycles WHERE workspace_id = ? ORDER BY created_at DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([workspace_id], map_cycle_row)?;
        let mut cycles = Vec::new();
        for row in rows {
            cycles.push(row?);
        }
        Ok(cycles)
    }

    fn update_cycle(&mut self, cycle: &Cycle) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE cycles SET name = ?, start_date = ?, end_date = ?, status = ?
             WHERE id = ?",
            rusqlite::params![
                cycle.name,
                cycle.start_date.map(|dt| dt.to_rfc3339()),
                cycle.end_date.map(|dt| dt.to_rfc3339()),
                cycle.status.as_str(),
                cycle.id,
            ],
        )?;
        if changed == 0 {
            return Err(PulseError::CycleNotFound {
                id: cycle.id.clone(),
            });
        }
        Ok(())
    }

    fn delete_cycle(&mut self, id: &str) -> Result<()> {
        self.conn.execute("DELETE FROM cycles WHERE id = ?", [id])?;
        Ok(())
    }

    fn active_cycle(&self, workspace_id: &str) -> Result<Option<Cycle>> {
        let sql = format!(
            "SELECT {CYCLE_COLUMNS} FROM cycles
             WHERE workspace_id = ? AND status = 'active' LIMIT 1"
        );
        let cycle = self
            .conn
            .query_row(&sql, [workspace_id], map_cycle_row)
            .optional()?;
        Ok(cycle)
    }

    fn upcoming_cycles(&self, workspace_id: &str) -> Result<Vec<Cycle>> {
        let sql = format!(
            "SELECT {CYCLE_COLUMNS} FROM cycles
             WHERE workspace_id = ? AND status = 'upcoming' ORDER BY created_at ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([workspace_id], map_cycle_row)?;
        let mut cycles = Vec::new();
        for row in rows {
            cycles.push(row?);
        }
        Ok(cycles)
    }
}
