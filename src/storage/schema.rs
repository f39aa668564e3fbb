//! Database schema definitions and migration logic.

use chrono::Utc;
use rusqlite::Connection;

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the pulse database.
///
/// Labels and workspace settings are stored as JSON text columns;
/// timestamps are RFC3339 text.
pub const SCHEMA_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS workspaces (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        settings TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS issues (
        id TEXT PRIMARY KEY,
        workspace_id TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        status TEXT NOT NULL DEFAULT 'backlog',
        priority INTEGER NOT NULL DEFAULT 0,
        assignee_id TEXT,
        estimate INTEGER NOT NULL DEFAULT 0,
        cycle_id TEXT,
        labels TEXT NOT NULL DEFAULT '[]',
        parent_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        completed_at TEXT,
        FOREIGN KEY (workspace_id) REFERENCES workspaces(id),
        CHECK (length(title) >= 1),
        CHECK (estimate >= 0)
    );

    CREATE INDEX IF NOT EXISTS idx_issues_workspace ON issues(workspace_id);
    CREATE INDEX IF NOT EXISTS idx_issues_status ON issues(status);
    CREATE INDEX IF NOT EXISTS idx_issues_assignee ON issues(assignee_id);
    CREATE INDEX IF NOT EXISTS idx_issues_cycle ON issues(cycle_id);

    CREATE TABLE IF NOT EXISTS cycles (
        id TEXT PRIMARY KEY,
        workspace_id TEXT NOT NULL,
        name TEXT NOT NULL,
        start_date TEXT,
        end_date TEXT,
        status TEXT NOT NULL DEFAULT 'upcoming',
        created_at TEXT NOT NULL,
        FOREIGN KEY (workspace_id) REFERENCES workspaces(id)
    );

    CREATE INDEX IF NOT EXISTS idx_cycles_workspace ON cycles(workspace_id);
    CREATE INDEX IF NOT EXISTS idx_cycles_status ON cycles(status);

    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply pragmas and the schema, and seed the default workspace.
///
/// Idempotent: safe to run on every open.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    // Foreign keys stay declarative only: workspace deletion must not be
    // blocked by (or cascade to) the issues that reference it.
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', ?)",
        [CURRENT_SCHEMA_VERSION.to_string()],
    )?;

    ensure_default_workspace(conn)?;
    Ok(())
}

/// Create the `default` workspace when no workspace exists yet.
fn ensure_default_workspace(conn: &Connection) -> rusqlite::Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM workspaces", [], |row| row.get(0))?;
    if count == 0 {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO workspaces (id, name, description, settings, created_at, updated_at)
             VALUES (?, ?, ?, '{}', ?, ?)",
            rusqlite::params![
                "default",
                "Main Workspace",
                "Default workspace for tracking",
                now,
                now
            ],
        )?;
    }
    Ok(())
}
