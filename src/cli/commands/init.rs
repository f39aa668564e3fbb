//! Init command implementation.

use crate::config;
use crate::error::Result;
use crate::storage::EntityStore;
use serde_json::json;
use tracing::info;

/// Execute the init command.
///
/// Creates the data directory and database, running migrations and seeding
/// the default workspace. Safe to re-run.
///
/// # Errors
///
/// Returns an error if the directory or database cannot be created.
pub fn execute(json: bool, cli: &config::CliOverrides) -> Result<()> {
    let (store, path) = config::init_store(cli)?;
    let workspaces = store.list_workspaces()?;

    info!(path = %path.display(), "initialized pulse database");

    if json {
        let output = json!({
            "database": path,
            "workspaces": workspaces.len(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Initialized pulse database at {}", path.display());
        for ws in &workspaces {
            println!("  workspace: {} ({})", ws.name, ws.id);
        }
    }
    Ok(())
}
