//! Workspace management commands.

use crate::cli::WorkspaceCommands;
use crate::config;
use crate::error::{PulseError, Result};
use crate::format::format_workspace_line;
use crate::model::Workspace;
use crate::storage::EntityStore;
use crate::util::id::new_workspace_id;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::info;

/// Execute a workspace subcommand.
///
/// # Errors
///
/// Returns an error if the workspace does not exist (show/update), a
/// settings entry is malformed, or the store fails.
pub fn execute(command: &WorkspaceCommands, json: bool, cli: &config::CliOverrides) -> Result<()> {
    match command {
        WorkspaceCommands::Create {
            name,
            description,
            set,
        } => create(name, description.as_deref(), set, json, cli),
        WorkspaceCommands::List => list(json, cli),
        WorkspaceCommands::Show { id } => show(id, json, cli),
        WorkspaceCommands::Update {
            id,
            name,
            description,
            set,
        } => update(id, name.as_deref(), description.as_deref(), set, json, cli),
        WorkspaceCommands::Delete { id } => delete(id, json, cli),
    }
}

fn parse_settings(entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut settings = BTreeMap::new();
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| PulseError::validation("set", "expected key=value"))?;
        settings.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(settings)
}

fn create(
    name: &str,
    description: Option<&str>,
    set: &[String],
    json: bool,
    cli: &config::CliOverrides,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PulseError::validation("name", "cannot be empty"));
    }

    let mut store = config::open_store(cli)?;
    let now = Utc::now();
    let ws = Workspace {
        id: new_workspace_id(),
        name: name.to_string(),
        description: description.map(ToString::to_string),
        settings: parse_settings(set)?,
        created_at: now,
        updated_at: now,
    };
    store.create_workspace(&ws)?;
    info!(id = %ws.id, "created workspace");

    if json {
        println!("{}", serde_json::to_string_pretty(&ws)?);
    } else {
        println!("Created workspace {}: {}", ws.id, ws.name);
    }
    Ok(())
}

fn list(json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;
    let workspaces = store.list_workspaces()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workspaces)?);
    } else {
        for ws in &workspaces {
            println!("{}", format_workspace_line(ws));
        }
    }
    Ok(())
}

fn show(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;
    let ws = store
        .get_workspace(id)?
        .ok_or_else(|| PulseError::WorkspaceNotFound { id: id.to_string() })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ws)?);
    } else {
        println!("{}", format_workspace_line(&ws));
        for (key, value) in &ws.settings {
            println!("  {key} = {value}");
        }
    }
    Ok(())
}

fn update(
    id: &str,
    name: Option<&str>,
    description: Option<&str>,
    set: &[String],
    json: bool,
    cli: &config::CliOverrides,
) -> Result<()> {
    let mut store = config::open_store(cli)?;
    let mut ws = store
        .get_workspace(id)?
        .ok_or_else(|| PulseError::WorkspaceNotFound { id: id.to_string() })?;

    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(PulseError::validation("name", "cannot be empty"));
        }
        ws.name = name.to_string();
    }
    if let Some(description) = description {
        ws.description = if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        };
    }
    for (key, value) in parse_settings(set)? {
        ws.settings.insert(key, value);
    }
    ws.updated_at = Utc::now();

    store.update_workspace(&ws)?;
    info!(id = %ws.id, "updated workspace");

    if json {
        println!("{}", serde_json::to_string_pretty(&ws)?);
    } else {
        println!("Updated workspace {}: {}", ws.id, ws.name);
    }
    Ok(())
}

fn delete(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut store = config::open_store(cli)?;
    let ws = store
        .get_workspace(id)?
        .ok_or_else(|| PulseError::WorkspaceNotFound { id: id.to_string() })?;

    // Issues keep their workspace_id; removal is not cascaded.
    store.delete_workspace(id)?;
    info!(id = %id, "deleted workspace");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "deleted": id }))?
        );
    } else {
        println!("Deleted workspace {}: {}", ws.id, ws.name);
    }
    Ok(())
}
