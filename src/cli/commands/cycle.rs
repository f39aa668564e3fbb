//! Cycle (sprint) management commands.

use crate::cli::CycleCommands;
use crate::config;
use crate::error::{PulseError, Result};
use crate::format::format_cycle_line;
use crate::model::{Cycle, CycleStatus};
use crate::storage::EntityStore;
use crate::util::id::new_cycle_id;
use crate::util::time::parse_flexible_timestamp;
use chrono::{DateTime, Utc};
use tracing::info;

/// Execute a cycle subcommand.
///
/// # Errors
///
/// Returns an error if a referenced workspace/cycle does not exist, a date
/// or status value is invalid, or the store fails.
pub fn execute(command: &CycleCommands, json: bool, cli: &config::CliOverrides) -> Result<()> {
    match command {
        CycleCommands::Create {
            name,
            workspace,
            start,
            end,
            status,
        } => create(
            name,
            workspace,
            start.as_deref(),
            end.as_deref(),
            status.as_deref(),
            json,
            cli,
        ),
        CycleCommands::List { workspace } => list(workspace, json, cli),
        CycleCommands::Show { id } => show(id, json, cli),
        CycleCommands::Update {
            id,
            name,
            status,
            start,
            end,
        } => update(
            id,
            name.as_deref(),
            status.as_deref(),
            start.as_deref(),
            end.as_deref(),
            json,
            cli,
        ),
        CycleCommands::Delete { id } => delete(id, json, cli),
        CycleCommands::Active { workspace } => active(workspace, json, cli),
        CycleCommands::Upcoming { workspace } => upcoming(workspace, json, cli),
    }
}

fn parse_date(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_flexible_timestamp(v, field)).transpose()
}

fn create(
    name: &str,
    workspace: &str,
    start: Option<&str>,
    end: Option<&str>,
    status: Option<&str>,
    json: bool,
    cli: &config::CliOverrides,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PulseError::validation("name", "cannot be empty"));
    }
    let status: CycleStatus = status.map(str::parse).transpose()?.unwrap_or_default();

    let mut store = config::open_store(cli)?;
    if store.get_workspace(workspace)?.is_none() {
        return Err(PulseError::WorkspaceNotFound {
            id: workspace.to_string(),
        });
    }

    let cycle = Cycle {
        id: new_cycle_id(),
        workspace_id: workspace.to_string(),
        name: name.to_string(),
        start_date: parse_date(start, "start")?,
        end_date: parse_date(end, "end")?,
        status,
        created_at: Utc::now(),
    };
    store.create_cycle(&cycle)?;
    info!(id = %cycle.id, workspace = %workspace, "created cycle");

    if json {
        println!("{}", serde_json::to_string_pretty(&cycle)?);
    } else {
        println!("Created cycle {}: {}", cycle.id, cycle.name);
    }
    Ok(())
}

fn list(workspace: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;
    let cycles = store.list_cycles(workspace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cycles)?);
    } else if cycles.is_empty() {
        println!("No cycles found");
    } else {
        for cycle in &cycles {
            println!("{}", format_cycle_line(cycle));
        }
    }
    Ok(())
}

fn show(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;
    let cycle = store
        .get_cycle(id)?
        .ok_or_else(|| PulseError::CycleNotFound { id: id.to_string() })?;
    let (total, done) = store.count_cycle_issues(&cycle.workspace_id, &cycle.id)?;

    if json {
        let output = serde_json::json!({
            "cycle": cycle,
            "issue_count": total,
            "done_count": done,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", format_cycle_line(&cycle));
        println!("  issues: {done}/{total} done");
    }
    Ok(())
}

fn update(
    id: &str,
    name: Option<&str>,
    status: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    json: bool,
    cli: &config::CliOverrides,
) -> Result<()> {
    let mut store = config::open_store(cli)?;
    let mut cycle = store
        .get_cycle(id)?
        .ok_or_else(|| PulseError::CycleNotFound { id: id.to_string() })?;

    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err(PulseError::validation("name", "cannot be empty"));
        }
        cycle.name = name.to_string();
    }
    if let Some(status) = status {
        cycle.status = status.parse()?;
    }
    if let Some(start) = parse_date(start, "start")? {
        cycle.start_date = Some(start);
    }
    if let Some(end) = parse_date(end, "end")? {
        cycle.end_date = Some(end);
    }

    store.update_cycle(&cycle)?;
    info!(id = %cycle.id, "updated cycle");

    if json {
        println!("{}", serde_json::to_string_pretty(&cycle)?);
    } else {
        println!("Updated cycle {}: {}", cycle.id, cycle.name);
    }
    Ok(())
}

fn delete(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut store = config::open_store(cli)?;
    let cycle = store
        .get_cycle(id)?
        .ok_or_else(|| PulseError::CycleNotFound { id: id.to_string() })?;

    store.delete_cycle(id)?;
    info!(id = %id, "deleted cycle");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "deleted": id }))?
        );
    } else {
        println!("Deleted cycle {}: {}", cycle.id, cycle.name);
    }
    Ok(())
}

fn active(workspace: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;
    let cycle = store.active_cycle(workspace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cycle)?);
    } else {
        match cycle {
            Some(ref cycle) => println!("{}", format_cycle_line(cycle)),
            None => println!("No active cycle"),
        }
    }
    Ok(())
}

fn upcoming(workspace: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;
    let cycles = store.upcoming_cycles(workspace)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cycles)?);
    } else if cycles.is_empty() {
        println!("No upcoming cycles");
    } else {
        for cycle in &cycles {
            println!("{}", format_cycle_line(cycle));
        }
    }
    Ok(())
}
