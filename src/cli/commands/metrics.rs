//! Metrics command implementation.
//!
//! Loads the issue set scoped by workspace (and optionally cycle), runs the
//! aggregator, and prints the report. Cycle-time statistics need transition
//! history the store does not keep, so the report carries none here.

use crate::cli::MetricsArgs;
use crate::config;
use crate::error::{PulseError, Result};
use crate::metrics::MetricsReport;
use crate::storage::{EntityStore, IssueFilters};
use serde::Serialize;
use tracing::info;

/// Metrics response: the aggregate report plus its scope.
#[derive(Debug, Serialize)]
struct MetricsOutput {
    workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle_id: Option<String>,
    #[serde(flatten)]
    report: MetricsReport,
}

/// Execute the metrics command.
///
/// # Errors
///
/// Returns an error if the workspace or cycle does not exist or the store
/// cannot be read.
pub fn execute(args: &MetricsArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let store = config::open_store(cli)?;

    if store.get_workspace(&args.workspace)?.is_none() {
        return Err(PulseError::WorkspaceNotFound {
            id: args.workspace.clone(),
        });
    }
    if let Some(ref cycle_id) = args.cycle {
        if store.get_cycle(cycle_id)?.is_none() {
            return Err(PulseError::CycleNotFound {
                id: cycle_id.clone(),
            });
        }
    }

    let filters = IssueFilters {
        workspace_id: Some(args.workspace.clone()),
        cycle_id: args.cycle.clone(),
        ..IssueFilters::default()
    };
    let issues = store.list_issues(&filters)?;
    let report = MetricsReport::compute(&issues, None);
    info!(
        workspace = %args.workspace,
        issues = issues.len(),
        "computed metrics"
    );

    let output = MetricsOutput {
        workspace_id: args.workspace.clone(),
        cycle_id: args.cycle.clone(),
        report,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_report(&output);
    }
    Ok(())
}

fn print_text_report(output: &MetricsOutput) {
    let report = &output.report;
    match output.cycle_id {
        Some(ref cycle_id) => {
            println!("Metrics for {} / {}", output.workspace_id, cycle_id);
        }
        None => println!("Metrics for {}", output.workspace_id),
    }

    let counts = &report.status_counts;
    println!(
        "  issues: {} total (backlog {}, todo {}, in progress {}, done {}, canceled {})",
        counts.total, counts.backlog, counts.todo, counts.in_progress, counts.done, counts.canceled
    );

    let velocity = &report.velocity;
    println!(
        "  velocity: {}/{} pts completed ({:.1}%), carryover {}",
        velocity.points_completed,
        velocity.points_planned,
        velocity.completion_rate,
        velocity.carryover
    );

    let lead = &report.lead_time;
    if lead.count > 0 {
        println!(
            "  lead time: mean {:.1}h, p50 {:.1}h, p90 {:.1}h, p99 {:.1}h ({} completed)",
            lead.mean_hours, lead.p50_hours, lead.p90_hours, lead.p99_hours, lead.count
        );
    }

    println!(
        "  quality: {} bug(s), {:.1}% bug rate",
        report.quality.bug_count, report.quality.bug_rate
    );
}
