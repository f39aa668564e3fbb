//! Search command implementation.

use crate::cli::SearchArgs;
use crate::config;
use crate::error::Result;
use crate::format::{SearchHit, format_issue_line};
use crate::model::Status;
use crate::search::{self, SearchFilters};
use crate::storage::{EntityStore, IssueFilters};
use tracing::debug;

/// Execute the search command.
///
/// Loads the workspace's issues and evaluates the query and filters over
/// them, preserving the store's ordering.
///
/// # Errors
///
/// Returns an error if a status value (explicit or `status:`-prefixed) is
/// invalid or the store cannot be read.
pub fn execute(args: &SearchArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let status: Option<Status> = args.status.as_deref().map(str::parse).transpose()?;
    let filters = SearchFilters::parse(
        &args.query,
        status,
        args.label.clone(),
        args.assignee.clone(),
    )?;
    debug!(?filters, workspace = %args.workspace, "searching issues");

    let store = config::open_store(cli)?;
    let issues = store.list_issues(&IssueFilters::workspace(&args.workspace))?;
    let matches: Vec<_> = search::search(&issues, &filters).collect();

    if json {
        let hits: Vec<SearchHit> = matches.iter().map(|i| SearchHit::from(*i)).collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        println!("Found {} issue(s)", matches.len());
        for issue in &matches {
            println!("{}", format_issue_line(issue));
        }
    }
    Ok(())
}
