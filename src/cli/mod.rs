//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Linear-style issue tracker with velocity analytics (`SQLite`)
#[derive(Parser, Debug)]
#[command(name = "pulse", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: .pulse/pulse.db, or $PULSE_DB)
    #[arg(long, global = true, env = "PULSE_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the pulse data directory and database
    Init,

    /// Create a new issue
    Create(CreateArgs),

    /// Update fields on an issue
    Update(UpdateArgs),

    /// Move an issue to another status
    #[command(name = "move")]
    Move(MoveArgs),

    /// Mark an issue done
    Close(IdArg),

    /// Send a done issue back to the backlog
    Reopen(IdArg),

    /// List issues
    List(ListArgs),

    /// Show issue details
    Show {
        /// Issue IDs
        ids: Vec<String>,
    },

    /// Delete an issue
    Delete(IdArg),

    /// Search issues by text and filters
    Search(SearchArgs),

    /// Show workspace metrics (velocity, lead time, quality)
    Metrics(MetricsArgs),

    /// Manage workspaces
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },

    /// Manage cycles (sprints)
    Cycle {
        #[command(subcommand)]
        command: CycleCommands,
    },

    /// Print the version
    Version,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Owning workspace
    #[arg(long, short = 'w', default_value = "default")]
    pub workspace: String,

    /// Description text
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Initial status (default: backlog)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Priority: 0-4 or none/urgent/high/medium/low
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Assignee identifier
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Story-point estimate
    #[arg(long, short = 'e', value_parser = clap::value_parser!(i32).range(0..))]
    pub estimate: Option<i32>,

    /// Cycle to scope the issue to
    #[arg(long)]
    pub cycle: Option<String>,

    /// Parent issue (for sub-issues)
    #[arg(long)]
    pub parent: Option<String>,

    /// Comma-separated labels
    #[arg(long, short = 'l')]
    pub labels: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Issue ID
    pub id: String,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description (empty string clears)
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// New priority
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// New assignee (empty string clears)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// New estimate
    #[arg(long, short = 'e', value_parser = clap::value_parser!(i32).range(0..))]
    pub estimate: Option<i32>,

    /// New cycle (empty string clears)
    #[arg(long)]
    pub cycle: Option<String>,

    /// New parent issue (empty string clears)
    #[arg(long)]
    pub parent: Option<String>,

    /// Replace the label set (comma-separated)
    #[arg(long)]
    pub labels: Option<String>,

    /// Add a label (repeatable)
    #[arg(long)]
    pub add_label: Vec<String>,

    /// Remove a label (repeatable)
    #[arg(long)]
    pub remove_label: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Issue ID
    pub id: String,

    /// Target status
    pub status: String,
}

#[derive(Args, Debug)]
pub struct IdArg {
    /// Issue ID
    pub id: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Workspace to list
    #[arg(long, short = 'w', default_value = "default")]
    pub workspace: String,

    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Filter by cycle
    #[arg(long)]
    pub cycle: Option<String>,

    /// Maximum number of issues
    #[arg(long)]
    pub limit: Option<usize>,

    /// Number of issues to skip
    #[arg(long)]
    pub offset: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Query text; `status:`, `label:`, and `assignee:` prefixes are
    /// recognized
    #[arg(default_value = "")]
    pub query: String,

    /// Workspace to search
    #[arg(long, short = 'w', default_value = "default")]
    pub workspace: String,

    /// Filter by exact status (wins over a `status:` prefix)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Filter by label substring (wins over a `label:` prefix)
    #[arg(long, short = 'l')]
    pub label: Option<String>,

    /// Filter by exact assignee (wins over an `assignee:` prefix)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct MetricsArgs {
    /// Workspace to report on
    #[arg(long, short = 'w', default_value = "default")]
    pub workspace: String,

    /// Restrict the scope to one cycle
    #[arg(long)]
    pub cycle: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommands {
    /// Create a workspace
    Create {
        /// Workspace name
        name: String,

        /// Description text
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Settings entries as key=value (repeatable)
        #[arg(long)]
        set: Vec<String>,
    },

    /// List workspaces
    List,

    /// Show one workspace
    Show {
        /// Workspace ID
        id: String,
    },

    /// Update a workspace
    Update {
        /// Workspace ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Settings entries as key=value (repeatable)
        #[arg(long)]
        set: Vec<String>,
    },

    /// Delete a workspace (does not delete its issues)
    Delete {
        /// Workspace ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CycleCommands {
    /// Create a cycle
    Create {
        /// Cycle name
        name: String,

        /// Owning workspace
        #[arg(long, short = 'w', default_value = "default")]
        workspace: String,

        /// Start date (2026-01-15, +2d, or RFC3339)
        #[arg(long)]
        start: Option<String>,

        /// End date
        #[arg(long)]
        end: Option<String>,

        /// Initial status (default: upcoming)
        #[arg(long, short = 's')]
        status: Option<String>,
    },

    /// List cycles for a workspace
    List {
        /// Workspace
        #[arg(long, short = 'w', default_value = "default")]
        workspace: String,
    },

    /// Show one cycle with its issue counts
    Show {
        /// Cycle ID
        id: String,
    },

    /// Update a cycle
    Update {
        /// Cycle ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New status
        #[arg(long, short = 's')]
        status: Option<String>,

        /// New start date
        #[arg(long)]
        start: Option<String>,

        /// New end date
        #[arg(long)]
        end: Option<String>,
    },

    /// Delete a cycle
    Delete {
        /// Cycle ID
        id: String,
    },

    /// Show the active cycle
    Active {
        /// Workspace
        #[arg(long, short = 'w', default_value = "default")]
        workspace: String,
    },

    /// List upcoming cycles
    Upcoming {
        /// Workspace
        #[arg(long, short = 'w', default_value = "default")]
        workspace: String,
    },
}
