//! Error types and handling for `pulse_rust`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration at the edges
//! - Provides recovery hints for user-facing errors
//! - Validation failures are plain values returned to the caller; the core
//!   never logs or retries

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `pulse_rust` operations.
#[derive(Error, Debug)]
pub enum PulseError {
    // === Storage Errors ===
    /// Database file not found at the specified path.
    #[error("Database not found at '{path}'")]
    DatabaseNotFound { path: PathBuf },

    /// Pulse data directory not initialized.
    #[error("Pulse not initialized: run 'pulse init' first")]
    NotInitialized,

    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Entity Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Workspace with the specified ID was not found.
    #[error("Workspace not found: {id}")]
    WorkspaceNotFound { id: String },

    /// Cycle with the specified ID was not found.
    #[error("Cycle not found: {id}")]
    CycleNotFound { id: String },

    /// Attempted to create an entity with an ID that already exists.
    #[error("ID collision: {id}")]
    IdCollision { id: String },

    // === Validation Errors ===
    /// Field validation failed (e.g. empty title).
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Priority out of valid range (0-4).
    #[error("Priority must be 0-4, got: {priority}")]
    InvalidPriority { priority: i32 },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PulseError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseNotFound { .. }
                | Self::NotInitialized
                | Self::IssueNotFound { .. }
                | Self::WorkspaceNotFound { .. }
                | Self::CycleNotFound { .. }
                | Self::Validation { .. }
                | Self::InvalidStatus { .. }
                | Self::InvalidPriority { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: pulse init"),
            Self::DatabaseNotFound { .. } => Some("Check path or run: pulse init"),
            Self::InvalidStatus { .. } => {
                Some("Valid statuses: backlog, todo, in_progress, done, canceled")
            }
            Self::InvalidPriority { .. } => {
                Some("Use a priority between 0 (none) and 4 (low)")
            }
            Self::WorkspaceNotFound { .. } => {
                Some("List workspaces with: pulse workspace list")
            }
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `PulseError`.
pub type Result<T> = std::result::Result<T, PulseError>;
