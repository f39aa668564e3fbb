//! Shared utilities for `pulse_rust`.
//!
//! - ID generation (prefix + SHA256 fingerprint)
//! - Time parsing (RFC3339, simple dates, relative durations)

pub mod id;
pub mod time;

pub use id::{new_cycle_id, new_issue_id, new_workspace_id};
pub use time::parse_flexible_timestamp;
