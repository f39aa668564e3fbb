//! Core data types for `pulse_rust`.
//!
//! This module defines the entities shared across the crate:
//! - `Issue` - the core work item
//! - `Workspace` - tenant boundary grouping issues and cycles
//! - `Cycle` - a time-boxed iteration (sprint)
//! - `Status` / `CycleStatus` / `Priority` - classification values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Issue workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Backlog,
    Todo,
    InProgress,
    Done,
    Canceled,
}

impl Status {
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::Done,
        Self::Canceled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Canceled => "canceled",
        }
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backlog" => Ok(Self::Backlog),
            "todo" => Ok(Self::Todo),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            other => Err(crate::error::PulseError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Issue priority (0=none, 1=urgent, 2=high, 3=medium, 4=low).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const NONE: Self = Self(0);
    pub const URGENT: Self = Self(1);
    pub const HIGH: Self = Self(2);
    pub const MEDIUM: Self = Self(3);
    pub const LOW: Self = Self(4);

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self.0 {
            1 => "urgent",
            2 => "high",
            3 => "medium",
            4 => "low",
            _ => "none",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = crate::error::PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "none" => return Ok(Self::NONE),
            "urgent" => return Ok(Self::URGENT),
            "high" => return Ok(Self::HIGH),
            "medium" => return Ok(Self::MEDIUM),
            "low" => return Ok(Self::LOW),
            _ => {}
        }

        let val = s.strip_prefix('p').unwrap_or(&s);
        match val.parse::<i32>() {
            Ok(p) if (0..=4).contains(&p) => Ok(Self(p)),
            _ => Err(crate::error::PulseError::InvalidPriority {
                priority: val.parse().unwrap_or(-1),
            }),
        }
    }
}

/// Cycle (sprint) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl CycleStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CycleStatus {
    type Err = crate::error::PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(crate::error::PulseError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// The primary issue entity.
///
/// Invariant maintained by the lifecycle module: `completed_at` is non-null
/// exactly when `status == Done`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Unique ID (e.g. "issue_3fa2b4c91d").
    pub id: String,

    /// Owning workspace.
    pub workspace_id: String,

    /// Title (non-empty after trimming).
    pub title: String,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Priority (0=none, 4=low).
    #[serde(default)]
    pub priority: Priority,

    /// Assigned user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    /// Story-point estimate.
    #[serde(default)]
    pub estimate: i32,

    /// Sprint this issue is scoped to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<String>,

    /// Label set (insertion order irrelevant).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Parent issue, for sub-issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Creation timestamp (set once).
    pub created_at: DateTime<Utc>,

    /// Last update timestamp (set on every mutation).
    pub updated_at: DateTime<Utc>,

    /// Completion timestamp; present iff status is `done`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Check whether the label set contains `label` exactly.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A tenant boundary grouping issues and cycles.
///
/// Owns issues and cycles by reference (ID) only; deleting a workspace does
/// not cascade to its issues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name -> value configuration map.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A time-boxed iteration (sprint).
///
/// Associated issues are those whose `cycle_id` equals this cycle's ID; the
/// cycle holds no membership list of its own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cycle {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CycleStatus,
    pub created_at: DateTime<Utc>,
}
