//! Pulse: issue tracking with team-velocity analytics.
//!
//! The core of the crate is three pure components:
//!
//! - [`lifecycle`] - validates and applies sparse field updates to an issue,
//!   owning the status-transition and completion-timestamp rules
//! - [`metrics`] - turns a set of issues into velocity, cycle-time,
//!   lead-time, and quality metrics
//! - [`search`] - evaluates free-text queries and structured filters over a
//!   set of issues
//!
//! Entities live in [`model`], and durable storage is behind the
//! [`storage::EntityStore`] trait with SQLite and in-memory bindings. The
//! `pulse` binary wires a clap command surface onto these pieces.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod search;
pub mod storage;
pub mod util;

pub use error::{PulseError, Result};
