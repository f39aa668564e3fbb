//! ID generation for entities.
//!
//! IDs take the form `<prefix>_<hash>` where hash is the first 10 hex
//! characters of a SHA256 fingerprint over the creation instant and a
//! process-local counter. The counter disambiguates entities created within
//! the same nanosecond.

use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

const HASH_LENGTH: usize = 10;

fn fingerprint() -> String {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let mut hasher = Sha256::new();
    hasher.update(nanos.to_le_bytes());
    hasher.update(seq.to_le_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..HASH_LENGTH].to_string()
}

fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}_{}", fingerprint())
}

/// Mint a new issue ID.
#[must_use]
pub fn new_issue_id() -> String {
    prefixed_id("issue")
}

/// Mint a new workspace ID.
#[must_use]
pub fn new_workspace_id() -> String {
    prefixed_id("ws")
}

/// Mint a new cycle ID.
#[must_use]
pub fn new_cycle_id() -> String {
    prefixed_id("cycle")
}
