//! Lifecycle invariants exercised through the storage bindings.
//!
//! The load -> apply -> persist sequence here mirrors what the command
//! handlers do, verifying the completion-timestamp invariant and
//! all-or-nothing update semantics survive a storage round trip.

mod common;

use common::fixtures;
use pulse_rust::error::PulseError;
use pulse_rust::lifecycle::{self, IssueChanges};
use pulse_rust::model::Status;
use pulse_rust::storage::{EntityStore, MemoryStore, SqliteStore};

fn stores() -> (SqliteStore, MemoryStore) {
    common::init_test_logging();
    (SqliteStore::open_memory().unwrap(), MemoryStore::new())
}

fn roundtrip_status_walk(store: &mut dyn EntityStore) {
    let issue = fixtures::issue("issue_walk", "Status walk");
    store.create_issue(&issue).unwrap();

    for status in Status::ALL {
        let mut loaded = store.get_issue("issue_walk").unwrap().unwrap();
        lifecycle::apply_status_only(&mut loaded, status).unwrap();
        store.update_issue(&loaded).unwrap();

        let persisted = store.get_issue("issue_walk").unwrap().unwrap();
        assert_eq!(persisted.status, status);
        assert_eq!(
            persisted.completed_at.is_some(),
            status == Status::Done,
            "completion invariant violated after moving to {status}"
        );
    }
}

#[test]
fn completion_invariant_survives_persistence() {
    let (mut sqlite, mut memory) = stores();
    roundtrip_status_walk(&mut sqlite);
    roundtrip_status_walk(&mut memory);
}

#[test]
fn updated_at_never_decreases() {
    let (mut store, _) = stores();
    let issue = fixtures::issue("issue_t", "Timestamps");
    store.create_issue(&issue).unwrap();

    let mut last = issue.updated_at;
    for status in [Status::Todo, Status::InProgress, Status::Done, Status::Todo] {
        let mut loaded = store.get_issue("issue_t").unwrap().unwrap();
        lifecycle::apply_status_only(&mut loaded, status).unwrap();
        store.update_issue(&loaded).unwrap();

        let persisted = store.get_issue("issue_t").unwrap().unwrap();
        assert!(persisted.updated_at >= last, "updated_at went backwards");
        last = persisted.updated_at;
    }
}

#[test]
fn rejected_update_leaves_stored_issue_untouched() {
    let (mut store, _) = stores();
    let issue = fixtures::issue("issue_r", "Reject me");
    store.create_issue(&issue).unwrap();

    let mut loaded = store.get_issue("issue_r").unwrap().unwrap();
    let err = lifecycle::apply_update(
        &mut loaded,
        &IssueChanges {
            title: Some("  ".to_string()),
            status: Some(Status::Done),
            ..IssueChanges::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, PulseError::Validation { .. }));

    // The handler would not persist after an error; the in-memory copy is
    // also unchanged, so nothing can leak.
    let persisted = store.get_issue("issue_r").unwrap().unwrap();
    assert_eq!(persisted.title, "Reject me");
    assert_eq!(persisted.status, Status::Backlog);
    assert_eq!(loaded, persisted);
}

#[test]
fn unknown_status_string_fails_before_changes_exist() {
    let err = "wontfix".parse::<Status>().unwrap_err();
    assert!(matches!(err, PulseError::InvalidStatus { .. }));
}

#[test]
fn reopen_then_complete_again_updates_completed_at() {
    let (mut store, _) = stores();
    let issue = fixtures::issue("issue_rc", "Recomplete");
    store.create_issue(&issue).unwrap();

    let mut loaded = store.get_issue("issue_rc").unwrap().unwrap();
    lifecycle::apply_status_only(&mut loaded, Status::Done).unwrap();
    store.update_issue(&loaded).unwrap();
    let first_completion = store
        .get_issue("issue_rc")
        .unwrap()
        .unwrap()
        .completed_at
        .unwrap();

    let mut loaded = store.get_issue("issue_rc").unwrap().unwrap();
    lifecycle::apply_status_only(&mut loaded, Status::InProgress).unwrap();
    store.update_issue(&loaded).unwrap();
    assert!(
        store
            .get_issue("issue_rc")
            .unwrap()
            .unwrap()
            .completed_at
            .is_none()
    );

    let mut loaded = store.get_issue("issue_rc").unwrap().unwrap();
    lifecycle::apply_status_only(&mut loaded, Status::Done).unwrap();
    store.update_issue(&loaded).unwrap();
    let second_completion = store
        .get_issue("issue_rc")
        .unwrap()
        .unwrap()
        .completed_at
        .unwrap();

    assert!(second_completion >= first_completion);
}

#[test]
fn partial_update_only_touches_listed_fields() {
    let (mut store, _) = stores();
    let mut issue = fixtures::issue("issue_p", "Partial");
    issue.description = Some("original".to_string());
    issue.labels = vec!["bug".to_string()];
    store.create_issue(&issue).unwrap();

    let mut loaded = store.get_issue("issue_p").unwrap().unwrap();
    lifecycle::apply_update(
        &mut loaded,
        &IssueChanges {
            estimate: Some(13),
            ..IssueChanges::default()
        },
    )
    .unwrap();
    store.update_issue(&loaded).unwrap();

    let persisted = store.get_issue("issue_p").unwrap().unwrap();
    assert_eq!(persisted.estimate, 13);
    assert_eq!(persisted.description.as_deref(), Some("original"));
    assert_eq!(persisted.labels, vec!["bug".to_string()]);
    assert_eq!(persisted.status, Status::Backlog);
}
