//! Cross-binding storage tests: the SQLite and in-memory stores must agree
//! on CRUD semantics, listing order, and count queries.

mod common;

use chrono::{Duration, Utc};
use common::fixtures;
use pulse_rust::error::PulseError;
use pulse_rust::model::{Cycle, CycleStatus, Priority, Status, Workspace};
use pulse_rust::storage::{EntityStore, IssueFilters, MemoryStore, SqliteStore};
use std::collections::BTreeMap;

fn with_both(test: impl Fn(&mut dyn EntityStore)) {
    common::init_test_logging();
    let mut sqlite = SqliteStore::open_memory().unwrap();
    test(&mut sqlite);
    let mut memory = MemoryStore::new();
    test(&mut memory);
}

#[test]
fn issue_crud_parity() {
    with_both(|store| {
        let mut issue = fixtures::issue("issue_1", "CRUD");
        issue.labels = vec!["bug".to_string()];
        store.create_issue(&issue).unwrap();

        let loaded = store.get_issue("issue_1").unwrap().unwrap();
        assert_eq!(loaded.title, "CRUD");
        assert_eq!(loaded.labels, vec!["bug".to_string()]);

        let mut renamed = loaded.clone();
        renamed.title = "Renamed".to_string();
        store.update_issue(&renamed).unwrap();
        assert_eq!(
            store.get_issue("issue_1").unwrap().unwrap().title,
            "Renamed"
        );

        store.delete_issue("issue_1").unwrap();
        assert!(store.get_issue("issue_1").unwrap().is_none());
        // Deletes are idempotent
        store.delete_issue("issue_1").unwrap();
    });
}

#[test]
fn duplicate_create_rejected_in_both() {
    with_both(|store| {
        store
            .create_issue(&fixtures::issue("issue_dup", "a"))
            .unwrap();
        assert!(matches!(
            store
                .create_issue(&fixtures::issue("issue_dup", "b"))
                .unwrap_err(),
            PulseError::IdCollision { .. }
        ));
    });
}

#[test]
fn listing_order_and_filters_parity() {
    with_both(|store| {
        let base = fixtures::base_time();
        for (n, (priority, offset_hours, status)) in [
            (Priority::LOW, 0, Status::Todo),
            (Priority::URGENT, 2, Status::Todo),
            (Priority::URGENT, 1, Status::Done),
        ]
        .into_iter()
        .enumerate()
        {
            let mut issue = fixtures::issue(&format!("issue_{n}"), &format!("t{n}"));
            issue.priority = priority;
            issue.created_at = base - Duration::hours(offset_hours);
            issue.status = status;
            if status == Status::Done {
                issue.completed_at = Some(base);
            }
            store.create_issue(&issue).unwrap();
        }

        let ids: Vec<String> = store
            .list_issues(&IssueFilters::workspace("default"))
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["issue_2", "issue_1", "issue_0"]);

        let done_only = store
            .list_issues(&IssueFilters {
                workspace_id: Some("default".to_string()),
                status: Some(Status::Done),
                ..IssueFilters::default()
            })
            .unwrap();
        assert_eq!(done_only.len(), 1);
        assert_eq!(done_only[0].id, "issue_2");

        let paged = store
            .list_issues(&IssueFilters {
                workspace_id: Some("default".to_string()),
                limit: Some(1),
                offset: Some(1),
                ..IssueFilters::default()
            })
            .unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].id, "issue_1");
    });
}

#[test]
fn count_queries_parity() {
    with_both(|store| {
        for (n, status) in [Status::Todo, Status::Todo, Status::Done, Status::Backlog]
            .into_iter()
            .enumerate()
        {
            let mut issue = fixtures::classified_issue(&format!("issue_{n}"), status, 1, &[]);
            if n < 3 {
                issue.cycle_id = Some("cycle_1".to_string());
            }
            store.create_issue(&issue).unwrap();
        }

        let counts = store.count_issues_by_status("default").unwrap();
        let expected: BTreeMap<String, usize> = BTreeMap::from([
            ("todo".to_string(), 2),
            ("done".to_string(), 1),
            ("backlog".to_string(), 1),
        ]);
        assert_eq!(counts, expected);

        assert_eq!(
            store.count_cycle_issues("default", "cycle_1").unwrap(),
            (3, 1)
        );
    });
}

#[test]
fn workspace_and_cycle_parity() {
    with_both(|store| {
        let now = Utc::now();
        let ws = Workspace {
            id: "ws_team".to_string(),
            name: "Team".to_string(),
            description: Some("desc".to_string()),
            settings: BTreeMap::from([("board".to_string(), "kanban".to_string())]),
            created_at: now,
            updated_at: now,
        };
        store.create_workspace(&ws).unwrap();
        assert_eq!(
            store.get_workspace("ws_team").unwrap().unwrap().name,
            "Team"
        );

        let cycle = Cycle {
            id: "cycle_1".to_string(),
            workspace_id: "ws_team".to_string(),
            name: "Sprint 1".to_string(),
            start_date: Some(now),
            end_date: None,
            status: CycleStatus::Upcoming,
            created_at: now,
        };
        store.create_cycle(&cycle).unwrap();
        assert!(store.active_cycle("ws_team").unwrap().is_none());
        assert_eq!(store.upcoming_cycles("ws_team").unwrap().len(), 1);

        let mut activated = cycle.clone();
        activated.status = CycleStatus::Active;
        store.update_cycle(&activated).unwrap();
        assert_eq!(
            store.active_cycle("ws_team").unwrap().unwrap().id,
            "cycle_1"
        );
        assert!(store.upcoming_cycles("ws_team").unwrap().is_empty());

        // No cascade: issues survive their workspace
        let mut issue = fixtures::issue("issue_orphan", "survives");
        issue.workspace_id = "ws_team".to_string();
        store.create_issue(&issue).unwrap();
        store.delete_workspace("ws_team").unwrap();
        assert!(store.get_issue("issue_orphan").unwrap().is_some());
    });
}

#[test]
fn update_missing_records_not_found_parity() {
    with_both(|store| {
        assert!(matches!(
            store
                .update_issue(&fixtures::issue("issue_ghost", "x"))
                .unwrap_err(),
            PulseError::IssueNotFound { .. }
        ));

        let now = Utc::now();
        let ws = Workspace {
            id: "ws_ghost".to_string(),
            name: "x".to_string(),
            description: None,
            settings: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            store.update_workspace(&ws).unwrap_err(),
            PulseError::WorkspaceNotFound { .. }
        ));
    });
}
