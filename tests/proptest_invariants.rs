//! Property tests for the aggregator and lifecycle invariants.

mod common;

use chrono::Duration;
use common::fixtures;
use proptest::prelude::*;
use pulse_rust::lifecycle;
use pulse_rust::metrics::{DurationSample, MetricsReport, duration_stats};
use pulse_rust::model::{Issue, Status};

fn status_from_index(index: usize) -> Status {
    Status::ALL[index % Status::ALL.len()]
}

fn issue_from_parts(n: usize, status_index: usize, estimate: i32, bug: bool) -> Issue {
    let labels: &[&str] = if bug { &["bug"] } else { &[] };
    fixtures::classified_issue(
        &format!("issue_{n}"),
        status_from_index(status_index),
        estimate,
        labels,
    )
}

fn issues_strategy() -> impl Strategy<Value = Vec<Issue>> {
    prop::collection::vec((0usize..5, 0i32..100, any::<bool>()), 0..40).prop_map(|parts| {
        parts
            .into_iter()
            .enumerate()
            .map(|(n, (status_index, estimate, bug))| issue_from_parts(n, status_index, estimate, bug))
            .collect()
    })
}

fn samples_from(hours: Vec<f64>) -> Vec<DurationSample> {
    hours
        .into_iter()
        .enumerate()
        .map(|(n, hours)| DurationSample {
            issue_id: format!("issue_{n}"),
            hours,
        })
        .collect()
}

proptest! {
    #[test]
    fn percentiles_are_monotone(hours in prop::collection::vec(0.0f64..10_000.0, 1..100)) {
        let stats = duration_stats(&samples_from(hours));
        prop_assert!(stats.p50_hours <= stats.p90_hours);
        prop_assert!(stats.p90_hours <= stats.p99_hours);
        prop_assert!(stats.mean_hours >= 0.0);
    }

    #[test]
    fn duration_stats_are_order_independent(hours in prop::collection::vec(0.0f64..10_000.0, 0..100)) {
        let forward = duration_stats(&samples_from(hours.clone()));
        let mut reversed = hours;
        reversed.reverse();
        let backward = duration_stats(&samples_from(reversed));
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn report_is_permutation_invariant(issues in issues_strategy(), rotation in 0usize..40) {
        let baseline = MetricsReport::compute(&issues, None);

        let mut permuted = issues;
        permuted.reverse();
        if !permuted.is_empty() {
            let pivot = rotation % permuted.len();
            permuted.rotate_left(pivot);
        }
        let shuffled = MetricsReport::compute(&permuted, None);

        prop_assert_eq!(baseline.status_counts, shuffled.status_counts);
        prop_assert_eq!(baseline.velocity, shuffled.velocity);
        prop_assert_eq!(baseline.lead_time, shuffled.lead_time);
        prop_assert_eq!(baseline.quality, shuffled.quality);
    }

    #[test]
    fn rates_bounded_and_zero_on_empty_denominators(issues in issues_strategy()) {
        let report = MetricsReport::compute(&issues, None);

        prop_assert!((0.0..=100.0).contains(&report.velocity.completion_rate));
        prop_assert!((0.0..=100.0).contains(&report.quality.bug_rate));
        if report.velocity.points_planned == 0 {
            prop_assert_eq!(report.velocity.completion_rate, 0.0);
        }
        if report.status_counts.total == 0 {
            prop_assert_eq!(report.quality.bug_rate, 0.0);
        }
    }

    #[test]
    fn completion_invariant_under_random_walks(indices in prop::collection::vec(0usize..5, 1..30)) {
        let mut issue = fixtures::issue("issue_walk", "walk");
        let mut now = issue.updated_at;
        let mut last_updated = issue.updated_at;

        for index in indices {
            now += Duration::seconds(1);
            lifecycle::apply_status_only_at(&mut issue, status_from_index(index), now).unwrap();

            prop_assert_eq!(issue.completed_at.is_some(), issue.status == Status::Done);
            prop_assert!(issue.updated_at >= last_updated);
            last_updated = issue.updated_at;
        }
    }
}
