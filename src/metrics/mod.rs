//! Team-performance metrics over a set of issues.
//!
//! The aggregator consumes issues already scoped by workspace/cycle and
//! produces status counts, velocity, lead-time and cycle-time distributions,
//! and quality ratios. All functions are order-independent over their input
//! and total: empty input yields zero-valued results, and every ratio guards
//! its denominator so no computation produces `NaN` or `Infinity`.
//!
//! The issue model keeps current state only, not a transition log. Cycle
//! time and reopen statistics therefore operate on caller-supplied history:
//! pre-extracted `(issue_id, duration)` samples for cycle time and
//! [`StatusChange`] records for reopens.

use crate::model::{Issue, Status};
use serde::Serialize;

/// Issue counts per workflow status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub backlog: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub canceled: usize,
    pub total: usize,
}

impl StatusCounts {
    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        match status {
            Status::Backlog => self.backlog,
            Status::Todo => self.todo,
            Status::InProgress => self.in_progress,
            Status::Done => self.done,
            Status::Canceled => self.canceled,
        }
    }
}

/// Count issues in each status.
#[must_use]
pub fn status_counts(issues: &[Issue]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for issue in issues {
        match issue.status {
            Status::Backlog => counts.backlog += 1,
            Status::Todo => counts.todo += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Done => counts.done += 1,
            Status::Canceled => counts.canceled += 1,
        }
        counts.total += 1;
    }
    counts
}

/// Planned vs. completed story-point throughput.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Velocity {
    pub points_planned: i64,
    pub points_completed: i64,
    /// Percent of planned points completed; 0 when nothing is planned.
    pub completion_rate: f64,
    /// Planned points not completed.
    pub carryover: i64,
}

/// Compute velocity numbers over the issues in scope.
#[must_use]
pub fn velocity(issues: &[Issue]) -> Velocity {
    let mut planned: i64 = 0;
    let mut completed: i64 = 0;
    for issue in issues {
        planned += i64::from(issue.estimate);
        if issue.status.is_done() {
            completed += i64::from(issue.estimate);
        }
    }
    let completion_rate = if planned > 0 {
        completed as f64 / planned as f64 * 100.0
    } else {
        0.0
    };
    Velocity {
        points_planned: planned,
        points_completed: completed,
        completion_rate,
        carryover: planned - completed,
    }
}

/// A pre-extracted duration for one issue, in hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSample {
    pub issue_id: String,
    pub hours: f64,
}

/// Distribution statistics over a set of durations, in hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub mean_hours: f64,
    pub p50_hours: f64,
    pub p90_hours: f64,
    pub p99_hours: f64,
}

/// Nearest-rank percentile over an ascending-sorted list.
///
/// For a list of length n, the P-th percentile is the value at index
/// `ceil(P/100 * n) - 1`, clamped to `[0, n-1]`. Empty input yields 0.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (p / 100.0 * n as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(n - 1);
    sorted[idx]
}

/// Compute mean and P50/P90/P99 over caller-supplied duration samples.
#[must_use]
pub fn duration_stats(samples: &[DurationSample]) -> DurationStats {
    let mut hours: Vec<f64> = samples.iter().map(|s| s.hours).collect();
    hours.sort_by(f64::total_cmp);

    let count = hours.len();
    let mean = if count > 0 {
        hours.iter().sum::<f64>() / count as f64
    } else {
        0.0
    };

    DurationStats {
        count,
        mean_hours: mean,
        p50_hours: percentile(&hours, 50.0),
        p90_hours: percentile(&hours, 90.0),
        p99_hours: percentile(&hours, 99.0),
    }
}

/// Lead-time distribution (`completed_at - created_at`) over completed
/// issues in scope.
#[must_use]
pub fn lead_time_stats(issues: &[Issue]) -> DurationStats {
    let samples: Vec<DurationSample> = issues
        .iter()
        .filter(|i| i.status.is_done())
        .filter_map(|i| {
            let completed_at = i.completed_at?;
            let seconds = completed_at
                .signed_duration_since(i.created_at)
                .num_seconds();
            Some(DurationSample {
                issue_id: i.id.clone(),
                hours: seconds as f64 / 3600.0,
            })
        })
        .collect();
    duration_stats(&samples)
}

/// Defect-related quality ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quality {
    /// Issues whose label set contains the literal label `bug`.
    pub bug_count: usize,
    /// Percent of all issues in scope labeled `bug`; 0 for an empty scope.
    pub bug_rate: f64,
}

/// Compute quality ratios over the issues in scope.
#[must_use]
pub fn quality(issues: &[Issue]) -> Quality {
    let bug_count = issues.iter().filter(|i| i.has_label("bug")).count();
    let bug_rate = if issues.is_empty() {
        0.0
    } else {
        bug_count as f64 / issues.len() as f64 * 100.0
    };
    Quality {
        bug_count,
        bug_rate,
    }
}

/// One status transition of one issue, as recorded by whatever history the
/// caller keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub issue_id: String,
    pub from: Status,
    pub to: Status,
}

/// Reopen statistics over caller-supplied transition history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReopenStats {
    /// Distinct issues that left `done` for any other status at least once.
    pub reopened_issues: usize,
    /// Distinct issues that reached `done` at least once.
    pub completed_issues: usize,
    /// Percent of ever-completed issues that were reopened; 0 when nothing
    /// was ever completed.
    pub reopen_rate: f64,
}

/// Compute reopen statistics from a transition history.
#[must_use]
pub fn reopen_stats(changes: &[StatusChange]) -> ReopenStats {
    use std::collections::BTreeSet;

    let mut completed: BTreeSet<&str> = BTreeSet::new();
    let mut reopened: BTreeSet<&str> = BTreeSet::new();
    for change in changes {
        if change.to.is_done() {
            completed.insert(change.issue_id.as_str());
        }
        if change.from.is_done() && !change.to.is_done() {
            reopened.insert(change.issue_id.as_str());
        }
    }

    let reopen_rate = if completed.is_empty() {
        0.0
    } else {
        reopened.len() as f64 / completed.len() as f64 * 100.0
    };

    ReopenStats {
        reopened_issues: reopened.len(),
        completed_issues: completed.len(),
        reopen_rate,
    }
}

/// Aggregate metrics for one scope (workspace or cycle).
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub status_counts: StatusCounts,
    pub velocity: Velocity,
    pub lead_time: DurationStats,
    pub quality: Quality,
    /// Present only when the caller supplied cycle-time samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_time: Option<DurationStats>,
}

impl MetricsReport {
    /// Compute the full report over the issues in scope.
    ///
    /// `cycle_samples` are pre-extracted in-progress durations; pass `None`
    /// when no transition history is available.
    #[must_use]
    pub fn compute(issues: &[Issue], cycle_samples: Option<&[DurationSample]>) -> Self {
        Self {
            status_counts: status_counts(issues),
            velocity: velocity(issues),
            lead_time: lead_time_stats(issues),
            quality: quality(issues),
            cycle_time: cycle_samples.map(duration_stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{Duration, TimeZone, Utc};

    fn issue(title: &str, status: Status, estimate: i32, labels: &[&str]) -> Issue {
        let t = Utc.timestamp_opt(1_735_689_600, 0).unwrap();
        let completed_at = if status.is_done() {
            Some(t + Duration::hours(24))
        } else {
            None
        };
        Issue {
            id: format!("issue_{title}"),
            workspace_id: "default".to_string(),
            title: title.to_string(),
            description: None,
            status,
            priority: Priority::MEDIUM,
            assignee_id: None,
            estimate,
            cycle_id: None,
            labels: labels.iter().map(ToString::to_string).collect(),
            parent_id: None,
            created_at: t,
            updated_at: t,
            completed_at,
        }
    }

    fn samples(hours: &[f64]) -> Vec<DurationSample> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| DurationSample {
                issue_id: format!("issue_{i}"),
                hours: *h,
            })
            .collect()
    }

    #[test]
    fn status_counts_cover_all_statuses() {
        let issues = vec![
            issue("a", Status::Backlog, 1, &[]),
            issue("b", Status::Todo, 1, &[]),
            issue("c", Status::Todo, 1, &[]),
            issue("d", Status::InProgress, 1, &[]),
            issue("e", Status::Done, 1, &[]),
            issue("f", Status::Canceled, 1, &[]),
        ];
        let counts = status_counts(&issues);
        assert_eq!(counts.backlog, 1);
        assert_eq!(counts.todo, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.done, 1);
        assert_eq!(counts.canceled, 1);
        assert_eq!(counts.total, 6);
    }

    #[test]
    fn velocity_matches_reference_scenario() {
        // Estimates [3, 5, 8] with only the 5-point issue done.
        let issues = vec![
            issue("a", Status::Todo, 3, &[]),
            issue("b", Status::Done, 5, &[]),
            issue("c", Status::InProgress, 8, &[]),
        ];
        let v = velocity(&issues);
        assert_eq!(v.points_planned, 16);
        assert_eq!(v.points_completed, 5);
        assert!((v.completion_rate - 31.25).abs() < 1e-9);
        assert_eq!(v.carryover, 11);
    }

    #[test]
    fn velocity_zero_planned_yields_zero_rate() {
        let issues = vec![issue("a", Status::Done, 0, &[])];
        let v = velocity(&issues);
        assert_eq!(v.completion_rate, 0.0);
        assert_eq!(v.carryover, 0);
    }

    #[test]
    fn percentiles_use_nearest_rank() {
        // n=10: p50 -> index 4, p90 -> index 8, p99 -> index 9
        let s = samples(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let stats = duration_stats(&s);
        assert_eq!(stats.p50_hours, 5.0);
        assert_eq!(stats.p90_hours, 9.0);
        assert_eq!(stats.p99_hours, 10.0);
        assert!((stats.mean_hours - 5.5).abs() < 1e-9);
    }

    #[test]
    fn percentiles_on_single_sample_return_it() {
        let stats = duration_stats(&samples(&[7.5]));
        assert_eq!(stats.p50_hours, 7.5);
        assert_eq!(stats.p90_hours, 7.5);
        assert_eq!(stats.p99_hours, 7.5);
        assert_eq!(stats.mean_hours, 7.5);
    }

    #[test]
    fn percentiles_on_empty_set_return_zero() {
        let stats = duration_stats(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_hours, 0.0);
        assert_eq!(stats.p50_hours, 0.0);
        assert_eq!(stats.p99_hours, 0.0);
    }

    #[test]
    fn percentiles_are_monotone() {
        let s = samples(&[4.0, 1.0, 9.0, 2.0, 2.0, 16.0, 3.0]);
        let stats = duration_stats(&s);
        assert!(stats.p50_hours <= stats.p90_hours);
        assert!(stats.p90_hours <= stats.p99_hours);
    }

    #[test]
    fn duration_stats_input_order_irrelevant() {
        let a = duration_stats(&samples(&[3.0, 1.0, 2.0]));
        let b = duration_stats(&samples(&[1.0, 2.0, 3.0]));
        assert_eq!(a, b);
    }

    #[test]
    fn lead_time_uses_completed_issues_only() {
        let issues = vec![
            issue("a", Status::Done, 1, &[]),
            issue("b", Status::Todo, 1, &[]),
        ];
        let stats = lead_time_stats(&issues);
        assert_eq!(stats.count, 1);
        assert!((stats.p50_hours - 24.0).abs() < 1e-9);
    }

    #[test]
    fn bug_rate_counts_literal_bug_label() {
        let issues = vec![
            issue("a", Status::Todo, 1, &["bug"]),
            issue("b", Status::Todo, 1, &["bugfix"]),
            issue("c", Status::Todo, 1, &["feature"]),
            issue("d", Status::Todo, 1, &[]),
        ];
        let q = quality(&issues);
        assert_eq!(q.bug_count, 1);
        assert!((q.bug_rate - 25.0).abs() < 1e-9);
    }

    #[test]
    fn quality_on_empty_scope_is_zero() {
        let q = quality(&[]);
        assert_eq!(q.bug_count, 0);
        assert_eq!(q.bug_rate, 0.0);
    }

    #[test]
    fn reopen_stats_track_distinct_issues() {
        let changes = vec![
            StatusChange {
                issue_id: "a".to_string(),
                from: Status::InProgress,
                to: Status::Done,
            },
            StatusChange {
                issue_id: "a".to_string(),
                from: Status::Done,
                to: Status::Todo,
            },
            StatusChange {
                issue_id: "a".to_string(),
                from: Status::Todo,
                to: Status::Done,
            },
            StatusChange {
                issue_id: "b".to_string(),
                from: Status::InProgress,
                to: Status::Done,
            },
        ];
        let stats = reopen_stats(&changes);
        assert_eq!(stats.completed_issues, 2);
        assert_eq!(stats.reopened_issues, 1);
        assert!((stats.reopen_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn reopen_stats_empty_history_is_zero() {
        let stats = reopen_stats(&[]);
        assert_eq!(stats.reopen_rate, 0.0);
    }

    #[test]
    fn report_is_permutation_invariant() {
        let mut issues = vec![
            issue("a", Status::Done, 3, &["bug"]),
            issue("b", Status::Todo, 5, &[]),
            issue("c", Status::InProgress, 8, &[]),
            issue("d", Status::Done, 2, &[]),
        ];
        let before = MetricsReport::compute(&issues, None);
        issues.reverse();
        issues.swap(0, 2);
        let after = MetricsReport::compute(&issues, None);
        assert_eq!(before.status_counts, after.status_counts);
        assert_eq!(before.velocity, after.velocity);
        assert_eq!(before.lead_time, after.lead_time);
        assert_eq!(before.quality, after.quality);
    }

    #[test]
    fn report_serializes_plain_numbers() {
        let issues = vec![issue("a", Status::Done, 5, &["bug"])];
        let report = MetricsReport::compute(&issues, None);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["velocity"]["points_planned"], 5);
        assert_eq!(json["velocity"]["completion_rate"], 100.0);
        assert_eq!(json["quality"]["bug_count"], 1);
        assert!(json.get("cycle_time").is_none());
    }
}
