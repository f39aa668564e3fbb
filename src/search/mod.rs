//! Free-text and structured filtering over issue sets.
//!
//! The evaluator is a pure function of `(issues, filters)`: it holds no
//! state, preserves the input's relative order, and may be re-run with
//! different filters over the same issue set. Active filters combine with
//! logical AND.
//!
//! A query string may carry a single structured filter as a prefix
//! (`status:`, `label:`, `assignee:`). Prefix-encoded filters replace the
//! free-text component, but explicitly supplied filter parameters win over
//! prefix-parsed ones.

use crate::error::Result;
use crate::model::{Issue, Status};

/// Active filter set for one search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Case-sensitive substring matched against title or description.
    pub text: Option<String>,
    pub status: Option<Status>,
    /// Matched as a substring against any label.
    pub label: Option<String>,
    /// Matched exactly against the assignee.
    pub assignee: Option<String>,
}

impl SearchFilters {
    /// Build the filter set from a raw query string and explicitly supplied
    /// filter parameters.
    ///
    /// Recognized query prefixes populate the corresponding structured
    /// filter and clear the free text. Explicit parameters override
    /// prefix-parsed values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` when a `status:` prefix carries an
    /// unrecognized status value.
    pub fn parse(
        query: &str,
        status: Option<Status>,
        label: Option<String>,
        assignee: Option<String>,
    ) -> Result<Self> {
        let mut filters = Self::default();

        let query = query.trim();
        if let Some(value) = query.strip_prefix("status:") {
            filters.status = Some(value.parse()?);
        } else if let Some(value) = query.strip_prefix("label:") {
            filters.label = Some(value.to_string());
        } else if let Some(value) = query.strip_prefix("assignee:") {
            filters.assignee = Some(value.to_string());
        } else if !query.is_empty() {
            filters.text = Some(query.to_string());
        }

        // Explicit parameters win over prefix-parsed values.
        if status.is_some() {
            filters.status = status;
        }
        if label.is_some() {
            filters.label = label;
        }
        if assignee.is_some() {
            filters.assignee = assignee;
        }

        Ok(filters)
    }

    /// Check whether `issue` satisfies every active filter.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(ref text) = self.text {
            let in_title = issue.title.contains(text.as_str());
            let in_description = issue
                .description
                .as_deref()
                .is_some_and(|d| d.contains(text.as_str()));
            if !in_title && !in_description {
                return false;
            }
        }

        if let Some(status) = self.status {
            if issue.status != status {
                return false;
            }
        }

        if let Some(ref label) = self.label {
            if !issue.labels.iter().any(|l| l.contains(label.as_str())) {
                return false;
            }
        }

        if let Some(ref assignee) = self.assignee {
            if issue.assignee_id.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Lazily evaluate `filters` over `issues`, preserving input order.
pub fn search<'a, I>(issues: I, filters: &'a SearchFilters) -> impl Iterator<Item = &'a Issue>
where
    I: IntoIterator<Item = &'a Issue>,
    I::IntoIter: 'a,
{
    issues.into_iter().filter(move |i| filters.matches(i))
}
