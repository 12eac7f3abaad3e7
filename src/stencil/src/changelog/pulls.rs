//! Merged pull requests and their grouping by change type.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Label marking pull requests that never appear in the changelog.
pub const INFRASTRUCTURE_LABEL: &str = "project infrastructure";

/// A merged pull request, as far as the changelog cares.
#[derive(Debug, Clone, Serialize)]
pub struct PullSummary {
    /// Pull request number.
    pub number: u64,
    /// Pull request title.
    pub title: String,
    /// Link to the pull request.
    pub url: String,
    /// Label names.
    #[serde(skip)]
    pub labels: Vec<String>,
    /// When it was merged.
    #[serde(skip)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullSummary {
    /// Returns true if the pull request was merged on `date` (UTC).
    #[must_use]
    pub fn merged_on(&self, date: NaiveDate) -> bool {
        self.merged_at
            .is_some_and(|merged_at| merged_at.date_naive() == date)
    }

    fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// Merged pull requests grouped by the kind of change.
#[derive(Debug, Clone, Default)]
pub struct GroupedPulls {
    pub changed: Vec<PullSummary>,
    pub fixed: Vec<PullSummary>,
    pub documentation: Vec<PullSummary>,
    pub updated: Vec<PullSummary>,
}

impl GroupedPulls {
    /// Groups `pulls` by label.
    #[must_use]
    pub fn from_pulls(pulls: impl IntoIterator<Item = PullSummary>) -> Self {
        let mut grouped = Self::default();
        for pull in pulls {
            grouped.add_pull(pull);
        }
        grouped
    }

    /// Files a pull request under its change type.
    ///
    /// Labels, first match wins:
    /// - `project infrastructure`: dropped
    /// - `update`: updated
    /// - `bug`: fixed
    /// - `docs`: documentation
    /// - anything else: changed
    pub fn add_pull(&mut self, pull: PullSummary) {
        if pull.has_label(INFRASTRUCTURE_LABEL) {
            return;
        }

        if pull.has_label("update") {
            self.updated.push(pull);
        } else if pull.has_label("bug") {
            self.fixed.push(pull);
        } else if pull.has_label("docs") {
            self.documentation.push(pull);
        } else {
            self.changed.push(pull);
        }
    }

    /// Returns true if any pull request is worth a mention.
    #[must_use]
    pub fn has_values(&self) -> bool {
        self.sections().iter().any(|(_, pulls)| !pulls.is_empty())
    }

    /// Sections in changelog order, including empty ones.
    #[must_use]
    pub fn sections(&self) -> [(&'static str, &[PullSummary]); 4] {
        [
            ("Changed", self.changed.as_slice()),
            ("Fixed", self.fixed.as_slice()),
            ("Documentation", self.documentation.as_slice()),
            ("Updated", self.updated.as_slice()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull(number: u64, labels: &[&str]) -> PullSummary {
        PullSummary {
            number,
            title: format!("PR {number}"),
            url: format!("https://github.com/acme/template/pull/{number}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            merged_at: None,
        }
    }

    #[test]
    fn groups_by_label() {
        let grouped = GroupedPulls::from_pulls([
            pull(1, &[]),
            pull(2, &["bug"]),
            pull(3, &["docs"]),
            pull(4, &["update", "bug"]),
            pull(5, &["project infrastructure", "bug"]),
        ]);

        fn numbers(pulls: &[PullSummary]) -> Vec<u64> {
            pulls.iter().map(|p| p.number).collect()
        }

        assert_eq!(numbers(&grouped.changed), [1]);
        assert_eq!(numbers(&grouped.fixed), [2]);
        assert_eq!(numbers(&grouped.documentation), [3]);
        assert_eq!(numbers(&grouped.updated), [4]);
        assert!(grouped.has_values());
    }

    #[test]
    fn infrastructure_only_has_no_values() {
        let grouped = GroupedPulls::from_pulls([pull(1, &["project infrastructure"])]);
        assert!(!grouped.has_values());
    }

    #[test]
    fn merged_on_compares_utc_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let at = |rfc3339: &str| {
            let mut pull = pull(1, &[]);
            pull.merged_at = Some(DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc));
            pull
        };

        assert!(at("2026-10-18T00:00:00Z").merged_on(date));
        assert!(at("2026-10-18T23:59:59Z").merged_on(date));
        assert!(!at("2026-10-17T23:59:59Z").merged_on(date));
        assert!(at("2026-10-19T01:00:00+02:00").merged_on(date));
        assert!(!pull(2, &[]).merged_on(date));
    }

    #[test]
    fn section_order() {
        let titles: Vec<_> = GroupedPulls::default()
            .sections()
            .iter()
            .map(|(title, _)| *title)
            .collect();
        assert_eq!(titles, ["Changed", "Fixed", "Documentation", "Updated"]);
    }
}
