//! GitHub API calls for releases.

use super::error::ChangelogError;
use super::pulls::PullSummary;
use chrono::NaiveDate;
use octocrab::models::pulls::PullRequest;
use octocrab::params;
use octocrab::Octocrab;
use tracing::{debug, info, info_span, Instrument};

/// Pull requests fetched per page; only the first page is inspected.
const RESULTS_PER_PAGE: u8 = 100;

/// Fetches pull requests merged on `merged_date`.
///
/// Looks at the most recently updated closed pull requests only, which
/// covers a daily release cadence.
///
/// # Errors
///
/// Returns [`ChangelogError::GitHubError`] if the API call fails.
pub async fn fetch_merged_pulls(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    merged_date: NaiveDate,
) -> Result<Vec<PullSummary>, ChangelogError> {
    let span = info_span!("fetch_merged_pulls", repo = %format!("{owner}/{repo}"), %merged_date);

    async {
        let page = octocrab
            .pulls(owner, repo)
            .list()
            .state(params::State::Closed)
            .sort(params::pulls::Sort::Updated)
            .direction(params::Direction::Descending)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;

        debug!(count = page.items.len(), "Fetched closed pull requests");

        let pulls: Vec<_> = page
            .items
            .into_iter()
            .filter_map(to_summary)
            .filter(|pull| pull.merged_on(merged_date))
            .collect();

        info!(count = pulls.len(), "Found merged pull requests");
        Ok(pulls)
    }
    .instrument(span)
    .await
}

/// Converts an API pull request, dropping unmerged ones.
fn to_summary(pr: PullRequest) -> Option<PullSummary> {
    let merged_at = pr.merged_at?;
    Some(PullSummary {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
        labels: pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|label| label.name)
            .collect(),
        merged_at: Some(merged_at),
    })
}

/// Creates a GitHub release for `tag` and returns its URL.
///
/// # Errors
///
/// Returns [`ChangelogError::GitHubError`] if the API call fails.
pub async fn create_github_release(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    tag: &str,
    body: &str,
) -> Result<String, ChangelogError> {
    let release = octocrab
        .repos(owner, repo)
        .releases()
        .create(tag)
        .name(tag)
        .body(body)
        .send()
        .await?;

    info!(tag, url = %release.html_url, "Created GitHub release");
    Ok(release.html_url.to_string())
}
