//! Release tooling for template repositories.
//!
//! Cuts a date-named release from the pull requests merged on a given day:
//! groups them by label, renders release notes, prepends them to the
//! changelog, bumps the version, then commits, tags, pushes and publishes a
//! GitHub release.

mod config;
mod error;
mod git;
mod github;
mod markdown;
mod pulls;

pub use config::{ReleaseConfig, BRANCH_ENV, REPOSITORY_ENV, TOKEN_ENV};
pub use error::ChangelogError;
pub use git::{commit_and_tag, push_release};
pub use github::{create_github_release, fetch_merged_pulls};
pub use markdown::{
    generate_markdown, release_name, update_version, write_changelog, GENERATOR_PLACEHOLDER,
};
pub use pulls::{GroupedPulls, PullSummary, INFRASTRUCTURE_LABEL};

use crate::templates::{TemplateRenderer, CHANGELOG_TEMPLATE};
use chrono::NaiveDate;
use octocrab::Octocrab;
use std::path::PathBuf;
use tracing::{info, warn};

/// What a release run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Nothing was merged on the day.
    NothingMerged,

    /// Only pull requests not worth a changelog mention were merged.
    NothingNotable,

    /// Release notes were produced.
    Released {
        /// Release name, also the tag.
        release: String,
        /// Rendered release notes.
        summary: String,
        /// Whether files were written and the release published.
        published: bool,
    },
}

/// Cuts releases for one repository.
pub struct Releaser {
    config: ReleaseConfig,
    octocrab: Octocrab,
    renderer: TemplateRenderer,
}

impl Releaser {
    /// Builds a releaser from the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::GitHubError`] if the client can't be built.
    pub fn new(config: ReleaseConfig) -> Result<Self, ChangelogError> {
        let mut builder = Octocrab::builder();
        if let Some(token) = config.token() {
            builder = builder.personal_token(token.to_string());
        }
        Ok(Self {
            octocrab: builder.build()?,
            config,
            renderer: TemplateRenderer::new(),
        })
    }

    /// Releases the pull requests merged on `merged_date`.
    ///
    /// # Errors
    ///
    /// Propagates API, rendering, file and git failures.
    pub async fn run(&self, merged_date: NaiveDate) -> Result<ReleaseOutcome, ChangelogError> {
        let config = &self.config;
        let pulls =
            fetch_merged_pulls(&self.octocrab, config.owner(), config.repo(), merged_date).await?;

        let outcome = prepare_release(&self.renderer, config, pulls, merged_date)?;
        let (release, summary) = match outcome {
            ReleaseOutcome::Released {
                release, summary, ..
            } => (release, summary),
            other => return Ok(other),
        };
        if config.dry_run() {
            info!(release = %release, "Dry run, nothing written");
            return Ok(ReleaseOutcome::Released {
                release,
                summary,
                published: false,
            });
        }

        let (branch, files) = stage_release(config, &release, &summary)?;
        let files: Vec<_> = files.iter().map(PathBuf::as_path).collect();
        commit_and_tag(config.root(), &files, &release).await?;
        push_release(config.root(), &config.full_name(), branch, config.token()).await?;

        let url = create_github_release(
            &self.octocrab,
            config.owner(),
            config.repo(),
            &release,
            &summary,
        )
        .await?;
        info!(url = %url, "Published release");

        Ok(ReleaseOutcome::Released {
            release,
            summary,
            published: true,
        })
    }
}

/// Renders release notes for the pull requests merged on `merged_date`.
///
/// Nothing is written; a produced release is always unpublished.
///
/// # Errors
///
/// Returns [`ChangelogError::IoError`] if the configured template can't be
/// read, or [`ChangelogError::Template`] if rendering fails.
pub fn prepare_release(
    renderer: &TemplateRenderer,
    config: &ReleaseConfig,
    pulls: Vec<PullSummary>,
    merged_date: NaiveDate,
) -> Result<ReleaseOutcome, ChangelogError> {
    if pulls.is_empty() {
        info!("Nothing was merged, exiting");
        return Ok(ReleaseOutcome::NothingMerged);
    }

    let grouped = GroupedPulls::from_pulls(pulls);
    if !grouped.has_values() {
        info!("Pull requests merged aren't worth a changelog mention");
        return Ok(ReleaseOutcome::NothingNotable);
    }

    let template = match config.template_path() {
        Some(path) => std::fs::read_to_string(path).map_err(|e| ChangelogError::IoError {
            path: path.display().to_string(),
            source: e,
        })?,
        None => CHANGELOG_TEMPLATE.to_string(),
    };
    let summary = generate_markdown(renderer, &template, &grouped)?;
    let release = release_name(merged_date);
    info!(release = %release, "Generated release notes");

    Ok(ReleaseOutcome::Released {
        release,
        summary,
        published: false,
    })
}

/// Writes the release into the changelog and version files.
///
/// Returns the branch to push and the files to commit. The branch is
/// resolved first, so nothing is written when it's missing.
fn stage_release<'a>(
    config: &'a ReleaseConfig,
    release: &str,
    summary: &str,
) -> Result<(&'a str, [PathBuf; 2]), ChangelogError> {
    let branch = config.branch()?;

    let changelog_path = config.changelog_path();
    write_changelog(&changelog_path, release, summary)?;
    info!(path = %changelog_path.display(), "Wrote changelog");

    let version_path = config.version_path();
    if update_version(&version_path, release)? {
        info!(path = %version_path.display(), "Updated version");
    } else {
        warn!(path = %version_path.display(), "Version left unchanged");
    }

    Ok((branch, [changelog_path, version_path]))
}
