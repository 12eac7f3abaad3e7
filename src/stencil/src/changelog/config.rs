//! Release configuration.

use super::error::ChangelogError;
use std::path::{Path, PathBuf};

/// Token used for GitHub API calls and pushes.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Repository in `owner/name` form.
pub const REPOSITORY_ENV: &str = "GITHUB_REPOSITORY";
/// Branch the release is pushed to.
pub const BRANCH_ENV: &str = "GITHUB_REF_NAME";

/// Configuration for cutting a release.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// GitHub token, if any.
    token: Option<String>,
    /// Repository owner.
    owner: String,
    /// Repository name.
    repo: String,
    /// Branch to push to.
    branch: Option<String>,
    /// Repository checkout root.
    root: PathBuf,
    /// Changelog file, relative to `root`.
    changelog_file: PathBuf,
    /// File holding the `version = "..."` line, relative to `root`.
    version_file: PathBuf,
    /// Alternative release notes template.
    template_path: Option<PathBuf>,
    /// Whether to skip writing files and publishing.
    dry_run: bool,
}

impl ReleaseConfig {
    /// Creates a configuration for `repository` (`owner/name`).
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::InvalidRepository`] if `repository` isn't
    /// `owner/name`.
    pub fn new(repository: &str, root: PathBuf) -> Result<Self, ChangelogError> {
        let (owner, repo) = parse_repository(repository)?;
        Ok(Self {
            token: None,
            owner,
            repo,
            branch: None,
            root,
            changelog_file: PathBuf::from("CHANGELOG.md"),
            version_file: PathBuf::from("setup.py"),
            template_path: None,
            dry_run: false,
        })
    }

    /// Creates a configuration from the GitHub Actions environment.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::MissingEnv`] if [`REPOSITORY_ENV`] is unset.
    pub fn from_env(root: PathBuf) -> Result<Self, ChangelogError> {
        let repository = std::env::var(REPOSITORY_ENV).map_err(|_| ChangelogError::MissingEnv {
            name: REPOSITORY_ENV,
        })?;

        let mut config = Self::new(&repository, root)?;
        config.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        config.branch = std::env::var(BRANCH_ENV).ok().filter(|b| !b.is_empty());
        Ok(config)
    }

    /// Sets the GitHub token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the branch to push to.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets an alternative release notes template.
    pub fn with_template_path(mut self, template_path: PathBuf) -> Self {
        self.template_path = Some(template_path);
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns the branch to push to.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::MissingEnv`] if no branch is configured.
    pub fn branch(&self) -> Result<&str, ChangelogError> {
        self.branch
            .as_deref()
            .ok_or(ChangelogError::MissingEnv { name: BRANCH_ENV })
    }

    /// Returns the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the changelog path.
    pub fn changelog_path(&self) -> PathBuf {
        self.root.join(&self.changelog_file)
    }

    /// Returns the version file path.
    pub fn version_path(&self) -> PathBuf {
        self.root.join(&self.version_file)
    }

    /// Returns the alternative release notes template path.
    pub fn template_path(&self) -> Option<&Path> {
        self.template_path.as_deref()
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

fn parse_repository(repository: &str) -> Result<(String, String), ChangelogError> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ChangelogError::InvalidRepository {
            value: repository.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_reads_github_variables() {
        let config = temp_env::with_vars(
            [
                (TOKEN_ENV, Some("secret")),
                (REPOSITORY_ENV, Some("acme/template")),
                (BRANCH_ENV, Some("main")),
            ],
            || ReleaseConfig::from_env(PathBuf::from("/repo")).unwrap(),
        );

        assert_eq!(config.token(), Some("secret"));
        assert_eq!(config.owner(), "acme");
        assert_eq!(config.repo(), "template");
        assert_eq!(config.branch().unwrap(), "main");
        assert_eq!(config.changelog_path(), PathBuf::from("/repo/CHANGELOG.md"));
        assert_eq!(config.version_path(), PathBuf::from("/repo/setup.py"));
    }

    #[test]
    fn from_env_requires_repository() {
        let result = temp_env::with_var_unset(REPOSITORY_ENV, || {
            ReleaseConfig::from_env(PathBuf::from("."))
        });

        assert!(matches!(
            result,
            Err(ChangelogError::MissingEnv {
                name: REPOSITORY_ENV
            })
        ));
    }

    #[test]
    fn branch_is_required_only_when_asked() {
        let config = temp_env::with_vars(
            [
                (REPOSITORY_ENV, Some("acme/template")),
                (BRANCH_ENV, None),
            ],
            || ReleaseConfig::from_env(PathBuf::from(".")).unwrap(),
        );

        assert!(matches!(
            config.branch(),
            Err(ChangelogError::MissingEnv { name: BRANCH_ENV })
        ));
    }

    #[test]
    fn rejects_malformed_repository() {
        for value in ["acme", "/template", "acme/", "acme/template/extra"] {
            assert!(
                matches!(
                    ReleaseConfig::new(value, PathBuf::from(".")),
                    Err(ChangelogError::InvalidRepository { .. })
                ),
                "{value}"
            );
        }
    }
}
