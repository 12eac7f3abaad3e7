//! Release tooling error types.

use thiserror::Error;

/// Errors that can occur while cutting a release.
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// A required environment variable is not set.
    #[error("No {name} set, please set the {name} environment variable")]
    MissingEnv { name: &'static str },

    /// The repository is not in `owner/name` form.
    #[error("Invalid repository '{value}', expected 'owner/name'")]
    InvalidRepository { value: String },

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A git command failed.
    #[error("git {command} failed: {message}")]
    GitFailed { command: String, message: String },

    /// Failed to read or write a file.
    #[error("Failed to access '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The changelog has no placeholder to insert the release after.
    #[error("'{path}' has no generator placeholder")]
    MissingPlaceholder { path: String },

    /// Rendering the release notes failed.
    #[error(transparent)]
    Template(#[from] crate::error::GenerateError),
}
