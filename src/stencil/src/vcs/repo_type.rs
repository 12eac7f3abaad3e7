//! Repository type detection.

use crate::error::GenerateError;

/// A supported version control system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoType {
    Git,
    Hg,
}

impl RepoType {
    /// The executable used for this VCS.
    #[must_use]
    pub fn command(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Hg => "hg",
        }
    }
}

/// Determines the VCS for `repo_url`, returning it with the URL to clone.
///
/// An explicit `git+` or `hg+` prefix wins and is stripped. Otherwise URLs
/// mentioning `git` are git and Bitbucket URLs are Mercurial.
///
/// # Errors
///
/// Returns [`GenerateError::UnknownRepoType`] if no VCS matches.
pub fn identify_repo(repo_url: &str) -> Result<(RepoType, String), GenerateError> {
    if let Some(url) = repo_url.strip_prefix("git+") {
        return Ok((RepoType::Git, url.to_string()));
    }
    if let Some(url) = repo_url.strip_prefix("hg+") {
        return Ok((RepoType::Hg, url.to_string()));
    }

    if repo_url.contains("git") {
        Ok((RepoType::Git, repo_url.to_string()))
    } else if repo_url.contains("bitbucket") {
        Ok((RepoType::Hg, repo_url.to_string()))
    } else {
        Err(GenerateError::UnknownRepoType {
            url: repo_url.to_string(),
        })
    }
}

/// Name of the directory a clone of `url` lands in.
///
/// The last path segment of the URL, with `.git` removed for git.
#[must_use]
pub fn repo_dir_name(repo_type: RepoType, url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        // scp-like (`git@host:owner/repo.git`) or local paths
        _ => url.rsplit(':').next().unwrap_or(url).to_string(),
    };

    let last = path
        .trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    match repo_type {
        RepoType::Git => last.strip_suffix(".git").unwrap_or(last).to_string(),
        RepoType::Hg => last.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_prefixed_urls() {
        assert_eq!(
            identify_repo("git+https://example.com/acme/template").unwrap(),
            (RepoType::Git, "https://example.com/acme/template".to_string())
        );
        assert_eq!(
            identify_repo("hg+https://example.com/acme/template").unwrap(),
            (RepoType::Hg, "https://example.com/acme/template".to_string())
        );
    }

    #[test]
    fn identifies_by_host() {
        assert_eq!(
            identify_repo("https://github.com/acme/template.git").unwrap().0,
            RepoType::Git
        );
        assert_eq!(
            identify_repo("https://bitbucket.org/acme/template").unwrap().0,
            RepoType::Hg
        );
    }

    #[test]
    fn rejects_unknown() {
        assert!(matches!(
            identify_repo("https://example.com/template.zip"),
            Err(GenerateError::UnknownRepoType { .. })
        ));
    }

    #[test]
    fn directory_names() {
        assert_eq!(
            repo_dir_name(RepoType::Git, "https://github.com/acme/template.git"),
            "template"
        );
        assert_eq!(
            repo_dir_name(RepoType::Git, "https://github.com/acme/template/"),
            "template"
        );
        assert_eq!(
            repo_dir_name(RepoType::Git, "git@github.com:acme/template.git"),
            "template"
        );
        assert_eq!(
            repo_dir_name(RepoType::Git, "/srv/repos/template.git"),
            "template"
        );
        assert_eq!(
            repo_dir_name(RepoType::Hg, "https://bitbucket.org/acme/template"),
            "template"
        );
    }
}
