//! Committing, tagging and pushing a release.

use super::error::ChangelogError;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Commits `paths`, creates an annotated tag for `release` and returns the
/// commit message used.
///
/// The commit author is taken from the repository's git config.
///
/// # Errors
///
/// Returns [`ChangelogError::GitFailed`] if any git command fails.
pub async fn commit_and_tag(
    root: &Path,
    paths: &[&Path],
    release: &str,
) -> Result<String, ChangelogError> {
    for path in paths {
        let path = path.to_string_lossy();
        run_git_command(root, &["add", &path]).await?;
    }

    let message = format!("Release {release}");
    let user = run_git_command(root, &["config", "--get", "user.name"]).await?;
    let email = run_git_command(root, &["config", "--get", "user.email"]).await?;
    let author = format!("{user} <{email}>");

    debug!(author = %author, "Committing release");
    run_git_command(root, &["commit", "-m", &message, "--author", &author]).await?;
    run_git_command(root, &["tag", "-a", release, "-m", &message]).await?;

    Ok(message)
}

/// Pushes `branch` and all tags to the GitHub repository.
///
/// # Errors
///
/// Returns [`ChangelogError::GitFailed`] if a push fails.
pub async fn push_release(
    root: &Path,
    repository: &str,
    branch: &str,
    token: Option<&str>,
) -> Result<(), ChangelogError> {
    let server = match token {
        Some(token) => format!("https://{token}@github.com/{repository}.git"),
        None => format!("https://github.com/{repository}.git"),
    };

    info!(branch, repository, "Pushing release");
    run_git_command(root, &["push", &server, branch]).await?;
    run_git_command(root, &["push", "--tags", &server, branch]).await?;
    Ok(())
}

/// Runs a git command, returning its trimmed stdout.
async fn run_git_command(path: &Path, args: &[&str]) -> Result<String, ChangelogError> {
    // Keep the token out of errors and logs.
    let command = args
        .iter()
        .map(|arg| {
            if arg.starts_with("https://") && arg.contains('@') {
                "<remote>"
            } else {
                *arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ChangelogError::GitFailed {
            command: command.clone(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ChangelogError::GitFailed {
            command,
            message: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    async fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn commits_and_tags_release() {
        if !git_available().await {
            return;
        }
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        run_git_command(root, &["init", "-q"]).await.unwrap();
        run_git_command(root, &["config", "user.name", "Release Bot"]).await.unwrap();
        run_git_command(root, &["config", "user.email", "bot@example.com"]).await.unwrap();
        run_git_command(root, &["config", "commit.gpgsign", "false"]).await.unwrap();
        run_git_command(root, &["config", "tag.gpgsign", "false"]).await.unwrap();

        let changelog = root.join("CHANGELOG.md");
        fs::write(&changelog, "# Changelog\n").unwrap();

        let message = commit_and_tag(root, &[changelog.as_path()], "2026.10.18")
            .await
            .unwrap();

        assert_eq!(message, "Release 2026.10.18");
        let tags = run_git_command(root, &["tag", "--list"]).await.unwrap();
        assert_eq!(tags, "2026.10.18");
        let author = run_git_command(root, &["log", "-1", "--format=%an <%ae>"])
            .await
            .unwrap();
        assert_eq!(author, "Release Bot <bot@example.com>");
    }

    #[tokio::test]
    async fn failing_command_reports_stderr() {
        if !git_available().await {
            return;
        }
        let temp = TempDir::new().unwrap();

        let err = run_git_command(temp.path(), &["rev-parse", "HEAD"])
            .await
            .unwrap_err();

        assert!(matches!(err, ChangelogError::GitFailed { ref command, .. } if command == "rev-parse HEAD"));
    }
}
