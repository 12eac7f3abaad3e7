//! Fetching templates from version control.
//!
//! Repositories are cloned by shelling out to `git` or `hg`. Failures are
//! classified into the generator's error kinds from the tool's output.

mod repo_type;

pub use repo_type::{identify_repo, repo_dir_name, RepoType};

use crate::error::GenerateError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, info_span, Instrument};

/// Markers in clone output meaning the repository doesn't exist.
const NOT_FOUND_MARKERS: &[&str] = &["not found", "does not exist"];

/// Markers in checkout output meaning the requested revision doesn't exist.
const BAD_CHECKOUT_MARKERS: &[&str] = &[
    "did not match any file(s) known to git",
    "unknown revision",
];

/// Returns true if the tool for `repo_type` can be executed.
pub async fn is_vcs_installed(repo_type: RepoType) -> bool {
    Command::new(repo_type.command())
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Clones `repo_url` into `clone_to_dir` and optionally checks out `checkout`.
///
/// # Arguments
///
/// * `repo_url` - Repository URL, optionally prefixed with `git+` or `hg+`
/// * `checkout` - Branch, tag or commit to check out after cloning
/// * `clone_to_dir` - Directory the repository directory is created in
/// * `overwrite` - Replace an existing clone instead of failing
///
/// # Returns
///
/// The path of the cloned repository.
///
/// # Errors
///
/// - [`GenerateError::UnknownRepoType`] if the URL maps to no VCS.
/// - [`GenerateError::EmptyDirName`] if the URL has no usable last path segment.
/// - [`GenerateError::VcsNotInstalled`] if the VCS tool is missing.
/// - [`GenerateError::OutputDirExists`] if the clone exists and `overwrite` is false.
/// - [`GenerateError::RepositoryNotFound`] if the remote doesn't exist.
/// - [`GenerateError::RepositoryCloneFailed`] for any other clone/checkout failure.
pub async fn clone(
    repo_url: &str,
    checkout: Option<&str>,
    clone_to_dir: &Path,
    overwrite: bool,
) -> Result<PathBuf, GenerateError> {
    let (repo_type, url) = identify_repo(repo_url)?;
    let name = repo_dir_name(repo_type, &url);
    // `.` and `..` would resolve to `clone_to_dir` or its parent.
    if name.is_empty() || name == "." || name == ".." {
        return Err(GenerateError::EmptyDirName);
    }
    let span = info_span!("clone", vcs = repo_type.command(), url = %url);

    async {
        if !is_vcs_installed(repo_type).await {
            return Err(GenerateError::VcsNotInstalled {
                vcs: repo_type.command().to_string(),
            });
        }

        fs::create_dir_all(clone_to_dir)
            .await
            .map_err(|e| GenerateError::io(clone_to_dir, e))?;

        let repo_dir = clone_to_dir.join(&name);
        let exists = fs::try_exists(&repo_dir)
            .await
            .map_err(|e| GenerateError::io(&repo_dir, e))?;
        if exists {
            if !overwrite {
                return Err(GenerateError::OutputDirExists {
                    path: repo_dir.display().to_string(),
                });
            }
            debug!(path = %repo_dir.display(), "Removing previous clone");
            fs::remove_dir_all(&repo_dir)
                .await
                .map_err(|e| GenerateError::io(&repo_dir, e))?;
        }

        info!(path = %repo_dir.display(), "Cloning repository");
        run_vcs(repo_type, clone_to_dir, &["clone", &url, &name])
            .await
            .map_err(|output| classify_clone_failure(&url, &output))?;

        if let Some(checkout) = checkout {
            debug!(checkout, "Checking out revision");
            let args = match repo_type {
                RepoType::Git => ["checkout", checkout],
                RepoType::Hg => ["update", checkout],
            };
            run_vcs(repo_type, &repo_dir, &args)
                .await
                .map_err(|output| classify_checkout_failure(&url, checkout, &output))?;
        }

        Ok(repo_dir)
    }
    .instrument(span)
    .await
}

/// Runs a VCS command, returning its combined output on failure.
async fn run_vcs(repo_type: RepoType, cwd: &Path, args: &[&str]) -> Result<(), String> {
    let output = Command::new(repo_type.command())
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| format!("Failed to execute {} {}: {e}", repo_type.command(), args.join(" ")))?;

    if output.status.success() {
        return Ok(());
    }

    let mut message = String::from_utf8_lossy(&output.stderr).into_owned();
    message.push_str(&String::from_utf8_lossy(&output.stdout));
    Err(message.trim().to_string())
}

fn classify_clone_failure(url: &str, output: &str) -> GenerateError {
    let lower = output.to_lowercase();
    if NOT_FOUND_MARKERS.iter().any(|marker| lower.contains(marker)) {
        GenerateError::RepositoryNotFound {
            repository: url.to_string(),
        }
    } else {
        GenerateError::RepositoryCloneFailed {
            repository: url.to_string(),
            message: output.to_string(),
        }
    }
}

fn classify_checkout_failure(url: &str, checkout: &str, output: &str) -> GenerateError {
    let message = if BAD_CHECKOUT_MARKERS.iter().any(|marker| output.contains(marker)) {
        format!("The revision '{checkout}' could not be found")
    } else {
        output.to_string()
    };
    GenerateError::RepositoryCloneFailed {
        repository: url.to_string(),
        message,
    }
}
