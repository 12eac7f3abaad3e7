//! Release notes rendering and file updates.

use super::error::ChangelogError;
use super::pulls::GroupedPulls;
use crate::templates::TemplateRenderer;
use chrono::NaiveDate;
use regex::{NoExpand, Regex};
use serde_json::json;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Marker in the changelog that new releases are inserted after.
pub const GENERATOR_PLACEHOLDER: &str = "<!-- GENERATOR_PLACEHOLDER -->";

/// Release name for a merge date, e.g. `2026.10.18`.
#[must_use]
pub fn release_name(date: NaiveDate) -> String {
    date.format("%Y.%m.%d").to_string()
}

/// Renders the release notes for `grouped` with `template`.
///
/// Empty sections are left out of the template data.
///
/// # Errors
///
/// Returns [`ChangelogError::Template`] if rendering fails.
pub fn generate_markdown(
    renderer: &TemplateRenderer,
    template: &str,
    grouped: &GroupedPulls,
) -> Result<String, ChangelogError> {
    let sections: Vec<_> = grouped
        .sections()
        .iter()
        .filter(|(_, pulls)| !pulls.is_empty())
        .map(|(title, pulls)| json!({ "title": title, "pulls": pulls }))
        .collect();

    Ok(renderer.render(template, &json!({ "sections": sections }))?)
}

/// Inserts `## <release>` and `content` right after the placeholder.
///
/// # Errors
///
/// Returns [`ChangelogError::MissingPlaceholder`] if the file has no
/// placeholder, or [`ChangelogError::IoError`] on read/write failure.
pub fn write_changelog(path: &Path, release: &str, content: &str) -> Result<(), ChangelogError> {
    let old_content = read(path)?;
    if !old_content.contains(GENERATOR_PLACEHOLDER) {
        return Err(ChangelogError::MissingPlaceholder {
            path: path.display().to_string(),
        });
    }

    let entry = format!("{GENERATOR_PLACEHOLDER}\n\n## {release}\n{content}");
    let updated = old_content.replacen(GENERATOR_PLACEHOLDER, &entry, 1);
    write(path, &updated)?;

    debug!(path = %path.display(), release, "Updated changelog");
    Ok(())
}

/// A `version = "X.Y.Z"` line with a line break on both sides.
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\nversion = "\d+\.\d+\.\d+"\n"#).expect("version pattern is valid")
});

/// Replaces every `version = "X.Y.Z"` line with `version = "<release>"`.
///
/// Only lines preceded and followed by a line break are considered, so a
/// version on the very first or last line of the file is left alone.
/// Returns whether a version line was found.
///
/// # Errors
///
/// Returns [`ChangelogError::IoError`] on read/write failure.
pub fn update_version(path: &Path, release: &str) -> Result<bool, ChangelogError> {
    let old_content = read(path)?;

    if !VERSION_LINE.is_match(&old_content) {
        warn!(path = %path.display(), "No version line found");
        return Ok(false);
    }

    let replacement = format!("\nversion = \"{release}\"\n");
    let updated = VERSION_LINE.replace_all(&old_content, NoExpand(&replacement));
    write(path, &updated)?;
    debug!(path = %path.display(), release, "Updated version");
    Ok(true)
}

fn read(path: &Path) -> Result<String, ChangelogError> {
    std::fs::read_to_string(path).map_err(|e| ChangelogError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

fn write(path: &Path, content: &str) -> Result<(), ChangelogError> {
    std::fs::write(path, content).map_err(|e| ChangelogError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::PullSummary;
    use crate::templates::CHANGELOG_TEMPLATE;
    use std::fs;
    use tempfile::TempDir;

    fn pull(number: u64, title: &str, labels: &[&str]) -> PullSummary {
        PullSummary {
            number,
            title: title.to_string(),
            url: format!("https://github.com/acme/template/pull/{number}"),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            merged_at: None,
        }
    }

    #[test]
    fn test_release_name() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(release_name(date), "2026.01.05");
    }

    #[test]
    fn test_generate_markdown() {
        let grouped = GroupedPulls::from_pulls([
            pull(10, "Add async web server option", &[]),
            pull(11, "Fix worker shutdown", &["bug"]),
        ]);

        let markdown =
            generate_markdown(&TemplateRenderer::new(), CHANGELOG_TEMPLATE, &grouped).unwrap();

        assert!(markdown.contains("### Changed"));
        assert!(markdown.contains(
            "- Add async web server option ([#10](https://github.com/acme/template/pull/10))"
        ));
        assert!(markdown.contains("### Fixed"));
        assert!(!markdown.contains("### Documentation"));
        assert!(markdown.find("### Changed") < markdown.find("### Fixed"));
    }

    #[test]
    fn test_write_changelog() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        fs::write(
            &path,
            "# Changelog\n\n<!-- GENERATOR_PLACEHOLDER -->\n\n## 2026.10.01\n- Old\n",
        )
        .unwrap();

        write_changelog(&path, "2026.10.18", "- New\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Changelog\n\n<!-- GENERATOR_PLACEHOLDER -->\n\n## 2026.10.18\n- New\n\n\n## 2026.10.01\n- Old\n"
        );
    }

    #[test]
    fn test_write_changelog_without_placeholder() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        fs::write(&path, "# Changelog\n").unwrap();

        let result = write_changelog(&path, "2026.10.18", "- New\n");
        assert!(matches!(
            result,
            Err(ChangelogError::MissingPlaceholder { .. })
        ));
    }

    #[test]
    fn test_update_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("setup.py");
        fs::write(
            &path,
            "from setuptools import setup\n\nversion = \"2026.10.01\"\n\nsetup(version=version)\n",
        )
        .unwrap();

        assert!(update_version(&path, "2026.10.18").unwrap());

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "from setuptools import setup\n\nversion = \"2026.10.18\"\n\nsetup(version=version)\n"
        );
    }

    #[test]
    fn test_update_version_ignores_other_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("setup.py");
        let content = "python_version = \"3.12.1\"\nversion = \"1.2\"\n";
        fs::write(&path, content).unwrap();

        assert!(!update_version(&path, "2026.10.18").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_update_version_skips_first_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("setup.py");
        let content = "version = \"2026.10.01\"\nsetup(version=version)\n";
        fs::write(&path, content).unwrap();

        assert!(!update_version(&path, "2026.10.18").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}
