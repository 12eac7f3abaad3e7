//! Recording and replaying rendering contexts.
//!
//! Each run's resolved context is stored as `<replay_dir>/<template>.json`
//! so a later run can regenerate the same output without re-entering values.

use crate::context::Context;
use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level key the context is stored under.
const REPLAY_KEY: &str = "stencil";

#[derive(Serialize)]
struct ReplayFileRef<'a> {
    stencil: &'a Context,
}

#[derive(Deserialize)]
struct ReplayFile {
    stencil: Context,
}

/// Returns the replay file path for `template_name`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidConfiguration`] for an empty name.
pub fn replay_file(replay_dir: &Path, template_name: &str) -> Result<PathBuf, GenerateError> {
    let name = template_name.trim();
    if name.is_empty() {
        return Err(GenerateError::InvalidConfiguration {
            path: replay_dir.display().to_string(),
            message: "template name for replay must not be empty".to_string(),
        });
    }

    let file_name = if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    };
    Ok(replay_dir.join(file_name))
}

/// Writes `context` to the replay file for `template_name`.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the directory or file can't be written.
pub fn dump(
    replay_dir: &Path,
    template_name: &str,
    context: &Context,
) -> Result<PathBuf, GenerateError> {
    let path = replay_file(replay_dir, template_name)?;

    std::fs::create_dir_all(replay_dir).map_err(|e| GenerateError::io(replay_dir, e))?;

    let content = serde_json::to_string_pretty(&ReplayFileRef { stencil: context })
        .map_err(|e| GenerateError::ContextDecoding {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    std::fs::write(&path, content).map_err(|e| GenerateError::io(&path, e))?;

    debug!(path = %path.display(), "Recorded replay context");
    Ok(path)
}

/// Reads the replay file for `template_name`.
///
/// # Errors
///
/// Returns [`GenerateError::Io`] if the file can't be read and
/// [`GenerateError::ContextDecoding`] if it has no valid `stencil` object.
pub fn load(replay_dir: &Path, template_name: &str) -> Result<Context, GenerateError> {
    let path = replay_file(replay_dir, template_name)?;
    info!(path = %path.display(), "Loading replay context");

    let content = std::fs::read_to_string(&path).map_err(|e| GenerateError::io(&path, e))?;
    let file: ReplayFile =
        serde_json::from_str(&content).map_err(|e| GenerateError::ContextDecoding {
            path: path.display().to_string(),
            message: format!("{e} (expected a '{REPLAY_KEY}' object)"),
        })?;

    Ok(file.stencil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dump_then_load() {
        let temp = TempDir::new().unwrap();
        let replay_dir = temp.path().join("nested/replay");
        let mut context = Context::new();
        context.insert("use_async", "y");
        context.insert("project_name", "Acme");

        let path = dump(&replay_dir, "django", &context).unwrap();

        assert_eq!(path, replay_dir.join("django.json"));
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["stencil"]["project_name"], json!("Acme"));
        assert_eq!(load(&replay_dir, "django").unwrap(), context);
    }

    #[test]
    fn json_suffix_not_doubled() {
        let temp = TempDir::new().unwrap();
        let path = replay_file(temp.path(), "django.json").unwrap();
        assert_eq!(path, temp.path().join("django.json"));
    }

    #[test]
    fn empty_template_name() {
        let temp = TempDir::new().unwrap();
        let result = dump(temp.path(), " ", &Context::new());

        assert!(matches!(
            result,
            Err(GenerateError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn load_without_key() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("django.json"), r#"{"cookies": {}}"#).unwrap();

        let result = load(temp.path(), "django");
        assert!(matches!(result, Err(GenerateError::ContextDecoding { .. })));
    }

    #[test]
    fn load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load(temp.path(), "django");
        assert!(matches!(result, Err(GenerateError::Io { .. })));
    }
}
