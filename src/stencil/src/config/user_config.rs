//! User config deserialization.

use crate::error::GenerateError;
use crate::templates::TemplateRenderer;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the config file to use.
pub const CONFIG_ENV_VAR: &str = "STENCIL_CONFIG";

/// Config file looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".stencilrc";

/// On-disk layout of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    default_context: Map<String, Value>,
    replay_dir: Option<String>,
    #[serde(default)]
    extensions: Vec<String>,
    manifest_template: Option<PathBuf>,
}

/// Resolved user configuration.
#[derive(Debug, Clone)]
pub struct UserConfig {
    default_context: Map<String, Value>,
    replay_dir: PathBuf,
    extensions: Vec<String>,
    manifest_template: Option<PathBuf>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_context: Map::new(),
            replay_dir: home_dir().join(".stencil_replay"),
            extensions: Vec::new(),
            manifest_template: None,
        }
    }
}

impl UserConfig {
    /// Loads the user config.
    ///
    /// Lookup order:
    /// 1. `path`, if given
    /// 2. the file named by [`CONFIG_ENV_VAR`]
    /// 3. [`DEFAULT_CONFIG_FILE`] in the home directory, if it exists
    /// 4. built-in defaults
    ///
    /// # Errors
    ///
    /// - [`GenerateError::ConfigDoesNotExist`] if an explicitly named file is missing.
    /// - [`GenerateError::InvalidConfiguration`] if the file doesn't parse or validate.
    pub fn load(path: Option<&Path>) -> Result<Self, GenerateError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(GenerateError::ConfigDoesNotExist {
                    path: path.display().to_string(),
                });
            }
            return Self::from_file(&path);
        }

        let default_path = home_dir().join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::from_file(&default_path);
        }

        debug!("No user config found, using defaults");
        Ok(Self::default())
    }

    /// Parses and validates a config file.
    fn from_file(path: &Path) -> Result<Self, GenerateError> {
        info!(path = %path.display(), "Loading user config");

        let content = std::fs::read_to_string(path).map_err(|e| GenerateError::io(path, e))?;
        let raw: RawConfig =
            toml::from_str(&content).map_err(|e| GenerateError::InvalidConfiguration {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let replay_dir = match raw.replay_dir {
            Some(replay_dir) if replay_dir.trim().is_empty() => {
                return Err(GenerateError::InvalidConfiguration {
                    path: path.display().to_string(),
                    message: "replay-dir must not be empty".to_string(),
                });
            }
            Some(replay_dir) => expand_home(&replay_dir),
            None => Self::default().replay_dir,
        };

        // Relative templates are relative to the config file.
        let manifest_template = raw.manifest_template.map(|template| {
            if template.is_absolute() {
                template
            } else {
                path.parent().unwrap_or_else(|| Path::new(".")).join(template)
            }
        });

        Ok(Self {
            default_context: raw.default_context,
            replay_dir,
            extensions: raw.extensions,
            manifest_template,
        })
    }

    /// Values applied over every context before extra context.
    #[must_use]
    pub fn default_context(&self) -> &Map<String, Value> {
        &self.default_context
    }

    /// Directory replay files are written to.
    #[must_use]
    pub fn replay_dir(&self) -> &Path {
        &self.replay_dir
    }

    /// Names of extra template extensions.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Alternative manifest template, if configured.
    #[must_use]
    pub fn manifest_template(&self) -> Option<&Path> {
        self.manifest_template.as_deref()
    }

    /// Sets the replay directory.
    #[must_use]
    pub fn with_replay_dir(mut self, replay_dir: PathBuf) -> Self {
        self.replay_dir = replay_dir;
        self
    }

    /// Builds a renderer with the configured extensions.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnknownExtension`] for an unknown extension name.
    pub fn renderer(&self) -> Result<TemplateRenderer, GenerateError> {
        TemplateRenderer::with_extensions(&self.extensions)
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_full_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
replay-dir = "/tmp/replays"
extensions = ["upper"]
manifest-template = "Procfile.hbs"

[default-context]
use_async = "y"
"#,
        )
        .unwrap();

        let config = UserConfig::load(Some(&path)).unwrap();

        assert_eq!(config.replay_dir(), Path::new("/tmp/replays"));
        assert_eq!(config.extensions(), ["upper".to_string()]);
        assert_eq!(
            config.manifest_template(),
            Some(temp.path().join("Procfile.hbs").as_path())
        );
        assert_eq!(config.default_context().get("use_async"), Some(&json!("y")));
    }

    #[test]
    fn explicit_path_missing() {
        let temp = TempDir::new().unwrap();
        let result = UserConfig::load(Some(&temp.path().join("missing.toml")));

        assert!(matches!(
            result,
            Err(GenerateError::ConfigDoesNotExist { .. })
        ));
    }

    #[test]
    fn invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "replay-dir = [").unwrap();

        let result = UserConfig::load(Some(&path));
        assert!(matches!(
            result,
            Err(GenerateError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn unknown_key_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "abbreviations = {}").unwrap();

        let result = UserConfig::load(Some(&path));
        assert!(matches!(
            result,
            Err(GenerateError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn empty_replay_dir_is_invalid() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "replay-dir = \"  \"").unwrap();

        let result = UserConfig::load(Some(&path));
        assert!(matches!(
            result,
            Err(GenerateError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn env_var_names_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "extensions = [\"slugify\"]").unwrap();

        let config = temp_env::with_var(CONFIG_ENV_VAR, Some(&path), || {
            UserConfig::load(None).unwrap()
        });

        assert_eq!(config.extensions(), ["slugify".to_string()]);
    }

    #[test]
    fn env_var_pointing_nowhere() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");

        let result = temp_env::with_var(CONFIG_ENV_VAR, Some(&missing), || UserConfig::load(None));

        assert!(matches!(
            result,
            Err(GenerateError::ConfigDoesNotExist { .. })
        ));
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let temp = TempDir::new().unwrap();

        let config = temp_env::with_vars(
            [
                (CONFIG_ENV_VAR, None),
                ("HOME", Some(temp.path().as_os_str())),
            ],
            || UserConfig::load(None).unwrap(),
        );

        assert!(config.default_context().is_empty());
        assert!(config.extensions().is_empty());
        assert!(config.manifest_template().is_none());
    }

    #[test]
    fn tilde_expands_to_home() {
        assert_eq!(expand_home("~/replay"), home_dir().join("replay"));
        assert_eq!(expand_home("/abs"), PathBuf::from("/abs"));
    }
}
