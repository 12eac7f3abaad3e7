//! Assembling the final rendering context from its sources.

use super::Context;
use crate::config::UserConfig;
use crate::error::GenerateError;
use crate::replay;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Inputs that contribute to a rendering context.
#[derive(Debug, Clone, Copy)]
pub struct ContextSources<'a> {
    /// Declared variables and their defaults; the manifest flags when absent.
    pub context_file: Option<&'a Path>,
    /// Values given on the command line.
    pub extra_context: &'a Map<String, Value>,
    /// Reuse the context recorded by a previous run.
    pub replay: bool,
    /// Name the replay file is stored under.
    pub template_name: &'a str,
}

/// Resolves the rendering context.
///
/// Order of precedence, lowest first: the context file, the user's
/// `default-context`, then `extra_context`. With `replay` the recorded
/// context is returned as-is.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidMode`] if `replay` is combined with extra
/// context, and propagates loading/overwrite failures.
pub fn resolve_context(
    sources: ContextSources<'_>,
    config: &UserConfig,
) -> Result<Context, GenerateError> {
    if sources.replay {
        if !sources.extra_context.is_empty() {
            return Err(GenerateError::InvalidMode {
                message: "You can not use both replay and extra context at the same time"
                    .to_string(),
            });
        }
        info!(template = sources.template_name, "Replaying recorded context");
        return replay::load(config.replay_dir(), sources.template_name);
    }

    let mut context = match sources.context_file {
        Some(path) => Context::load(path)?,
        None => manifest_defaults(),
    };

    context.apply_overwrites(config.default_context())?;
    context.apply_overwrites(sources.extra_context)?;
    debug!(variables = context.as_map().len(), "Resolved context");

    Ok(context.resolved())
}

/// Context used when no context file is given: both manifest flags off.
fn manifest_defaults() -> Context {
    let mut context = Context::new();
    context.insert(crate::manifest::ASYNC_FLAG, "n");
    context.insert(crate::manifest::BACKGROUND_TASKS_FLAG, "n");
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    fn config_in(temp: &TempDir, body: &str) -> UserConfig {
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            format!(
                "replay-dir = \"{}\"\n{body}",
                temp.path().join("replay").display()
            ),
        )
        .unwrap();
        UserConfig::load(Some(&path)).unwrap()
    }

    #[test]
    fn defaults_without_context_file() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, "");
        let extra = Map::new();

        let context = resolve_context(
            ContextSources {
                context_file: None,
                extra_context: &extra,
                replay: false,
                template_name: "django",
            },
            &config,
        )
        .unwrap();

        assert!(!context.flag("use_async").unwrap());
        assert!(!context.flag("use_celery").unwrap());
    }

    #[test]
    fn extra_context_beats_default_context() {
        let temp = TempDir::new().unwrap();
        let config = config_in(
            &temp,
            "[default-context]\nuse_async = \"y\"\nuse_celery = \"y\"\n",
        );
        let extra = map(json!({"use_celery": "n"}));

        let context = resolve_context(
            ContextSources {
                context_file: None,
                extra_context: &extra,
                replay: false,
                template_name: "django",
            },
            &config,
        )
        .unwrap();

        assert!(context.flag("use_async").unwrap());
        assert!(!context.flag("use_celery").unwrap());
    }

    #[test]
    fn replay_with_extra_context_is_invalid() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, "");
        let extra = map(json!({"use_async": "y"}));

        let result = resolve_context(
            ContextSources {
                context_file: None,
                extra_context: &extra,
                replay: true,
                template_name: "django",
            },
            &config,
        );

        assert!(matches!(result, Err(GenerateError::InvalidMode { .. })));
    }

    #[test]
    fn replay_returns_recorded_context() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp, "");
        let mut recorded = Context::new();
        recorded.insert("use_async", "y");
        replay::dump(config.replay_dir(), "django", &recorded).unwrap();
        let extra = Map::new();

        let context = resolve_context(
            ContextSources {
                context_file: None,
                extra_context: &extra,
                replay: true,
                template_name: "django",
            },
            &config,
        )
        .unwrap();

        assert_eq!(context, recorded);
    }
}
