//! Process-declaration manifest (Procfile).
//!
//! The manifest lists one `<role>: <command>` line per process of a
//! generated project. Which lines appear, and how the web server is started,
//! is decided by two [`ManifestFlags`] evaluated once at generation time.

mod flags;
mod role;

pub use flags::{ManifestFlags, ASYNC_FLAG, BACKGROUND_TASKS_FLAG};
pub use role::ProcessRole;

use crate::context::Context;
use crate::error::GenerateError;
use crate::templates::TemplateRenderer;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name the manifest is written to.
pub const MANIFEST_FILE: &str = "Procfile";

/// Runs database migrations on release.
pub const RELEASE_COMMAND: &str = "python manage.py migrate";

/// Synchronous web server.
pub const WEB_COMMAND: &str = "gunicorn config.wsgi:application";

/// Async-capable web server.
pub const ASYNC_WEB_COMMAND: &str =
    "gunicorn config.asgi:application -k uvicorn_worker.UvicornWorker";

/// Background task worker.
pub const WORKER_COMMAND: &str =
    "REMAP_SIGTERM=SIGQUIT celery -A config.celery_app worker --loglevel=info";

/// Periodic task scheduler.
pub const BEAT_COMMAND: &str =
    "REMAP_SIGTERM=SIGQUIT celery -A config.celery_app beat --loglevel=info";

/// A single `<role>: <command>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLine {
    /// Process role.
    pub role: ProcessRole,
    /// Command launching the process.
    pub command: String,
}

impl ManifestLine {
    /// Creates a line.
    pub fn new(role: ProcessRole, command: impl Into<String>) -> Self {
        Self {
            role,
            command: command.into(),
        }
    }
}

impl fmt::Display for ManifestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.command)
    }
}

/// An ordered list of manifest lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Lines in file order.
    pub lines: Vec<ManifestLine>,
}

impl Manifest {
    /// Builds the manifest selected by `flags`.
    #[must_use]
    pub fn from_flags(flags: ManifestFlags) -> Self {
        let web = if flags.async_web_server {
            ASYNC_WEB_COMMAND
        } else {
            WEB_COMMAND
        };

        let mut lines = vec![
            ManifestLine::new(ProcessRole::Release, RELEASE_COMMAND),
            ManifestLine::new(ProcessRole::Web, web),
        ];
        if flags.background_tasks {
            lines.push(ManifestLine::new(ProcessRole::Worker, WORKER_COMMAND));
            lines.push(ManifestLine::new(ProcessRole::Beat, BEAT_COMMAND));
        }

        Self { lines }
    }

    /// Parses manifest text. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::MalformedManifest`] for a line that isn't
    /// `<role>: <command>` with a known role and a non-empty command.
    pub fn parse(text: &str) -> Result<Self, GenerateError> {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(parse_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { lines })
    }

    /// Returns the lines declared for `role`.
    pub fn lines_for(&self, role: ProcessRole) -> impl Iterator<Item = &ManifestLine> {
        self.lines.iter().filter(move |line| line.role == role)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn parse_line(line: &str) -> Result<ManifestLine, GenerateError> {
    let malformed = || GenerateError::MalformedManifest {
        line: line.to_string(),
    };

    let (role, command) = line.split_once(':').ok_or_else(malformed)?;
    let command = command.trim();
    if command.is_empty() {
        return Err(malformed());
    }
    let role = role.trim().parse::<ProcessRole>().map_err(|_| malformed())?;

    Ok(ManifestLine::new(role, command))
}

/// Renders a manifest template against `context`.
///
/// The flags are normalised to booleans before rendering so `"y"`/`"n"`
/// values drive `{{#if}}` blocks correctly. Blank lines left behind by block
/// helpers are dropped and the output ends with a newline.
///
/// # Errors
///
/// Propagates flag and rendering errors, including
/// [`GenerateError::UndefinedVariableInTemplate`] for a template using a
/// variable the context doesn't define.
pub fn render_manifest(
    renderer: &TemplateRenderer,
    template: &str,
    context: &Context,
) -> Result<String, GenerateError> {
    let flags = ManifestFlags::from_context(context)?;
    debug!(
        async_web_server = flags.async_web_server,
        background_tasks = flags.background_tasks,
        "Rendering manifest"
    );

    let mut data = context.clone();
    data.insert(ASYNC_FLAG, Value::Bool(flags.async_web_server));
    data.insert(BACKGROUND_TASKS_FLAG, Value::Bool(flags.background_tasks));

    let rendered = renderer.render(template, &data.to_value())?;

    let mut output = String::with_capacity(rendered.len());
    for line in rendered.lines().filter(|line| !line.trim().is_empty()) {
        output.push_str(line.trim_end());
        output.push('\n');
    }
    Ok(output)
}

/// Writes `content` to `<dir>/Procfile`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`GenerateError::OutputDirExists`] if the file exists and
/// `overwrite` is false, and [`GenerateError::Io`] on write failure.
pub fn write_manifest(dir: &Path, content: &str, overwrite: bool) -> Result<PathBuf, GenerateError> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() && !overwrite {
        return Err(GenerateError::OutputDirExists {
            path: path.display().to_string(),
        });
    }

    std::fs::create_dir_all(dir).map_err(|e| GenerateError::io(dir, e))?;
    std::fs::write(&path, content).map_err(|e| GenerateError::io(&path, e))?;

    info!(path = %path.display(), "Wrote manifest");
    Ok(path)
}
