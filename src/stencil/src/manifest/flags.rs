//! Template flags selecting manifest lines.

use crate::context::Context;
use crate::error::GenerateError;

/// Context key enabling the async-capable web server.
pub const ASYNC_FLAG: &str = "use_async";

/// Context key enabling the background task system.
pub const BACKGROUND_TASKS_FLAG: &str = "use_celery";

/// Flags fixed at generation time that shape the manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestFlags {
    /// Serve the web process with an async-capable worker class.
    pub async_web_server: bool,
    /// Add a task worker and a scheduler.
    pub background_tasks: bool,
}

impl ManifestFlags {
    /// Creates flags from explicit values.
    #[must_use]
    pub fn new(async_web_server: bool, background_tasks: bool) -> Self {
        Self {
            async_web_server,
            background_tasks,
        }
    }

    /// Reads the flags from a rendering context.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfiguration`] if either value isn't
    /// a yes/no flag.
    pub fn from_context(context: &Context) -> Result<Self, GenerateError> {
        Ok(Self {
            async_web_server: context.flag(ASYNC_FLAG)?,
            background_tasks: context.flag(BACKGROUND_TASKS_FLAG)?,
        })
    }
}
