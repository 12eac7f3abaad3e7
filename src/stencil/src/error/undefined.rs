//! Undefined template variable error.

use serde_json::Value;
use std::fmt;

/// A template referenced a variable that was undefined at render time.
///
/// Carries the human-readable message, the underlying rendering error and
/// the rendering context that was active when rendering failed.
#[derive(Debug)]
pub struct UndefinedVariable {
    message: String,
    error: handlebars::RenderError,
    context: Value,
}

impl UndefinedVariable {
    /// Creates a new undefined variable error.
    pub fn new(message: impl Into<String>, error: handlebars::RenderError, context: Value) -> Self {
        Self {
            message: message.into(),
            error,
            context,
        }
    }

    /// The human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The rendering error raised by the template engine.
    #[must_use]
    pub fn error(&self) -> &handlebars::RenderError {
        &self.error
    }

    /// The rendering context active at failure time.
    #[must_use]
    pub fn context(&self) -> &Value {
        &self.context
    }
}

impl fmt::Display for UndefinedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. Error message: {}. Context: {}",
            self.message, self.error, self.context
        )
    }
}

impl std::error::Error for UndefinedVariable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
