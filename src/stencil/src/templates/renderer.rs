//! Template renderer.

use super::extensions::{Extension, DEFAULT_EXTENSIONS};
use crate::error::{GenerateError, UndefinedVariable};
use handlebars::{no_escape, Handlebars, RenderErrorReason, Template};
use serde_json::Value;
use tracing::debug;

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (manifests and markdown are plain text)
/// - Strict mode (catches missing variables)
/// - The [`DEFAULT_EXTENSIONS`] plus any `extensions` requested
#[must_use]
pub fn create_handlebars_registry(extensions: &[Extension]) -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);

    for extension in DEFAULT_EXTENSIONS.iter().chain(extensions) {
        extension.register(&mut hbs);
    }

    hbs
}

/// Renders templates against a rendering context.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a renderer with only the default extensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(&[]),
        }
    }

    /// Creates a renderer with extra extensions looked up by name.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::UnknownExtension`] for a name that is not a
    /// known [`Extension`].
    pub fn with_extensions<S: AsRef<str>>(names: &[S]) -> Result<Self, GenerateError> {
        let extensions = names
            .iter()
            .map(|name| name.as_ref().parse::<Extension>())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = extensions.len(), "Enabling template extensions");

        Ok(Self {
            handlebars: create_handlebars_registry(&extensions),
        })
    }

    /// Renders `template` with `context`.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::TemplateSyntax`] if the template does not parse.
    /// - [`GenerateError::UndefinedVariableInTemplate`] if the template
    ///   references a variable missing from `context`.
    /// - [`GenerateError::Render`] for any other rendering failure.
    pub fn render(&self, template: &str, context: &Value) -> Result<String, GenerateError> {
        Template::compile(template)?;

        self.handlebars
            .render_template(template, context)
            .map_err(|error| match error.reason() {
                RenderErrorReason::MissingVariable(_) => {
                    UndefinedVariable::new("Unable to render template", error, context.clone())
                        .into()
                }
                _ => GenerateError::Render(error),
            })
    }
}
