//! Optional template helpers, selectable by name.

use crate::error::GenerateError;
use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
};
use std::str::FromStr;

/// Extensions registered on every registry.
pub const DEFAULT_EXTENSIONS: &[Extension] = &[Extension::Eq];

/// A named helper that can be enabled on the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// `{{#if (eq a "b")}}`
    Eq,
    /// `{{upper name}}`
    Upper,
    /// `{{lower name}}`
    Lower,
    /// `{{slugify name}}`, lowercase with runs of non-alphanumerics collapsed to `-`.
    Slugify,
}

impl Extension {
    /// The helper name used in templates and config files.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Slugify => "slugify",
        }
    }

    pub(crate) fn register(&self, hbs: &mut Handlebars<'static>) {
        match self {
            Self::Eq => hbs.register_helper("eq", Box::new(eq_helper)),
            Self::Upper => hbs.register_helper("upper", Box::new(upper)),
            Self::Lower => hbs.register_helper("lower", Box::new(lower)),
            Self::Slugify => hbs.register_helper("slugify", Box::new(slugify)),
        }
    }
}

impl FromStr for Extension {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "eq" => Ok(Self::Eq),
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "slugify" => Ok(Self::Slugify),
            other => Err(GenerateError::UnknownExtension {
                name: other.to_string(),
            }),
        }
    }
}

/// Helper function for equality comparison in templates.
///
/// Usage: `{{#if (eq variable "value")}}...{{/if}}`
fn eq_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param1 = h.param(0).and_then(|v| v.value().as_str());
    let param2 = h.param(1).and_then(|v| v.value().as_str());

    let result = match (param1, param2) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    out.write(if result { "true" } else { "" })?;
    Ok(())
}

handlebars_helper!(upper: |s: str| s.to_uppercase());
handlebars_helper!(lower: |s: str| s.to_lowercase());
handlebars_helper!(slugify: |s: str| slug(s));

fn slug(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("eq".parse::<Extension>().unwrap(), Extension::Eq);
        assert_eq!(" slugify ".parse::<Extension>().unwrap(), Extension::Slugify);
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "humanize".parse::<Extension>().unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UnknownExtension { ref name } if name == "humanize"
        ));
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("My  Awesome__Project!"), "my-awesome-project");
        assert_eq!(slug("--leading"), "leading");
    }
}
