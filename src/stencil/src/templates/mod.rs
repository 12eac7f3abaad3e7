//! Template rendering using Handlebars.
//!
//! This module provides the registry and renderer shared by the manifest and
//! changelog generators, mapping engine failures onto
//! [`GenerateError`](crate::error::GenerateError).

mod extensions;
mod renderer;

pub use extensions::{Extension, DEFAULT_EXTENSIONS};
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Bundled Procfile template.
pub const PROCFILE_TEMPLATE: &str = include_str!("../../templates/Procfile.hbs");

/// Bundled changelog section template.
pub const CHANGELOG_TEMPLATE: &str = include_str!("../../templates/changelog.md.hbs");
