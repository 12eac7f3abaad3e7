#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod changelog;
pub mod config;
pub mod context;
pub mod error;
pub mod manifest;
pub mod replay;
pub mod templates;
pub mod vcs;

pub use changelog::{
    ChangelogError, GroupedPulls, PullSummary, ReleaseConfig, ReleaseOutcome, Releaser,
};
pub use config::UserConfig;
pub use context::{resolve_context, Context, ContextSources};
pub use error::{ErrorKind, GenerateError, UndefinedVariable};
pub use manifest::{
    render_manifest, write_manifest, Manifest, ManifestFlags, ManifestLine, ProcessRole,
};
pub use templates::{create_handlebars_registry, Extension, TemplateRenderer};
pub use vcs::{identify_repo, is_vcs_installed, RepoType};
