//! Error taxonomy for template generation.
//!
//! Every failure the generator can report is a variant of [`GenerateError`],
//! so a caller prepared to handle `GenerateError` handles all of them.
//! [`ErrorKind`] gives a cheap, copyable way to tell the kinds apart.

mod kind;
mod undefined;

pub use kind::ErrorKind;
pub use undefined::UndefinedVariable;

use thiserror::Error;

/// Any failure originating from the template generator.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The input directory is not a template.
    #[error("Input directory is not templated: {path}")]
    NonTemplatedInputDir { path: String },

    /// No single template directory could be identified.
    #[error("Unable to identify the template directory in '{path}'")]
    UnknownTemplateDir { path: String },

    /// The generated project directory is missing.
    #[error("Generated project directory is missing: {path}")]
    MissingProjectDir { path: String },

    /// An explicitly requested config file does not exist.
    #[error("Config file does not exist: {path}")]
    ConfigDoesNotExist { path: String },

    /// The config file could not be parsed or failed validation.
    #[error("Invalid configuration in '{path}': {message}")]
    InvalidConfiguration { path: String, message: String },

    /// The repository URL does not map to a supported VCS.
    #[error("Unknown repository type: {url}")]
    UnknownRepoType { url: String },

    /// The VCS executable required for a repository is not available.
    #[error("'{vcs}' is not installed")]
    VcsNotInstalled { vcs: String },

    /// The rendering context file could not be decoded.
    #[error("JSON decoding error while loading '{path}'. Decoding error details: '{message}'")]
    ContextDecoding { path: String, message: String },

    /// The output target already exists and overwriting was not requested.
    #[error("Output directory or file already exists: {path}")]
    OutputDirExists { path: String },

    /// A directory name derived from a template or repository URL came out empty.
    #[error("Rendered directory name is empty")]
    EmptyDirName,

    /// Incompatible generation options were combined.
    #[error("Invalid mode: {message}")]
    InvalidMode { message: String },

    /// A generation hook failed.
    #[error("Hook script failed: {message}")]
    FailedHook { message: String },

    /// A template referenced a variable missing from the rendering context.
    #[error(transparent)]
    UndefinedVariableInTemplate(Box<UndefinedVariable>),

    /// A renderer extension was requested that does not exist.
    #[error("Unable to load extension: {name}")]
    UnknownExtension { name: String },

    /// The repository could not be found.
    #[error("Repository not found: {repository}")]
    RepositoryNotFound { repository: String },

    /// The repository was fetched but could not be brought to the requested state.
    #[error("Failed to clone repository '{repository}': {message}")]
    RepositoryCloneFailed { repository: String, message: String },

    /// The zip archive is not a valid template repository.
    #[error("Invalid zip repository: {path}")]
    InvalidZipRepository { path: String },

    /// Failed to read or write a file.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Rendering failed for a reason other than an undefined variable.
    #[error("Template rendering error: {0}")]
    Render(#[source] handlebars::RenderError),

    /// The template source is not valid handlebars.
    #[error("Template syntax error: {0}")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    /// A manifest line is not of the form `<role>: <command>`.
    #[error("Malformed manifest line: '{line}'")]
    MalformedManifest { line: String },
}

impl GenerateError {
    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonTemplatedInputDir { .. } => ErrorKind::NonTemplatedInputDir,
            Self::UnknownTemplateDir { .. } => ErrorKind::UnknownTemplateDir,
            Self::MissingProjectDir { .. } => ErrorKind::MissingProjectDir,
            Self::ConfigDoesNotExist { .. } => ErrorKind::ConfigDoesNotExist,
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
            Self::UnknownRepoType { .. } => ErrorKind::UnknownRepoType,
            Self::VcsNotInstalled { .. } => ErrorKind::VcsNotInstalled,
            Self::ContextDecoding { .. } => ErrorKind::ContextDecoding,
            Self::OutputDirExists { .. } => ErrorKind::OutputDirExists,
            Self::EmptyDirName => ErrorKind::EmptyDirName,
            Self::InvalidMode { .. } => ErrorKind::InvalidMode,
            Self::FailedHook { .. } => ErrorKind::FailedHook,
            Self::UndefinedVariableInTemplate(_) => ErrorKind::UndefinedVariableInTemplate,
            Self::UnknownExtension { .. } => ErrorKind::UnknownExtension,
            Self::RepositoryNotFound { .. } => ErrorKind::RepositoryNotFound,
            Self::RepositoryCloneFailed { .. } => ErrorKind::RepositoryCloneFailed,
            Self::InvalidZipRepository { .. } => ErrorKind::InvalidZipRepository,
            Self::Io { .. } => ErrorKind::Io,
            Self::Render(_) => ErrorKind::Render,
            Self::TemplateSyntax(_) => ErrorKind::TemplateSyntax,
            Self::MalformedManifest { .. } => ErrorKind::MalformedManifest,
        }
    }

    /// Builds an I/O error tagged with the path that failed.
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<UndefinedVariable> for GenerateError {
    fn from(value: UndefinedVariable) -> Self {
        Self::UndefinedVariableInTemplate(Box::new(value))
    }
}
