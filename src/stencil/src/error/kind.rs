//! Error kind discriminants.

use std::fmt;

/// The kind of a [`GenerateError`](super::GenerateError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NonTemplatedInputDir,
    UnknownTemplateDir,
    MissingProjectDir,
    ConfigDoesNotExist,
    InvalidConfiguration,
    UnknownRepoType,
    VcsNotInstalled,
    ContextDecoding,
    OutputDirExists,
    EmptyDirName,
    InvalidMode,
    FailedHook,
    UndefinedVariableInTemplate,
    UnknownExtension,
    RepositoryNotFound,
    RepositoryCloneFailed,
    InvalidZipRepository,
    Io,
    Render,
    TemplateSyntax,
    MalformedManifest,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 21] = [
        Self::NonTemplatedInputDir,
        Self::UnknownTemplateDir,
        Self::MissingProjectDir,
        Self::ConfigDoesNotExist,
        Self::InvalidConfiguration,
        Self::UnknownRepoType,
        Self::VcsNotInstalled,
        Self::ContextDecoding,
        Self::OutputDirExists,
        Self::EmptyDirName,
        Self::InvalidMode,
        Self::FailedHook,
        Self::UndefinedVariableInTemplate,
        Self::UnknownExtension,
        Self::RepositoryNotFound,
        Self::RepositoryCloneFailed,
        Self::InvalidZipRepository,
        Self::Io,
        Self::Render,
        Self::TemplateSyntax,
        Self::MalformedManifest,
    ];

    /// Returns the snake_case name of the kind, as used in log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonTemplatedInputDir => "non_templated_input_dir",
            Self::UnknownTemplateDir => "unknown_template_dir",
            Self::MissingProjectDir => "missing_project_dir",
            Self::ConfigDoesNotExist => "config_does_not_exist",
            Self::InvalidConfiguration => "invalid_configuration",
            Self::UnknownRepoType => "unknown_repo_type",
            Self::VcsNotInstalled => "vcs_not_installed",
            Self::ContextDecoding => "context_decoding",
            Self::OutputDirExists => "output_dir_exists",
            Self::EmptyDirName => "empty_dir_name",
            Self::InvalidMode => "invalid_mode",
            Self::FailedHook => "failed_hook",
            Self::UndefinedVariableInTemplate => "undefined_variable_in_template",
            Self::UnknownExtension => "unknown_extension",
            Self::RepositoryNotFound => "repository_not_found",
            Self::RepositoryCloneFailed => "repository_clone_failed",
            Self::InvalidZipRepository => "invalid_zip_repository",
            Self::Io => "io",
            Self::Render => "render",
            Self::TemplateSyntax => "template_syntax",
            Self::MalformedManifest => "malformed_manifest",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = ErrorKind::ALL.iter().map(ErrorKind::as_str).collect();
        assert_eq!(names.len(), ErrorKind::ALL.len());
    }
}
