//! Process roles.

use crate::error::GenerateError;
use std::fmt;
use std::str::FromStr;

/// The role a manifest line launches a process for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcessRole {
    /// One-off step run on every deploy, before the new release starts.
    Release,
    /// HTTP server.
    Web,
    /// Background task worker.
    Worker,
    /// Periodic task scheduler.
    Beat,
}

impl ProcessRole {
    /// Returns the role name as written in the manifest.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Web => "web",
            Self::Worker => "worker",
            Self::Beat => "beat",
        }
    }
}

impl fmt::Display for ProcessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessRole {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(Self::Release),
            "web" => Ok(Self::Web),
            "worker" => Ok(Self::Worker),
            "beat" => Ok(Self::Beat),
            other => Err(GenerateError::MalformedManifest {
                line: other.to_string(),
            }),
        }
    }
}
