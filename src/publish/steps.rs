//! The ordered steps of a publish run.

use std::fmt;

use serde::Serialize;

/// One git invocation made while publishing, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStep {
    Init,
    ConfigUserName,
    ConfigUserEmail,
    AddAll,
    Status,
    Commit,
    RemoveRemote,
    AddRemote,
    Push,
}

impl PublishStep {
    /// Human-readable git subcommand for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ConfigUserName => "config user.name",
            Self::ConfigUserEmail => "config user.email",
            Self::AddAll => "add",
            Self::Status => "status",
            Self::Commit => "commit",
            Self::RemoveRemote => "remote remove",
            Self::AddRemote => "remote add",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
