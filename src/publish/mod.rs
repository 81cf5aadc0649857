//! Local publishing.
//!
//! Turns the working directory into a commit on `master` and pushes it to the
//! freshly created repository. Each git step depends on the previous one; the
//! first failure ends the run and nothing already done is undone.

pub mod git;
pub mod steps;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::credentials::{AccessToken, CredentialMode};
use crate::error::{OrgpushError, Result};
use crate::utils::git::{is_repo, is_status_clean};

pub use git::GitCli;
pub use steps::PublishStep;

pub const REMOTE_NAME: &str = "origin";
pub const BRANCH: &str = "master";
pub const COMMIT_MESSAGE: &str = "Initial commit";

/// Identity and transport choices applied on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub committer_name: String,
    pub committer_email: String,
    pub credential_mode: CredentialMode,
}

impl PublishSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            committer_name: config.publish.committer_name.clone(),
            committer_email: config.publish.committer_email.clone(),
            credential_mode: config.git.credential_mode,
        }
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// What a successful publish did.
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// `git init` ran because no `.git` existed.
    pub initialized: bool,
    /// A previous `origin` was removed.
    pub replaced_remote: bool,
    pub remote: String,
    pub branch: String,
    /// Remote URL with the token masked.
    pub remote_url: String,
    pub steps: Vec<PublishStep>,
}

pub struct Publisher<'a> {
    git: &'a GitCli,
    settings: PublishSettings,
}

impl<'a> Publisher<'a> {
    #[must_use]
    pub const fn new(git: &'a GitCli, settings: PublishSettings) -> Self {
        Self { git, settings }
    }

    /// Commit everything in the working directory and push it to `clone_url`.
    pub fn publish(&self, clone_url: &str, token: &AccessToken) -> Result<PublishReport> {
        let mut steps = Vec::new();

        let initialized = !is_repo(self.git.work_dir());
        if initialized {
            self.git.run(PublishStep::Init, &["init"])?;
            steps.push(PublishStep::Init);
        } else {
            debug!(dir = %self.git.work_dir().display(), "existing git repository");
        }

        self.git.run(
            PublishStep::ConfigUserName,
            &["config", "user.name", self.settings.committer_name.as_str()],
        )?;
        steps.push(PublishStep::ConfigUserName);
        self.git.run(
            PublishStep::ConfigUserEmail,
            &["config", "user.email", self.settings.committer_email.as_str()],
        )?;
        steps.push(PublishStep::ConfigUserEmail);

        self.git.run(PublishStep::AddAll, &["add", "."])?;
        steps.push(PublishStep::AddAll);

        let status = self.git.run(PublishStep::Status, &["status", "--porcelain"])?;
        steps.push(PublishStep::Status);
        if is_status_clean(&status) {
            return Err(OrgpushError::NothingToCommit);
        }

        self.git
            .run(PublishStep::Commit, &["commit", "-m", COMMIT_MESSAGE])?;
        steps.push(PublishStep::Commit);

        let replaced_remote = self
            .git
            .try_run(PublishStep::RemoveRemote, &["remote", "remove", REMOTE_NAME])?;
        steps.push(PublishStep::RemoveRemote);

        let (remote_url, push_env) = match self.settings.credential_mode {
            CredentialMode::Url => (token.embed_in_clone_url(clone_url)?, Vec::new()),
            CredentialMode::Header => {
                if !clone_url.starts_with("https://") {
                    return Err(OrgpushError::InvalidResponse(format!(
                        "clone URL {clone_url} is not an https:// URL"
                    )));
                }
                (clone_url.to_string(), extra_header_env(token))
            }
        };
        self.git
            .run(PublishStep::AddRemote, &["remote", "add", REMOTE_NAME, remote_url.as_str()])?;
        steps.push(PublishStep::AddRemote);

        let mut env_vars = vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())];
        env_vars.extend(push_env);
        self.git.run_with_env(
            PublishStep::Push,
            &["push", "-u", REMOTE_NAME, BRANCH],
            &env_vars,
        )?;
        steps.push(PublishStep::Push);

        info!(remote = REMOTE_NAME, branch = BRANCH, "pushed to remote repository");

        Ok(PublishReport {
            initialized,
            replaced_remote,
            remote: REMOTE_NAME.to_string(),
            branch: BRANCH.to_string(),
            remote_url: token.redact(&remote_url),
            steps,
        })
    }
}

/// One-off git config entry carrying the credential, scoped to the child process.
fn extra_header_env(token: &AccessToken) -> Vec<(String, String)> {
    vec![
        ("GIT_CONFIG_COUNT".to_string(), "1".to_string()),
        ("GIT_CONFIG_KEY_0".to_string(), "http.extraHeader".to_string()),
        ("GIT_CONFIG_VALUE_0".to_string(), token.basic_authorization()),
    ]
}
