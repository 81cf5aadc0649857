use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::cli::Cli;
use crate::cli::output::{HumanLayout, OutputMode, emit_human, emit_status};
use crate::cli::prompt::{ORG_PROMPT, Prompter, REPO_PROMPT, TOKEN_PROMPT};
use crate::config::Config;
use crate::credentials::AccessToken;
use crate::error::{OrgpushError, Result};
use crate::provision::{CreateRepoRequest, GitHubClient};
use crate::publish::{GitCli, PublishReport, PublishSettings, Publisher};

pub struct AppContext {
    pub config: Config,
    pub work_dir: PathBuf,
    pub output_mode: OutputMode,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::load(cli.config.as_deref())?;
        if cli.private {
            config.repository.private = true;
        }

        let work_dir = match cli.dir.as_ref() {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        if !work_dir.is_dir() {
            return Err(OrgpushError::InvalidInput(format!(
                "{} is not a directory",
                work_dir.display()
            )));
        }

        Ok(Self {
            config,
            work_dir,
            output_mode: cli.output_mode(),
        })
    }
}

/// Answers gathered before any side effect happens.
#[derive(Debug)]
pub struct RunInputs {
    pub org: String,
    pub repo: String,
    pub token: AccessToken,
}

/// Fill in whatever the flags left out, asking in the fixed order org, repo, token.
pub fn collect_inputs(
    org: Option<&str>,
    repo: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<RunInputs> {
    let org = match org {
        Some(value) => value.to_string(),
        None => prompter.ask(ORG_PROMPT)?,
    };
    let repo = match repo {
        Some(value) => value.to_string(),
        None => prompter.ask(REPO_PROMPT)?,
    };
    let token = prompter.ask_secret(TOKEN_PROMPT)?;

    if org.trim().is_empty() {
        return Err(OrgpushError::InvalidInput(
            "organization name must not be empty".to_string(),
        ));
    }
    if repo.trim().is_empty() {
        return Err(OrgpushError::InvalidInput(
            "repository name must not be empty".to_string(),
        ));
    }

    Ok(RunInputs {
        org,
        repo,
        token: AccessToken::new(token)?,
    })
}

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub organization: String,
    pub repository: String,
    pub private: bool,
    pub clone_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    pub publish: PublishReport,
}

/// Provision, then publish. Publishing never starts unless provisioning succeeded.
pub fn run(ctx: &AppContext, inputs: &RunInputs) -> Result<RunReport> {
    let client = GitHubClient::from_config(&ctx.config.api)?;
    let request = CreateRepoRequest::new(&inputs.repo, ctx.config.repository.private);
    let created = client.create_org_repo(&inputs.org, &request, &inputs.token)?;
    emit_status(
        ctx.output_mode,
        &format!("Repository '{}' created successfully!", inputs.repo),
    );

    let git = GitCli::new(&ctx.work_dir)
        .with_binary(&ctx.config.git.path)
        .with_mask(inputs.token.clone());
    let publisher = Publisher::new(&git, PublishSettings::from_config(&ctx.config));
    let publish = publisher.publish(&created.clone_url, &inputs.token)?;
    info!(dir = %ctx.work_dir.display(), "publish complete");

    Ok(RunReport {
        organization: inputs.org.clone(),
        repository: inputs.repo.clone(),
        private: request.private,
        clone_url: created.clone_url,
        html_url: created.html_url,
        publish,
    })
}

/// Human summary printed after a successful run.
pub fn emit_summary(report: &RunReport) {
    let mut layout = HumanLayout::new();
    layout
        .title("Successfully pushed to remote repository!")
        .kv("repository", &format!("{}/{}", report.organization, report.repository))
        .kv("remote", &report.publish.remote_url)
        .kv("branch", &report.publish.branch);
    if let Some(url) = report.html_url.as_deref() {
        layout.kv("web", url);
    }
    emit_human(layout);
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::cli::prompt::LinePrompter;

    #[test]
    fn prompts_for_everything_when_no_flags() {
        let mut prompter = LinePrompter::new(Cursor::new("acme\nwidgets\nT\n"));
        let inputs = collect_inputs(None, None, &mut prompter).unwrap();
        assert_eq!(inputs.org, "acme");
        assert_eq!(inputs.repo, "widgets");
        assert_eq!(inputs.token.expose(), "T");
    }

    #[test]
    fn flags_skip_their_prompts() {
        let mut prompter = LinePrompter::new(Cursor::new("T\n"));
        let inputs = collect_inputs(Some("acme"), Some("widgets"), &mut prompter).unwrap();
        assert_eq!(inputs.org, "acme");
        assert_eq!(inputs.repo, "widgets");
        assert_eq!(inputs.token.expose(), "T");
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut prompter = LinePrompter::new(Cursor::new("\nwidgets\nT\n"));
        let err = collect_inputs(None, None, &mut prompter).unwrap_err();
        assert!(matches!(err, OrgpushError::InvalidInput(_)));

        let mut prompter = LinePrompter::new(Cursor::new("T\n"));
        let err = collect_inputs(Some("acme"), Some("  "), &mut prompter).unwrap_err();
        assert!(matches!(err, OrgpushError::InvalidInput(_)));
    }

    #[test]
    fn empty_token_is_rejected() {
        let mut prompter = LinePrompter::new(Cursor::new("acme\nwidgets\n\n"));
        let err = collect_inputs(None, None, &mut prompter).unwrap_err();
        assert!(matches!(err, OrgpushError::InvalidInput(_)));
    }

    #[test]
    fn missing_dir_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            org: None,
            repo: None,
            dir: Some(dir.path().join("missing")),
            private: false,
            config: Some(dir.path().join("absent.toml")),
            robot: false,
            verbose: 0,
            quiet: true,
        };
        assert!(matches!(
            AppContext::from_cli(&cli),
            Err(OrgpushError::InvalidInput(_))
        ));
    }
}
