//! GitHub REST client for organization repository creation.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::credentials::AccessToken;
use crate::error::{OrgpushError, Result};

const ACCEPT_V3: &str = "application/vnd.github.v3+json";

/// Body of `POST /orgs/{org}/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRepoRequest {
    pub name: String,
    pub private: bool,
    pub auto_init: bool,
}

impl CreateRepoRequest {
    /// A repository with no automatic initial commit.
    #[must_use]
    pub fn new(name: impl Into<String>, private: bool) -> Self {
        Self {
            name: name.into(),
            private,
            auto_init: false,
        }
    }
}

/// The parts of a `201 Created` body we use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRepository {
    pub clone_url: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Blocking client for the repository-creation endpoint.
pub struct GitHubClient {
    api_url: String,
    http: Client,
}

impl GitHubClient {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let api_url = config.url.trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(OrgpushError::Config(
                "api url is empty; set [api].url".to_string(),
            ));
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = request_timeout(config) {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| OrgpushError::Config(format!("github http client: {err}")))?;

        Ok(Self { api_url, http })
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Endpoint for creating a repository under `org`.
    #[must_use]
    pub fn create_repo_url(&self, org: &str) -> String {
        format!("{}/orgs/{}/repos", self.api_url, urlencoding::encode(org))
    }

    /// Create `request.name` under `org`. Only `201 Created` counts as success.
    pub fn create_org_repo(
        &self,
        org: &str,
        request: &CreateRepoRequest,
        token: &AccessToken,
    ) -> Result<CreatedRepository> {
        let url = self.create_repo_url(org);
        debug!(%url, repo = %request.name, private = request.private, "creating repository");

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, token.api_authorization())
            .header(ACCEPT, ACCEPT_V3)
            .json(request)
            .send()?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            let message = api_error_message(&body);
            warn!(status = status.as_u16(), %message, "repository creation rejected");
            return Err(OrgpushError::ProvisionFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text()?;
        let created: CreatedRepository = serde_json::from_str(&body).map_err(|err| {
            OrgpushError::InvalidResponse(format!("201 body without usable clone_url: {err}"))
        })?;
        info!(
            repo = %request.name,
            full_name = created.full_name.as_deref().unwrap_or_default(),
            "repository created"
        );
        Ok(created)
    }
}

/// `message` from an API error body, or empty when there is none.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_default()
}

/// `timeout_secs = 0` means no timeout, same as leaving it unset.
fn request_timeout(config: &ApiConfig) -> Option<Duration> {
    config
        .timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
