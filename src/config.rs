use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialMode;
use crate::error::{OrgpushError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_COMMITTER_NAME: &str = "GitHub Actions";
pub const DEFAULT_COMMITTER_EMAIL: &str = "actions@github.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(explicit_path, |key| std::env::var(key).ok())
    }

    /// Same layering as [`Config::load`], reading `ORGPUSH_*` values through `env`.
    pub fn load_with_env<F>(explicit_path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("ORGPUSH_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides(&env)?;

        Ok(config)
    }

    /// Path of the per-user configuration file, if the platform has one.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("orgpush/config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| OrgpushError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| OrgpushError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.api {
            self.api.merge(patch);
        }
        if let Some(patch) = patch.git {
            self.git.merge(patch);
        }
        if let Some(patch) = patch.repository {
            self.repository.merge(patch);
        }
        if let Some(patch) = patch.publish {
            self.publish.merge(patch);
        }
    }

    fn apply_env_overrides<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("ORGPUSH_API_URL") {
            self.api.url = value;
        }
        if let Some(value) = env_u64(env, "ORGPUSH_API_TIMEOUT_SECS")? {
            self.api.timeout_secs = Some(value);
        }
        if let Some(value) = env("ORGPUSH_API_USER_AGENT") {
            self.api.user_agent = value;
        }

        if let Some(value) = env("ORGPUSH_GIT_PATH") {
            self.git.path = PathBuf::from(value);
        }
        if let Some(value) = env("ORGPUSH_GIT_CREDENTIAL_MODE") {
            self.git.credential_mode = CredentialMode::parse(&value)?;
        }

        if let Some(value) = env_bool(env, "ORGPUSH_REPOSITORY_PRIVATE") {
            self.repository.private = value;
        }

        if let Some(value) = env("ORGPUSH_COMMITTER_NAME") {
            self.publish.committer_name = value;
        }
        if let Some(value) = env("ORGPUSH_COMMITTER_EMAIL") {
            self.publish.committer_email = value;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// No timeout unless configured; 0 also means none.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    fn merge(&mut self, patch: ApiPatch) {
        if let Some(value) = patch.url {
            self.url = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = Some(value);
        }
        if let Some(value) = patch.user_agent {
            self.user_agent = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(default = "default_git_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub credential_mode: CredentialMode,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            path: default_git_path(),
            credential_mode: CredentialMode::default(),
        }
    }
}

impl GitConfig {
    fn merge(&mut self, patch: GitPatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
        if let Some(value) = patch.credential_mode {
            self.credential_mode = value;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub private: bool,
}

impl RepositoryConfig {
    fn merge(&mut self, patch: RepositoryPatch) {
        if let Some(value) = patch.private {
            self.private = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default = "default_committer_name")]
    pub committer_name: String,
    #[serde(default = "default_committer_email")]
    pub committer_email: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            committer_name: default_committer_name(),
            committer_email: default_committer_email(),
        }
    }
}

impl PublishConfig {
    fn merge(&mut self, patch: PublishPatch) {
        if let Some(value) = patch.committer_name {
            self.committer_name = value;
        }
        if let Some(value) = patch.committer_email {
            self.committer_email = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub api: Option<ApiPatch>,
    pub git: Option<GitPatch>,
    pub repository: Option<RepositoryPatch>,
    pub publish: Option<PublishPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiPatch {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GitPatch {
    pub path: Option<PathBuf>,
    pub credential_mode: Option<CredentialMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RepositoryPatch {
    pub private: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PublishPatch {
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    format!("orgpush/{}", env!("CARGO_PKG_VERSION"))
}

fn default_git_path() -> PathBuf {
    PathBuf::from("git")
}

fn default_committer_name() -> String {
    DEFAULT_COMMITTER_NAME.to_string()
}

fn default_committer_email() -> String {
    DEFAULT_COMMITTER_EMAIL.to_string()
}

fn env_bool<F>(env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    env(key).map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u64<F>(env: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(value) => value.parse::<u64>().map(Some).map_err(|err| {
            OrgpushError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("orgpush.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[api]\nurl = \"https://from-file.example\"\n\n[publish]\ncommitter_name = \"File Bot\"\n",
        );

        let config = Config::load_with_env(
            Some(&path),
            env_from(&[
                ("ORGPUSH_API_URL", "https://from-env.example"),
                ("ORGPUSH_GIT_CREDENTIAL_MODE", "header"),
                ("ORGPUSH_REPOSITORY_PRIVATE", "yes"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api.url, "https://from-env.example");
        assert_eq!(config.git.credential_mode, CredentialMode::Header);
        assert!(config.repository.private);
        assert_eq!(config.publish.committer_name, "File Bot");
    }

    #[test]
    fn config_path_can_come_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\ntimeout_secs = 7\n");
        let path_str = path.display().to_string();

        let config =
            Config::load_with_env(None, env_from(&[("ORGPUSH_CONFIG", path_str.as_str())]))
                .unwrap();

        assert_eq!(config.api.timeout_secs, Some(7));
    }

    #[test]
    fn non_numeric_timeout_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load_with_env(
            Some(&path),
            env_from(&[("ORGPUSH_API_TIMEOUT_SECS", "soon")]),
        )
        .unwrap_err();

        assert!(matches!(err, OrgpushError::Config(_)));
        assert!(err.to_string().contains("ORGPUSH_API_TIMEOUT_SECS"));
    }

    #[test]
    fn unknown_credential_mode_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load_with_env(
            Some(&path),
            env_from(&[("ORGPUSH_GIT_CREDENTIAL_MODE", "ssh")]),
        )
        .unwrap_err();

        assert!(matches!(err, OrgpushError::Config(_)));
    }

    #[test]
    fn defaults_match_github() {
        let config = Config::default();
        assert_eq!(config.api.url, "https://api.github.com");
        assert_eq!(config.api.timeout_secs, None);
        assert!(config.api.user_agent.starts_with("orgpush/"));
        assert_eq!(config.git.path, PathBuf::from("git"));
        assert_eq!(config.git.credential_mode, CredentialMode::Url);
        assert!(!config.repository.private);
        assert_eq!(config.publish.committer_name, "GitHub Actions");
        assert_eq!(config.publish.committer_email, "actions@github.com");
    }

    #[test]
    fn patch_overrides_only_given_fields() {
        let mut config = Config::default();
        let patch: ConfigPatch = toml::from_str(
            r#"
            [api]
            url = "https://ghe.example.com/api/v3"

            [git]
            credential_mode = "header"
            "#,
        )
        .unwrap();
        config.merge_patch(patch);

        assert_eq!(config.api.url, "https://ghe.example.com/api/v3");
        assert!(config.api.user_agent.starts_with("orgpush/"));
        assert_eq!(config.git.credential_mode, CredentialMode::Header);
        assert_eq!(config.git.path, PathBuf::from("git"));
        assert_eq!(config.publish.committer_name, "GitHub Actions");
    }

    #[test]
    fn missing_explicit_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let patch = Config::load_patch(&dir.path().join("absent.toml")).unwrap();
        assert!(patch.is_none());
    }

    #[test]
    fn unparsable_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nurl = ").unwrap();
        let err = Config::load_patch(&path).unwrap_err();
        assert!(matches!(err, OrgpushError::Config(_)));
    }

    #[test]
    fn full_file_round_trips_through_serde() {
        let config: Config = toml::from_str(
            r#"
            [api]
            url = "http://127.0.0.1:9000"
            timeout_secs = 30

            [repository]
            private = true

            [publish]
            committer_name = "Release Bot"
            committer_email = "bot@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.timeout_secs, Some(30));
        assert!(config.repository.private);
        assert_eq!(config.publish.committer_name, "Release Bot");
        assert_eq!(config.git.credential_mode, CredentialMode::Url);
    }
}
