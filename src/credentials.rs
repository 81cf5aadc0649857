//! Access token handling.
//!
//! The token lives only in memory. It is exposed to exactly three places: the
//! API authorization header, the credential-bearing remote URL and the git
//! `http.extraHeader` value. Everything else sees `***`.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{OrgpushError, Result};

const REDACTED: &str = "***";
const OAUTH_USER: &str = "oauth2";
/// Shortest token that is masked wherever it appears.
pub const MIN_SUBSTRING_MASK_LEN: usize = 8;

/// How the push step authenticates against the git host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Embed `oauth2:<token>@` in the remote URL.
    #[default]
    Url,
    /// Keep the remote URL clean and send an `Authorization` header on push.
    Header,
}

impl CredentialMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "header" => Ok(Self::Header),
            _ => Err(OrgpushError::Config(format!(
                "invalid credential mode {value} (expected url|header)"
            ))),
        }
    }
}

/// A personal access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(OrgpushError::InvalidInput(
                "access token must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Raw token value. Only for transport code.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header for the REST API.
    #[must_use]
    pub fn api_authorization(&self) -> String {
        format!("token {}", self.0)
    }

    /// Value for git's `http.extraHeader`.
    #[must_use]
    pub fn basic_authorization(&self) -> String {
        let encoded = STANDARD.encode(format!("{OAUTH_USER}:{}", self.0));
        format!("Authorization: Basic {encoded}")
    }

    /// Rewrite `https://host/path` into `https://oauth2:<token>@host/path`.
    pub fn embed_in_clone_url(&self, clone_url: &str) -> Result<String> {
        let rest = clone_url.strip_prefix("https://").ok_or_else(|| {
            OrgpushError::InvalidResponse(format!(
                "clone URL {clone_url} is not an https:// URL"
            ))
        })?;
        Ok(format!("https://{OAUTH_USER}:{}@{rest}", self.0))
    }

    /// Mask the token in `text`.
    ///
    /// The `oauth2:<token>@` userinfo is always masked. Tokens shorter than
    /// [`MIN_SUBSTRING_MASK_LEN`] are otherwise only masked where they stand
    /// alone, so a one-letter token does not eat letters of host names.
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        let text = text.replace(
            &format!("{OAUTH_USER}:{}@", self.0),
            &format!("{OAUTH_USER}:{REDACTED}@"),
        );
        if self.0.len() >= MIN_SUBSTRING_MASK_LEN {
            text.replace(&self.0, REDACTED)
        } else {
            mask_standalone(&text, &self.0)
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

fn mask_standalone(text: &str, needle: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (idx, _) in text.match_indices(needle) {
        let end = idx + needle.len();
        let joined_before = text[..idx].chars().next_back().is_some_and(is_token_char);
        let joined_after = text[end..].chars().next().is_some_and(is_token_char);
        if joined_before || joined_after {
            continue;
        }
        out.push_str(&text[last..idx]);
        out.push_str(REDACTED);
        last = end;
    }
    out.push_str(&text[last..]);
    out
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&REDACTED).finish()
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
