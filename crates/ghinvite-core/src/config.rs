//! Per-invocation configuration read from an environment-like map

use std::collections::HashMap;
use std::fmt;

/// Default GitHub REST endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default Slack Web API endpoint
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Message returned when the GitHub token or organization is absent
pub const CONFIG_MISSING_MESSAGE: &str =
    "GitHub configuration is missing. Please set GITHUB_TOKEN and GITHUB_ORG environment variables.";

/// Read a variable, treating empty values as unset
fn lookup(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty()).cloned()
}

fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// GitHub settings for the invitation dispatcher.
///
/// Both fields stay optional here; the dispatcher validates them on every
/// call instead of failing at construction.
#[derive(Clone, Default)]
pub struct InvitationConfig {
    /// Bearer token (`GITHUB_TOKEN`)
    pub api_token: Option<String>,
    /// Organization login (`GITHUB_ORG`)
    pub organization: Option<String>,
    /// API base URL (`GITHUB_API_URL`)
    pub api_url: String,
}

impl fmt::Debug for InvitationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvitationConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("organization", &self.organization)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl InvitationConfig {
    /// Create a config against the public GitHub API
    pub fn new(api_token: Option<String>, organization: Option<String>) -> Self {
        Self {
            api_token: api_token.filter(|t| !t.is_empty()),
            organization: organization.filter(|o| !o.is_empty()),
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Build from an environment map supplied by the workflow runtime
    pub fn from_env_map(env: &HashMap<String, String>) -> Self {
        Self {
            api_token: lookup(env, "GITHUB_TOKEN"),
            organization: lookup(env, "GITHUB_ORG"),
            api_url: lookup(env, "GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
        }
    }

    /// Build from the process environment
    pub fn from_env() -> Self {
        Self::from_env_map(&process_env())
    }

    /// Token and organization, if both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.api_token.as_deref(), self.organization.as_deref()) {
            (Some(token), Some(org)) => Some((token, org)),
            _ => None,
        }
    }
}

/// Slack Web API settings for user lookup, message fetch and replies
#[derive(Clone, Default)]
pub struct SlackConfig {
    /// Bot token (`SLACK_BOT_TOKEN`)
    pub bot_token: Option<String>,
    /// API base URL (`SLACK_API_URL`)
    pub api_url: String,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl SlackConfig {
    /// Create a config against the public Slack API
    pub fn new(bot_token: Option<String>) -> Self {
        Self {
            bot_token: bot_token.filter(|t| !t.is_empty()),
            api_url: DEFAULT_SLACK_API_URL.to_string(),
        }
    }

    /// Override the API base URL
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Build from an environment map
    pub fn from_env_map(env: &HashMap<String, String>) -> Self {
        Self {
            bot_token: lookup(env, "SLACK_BOT_TOKEN"),
            api_url: lookup(env, "SLACK_API_URL")
                .unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
        }
    }

    /// Build from the process environment
    pub fn from_env() -> Self {
        Self::from_env_map(&process_env())
    }
}
