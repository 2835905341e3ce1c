//! Workflow step contract
//!
//! The hosting workflow runtime invokes a function by callback id with a
//! JSON input object and an environment map, and accepts only the declared
//! output fields back. Inputs with unknown fields are rejected.

use crate::config::{InvitationConfig, SlackConfig};
use crate::dispatch::{self, CollaboratorRequest};
use crate::error::{Error, Result};
use crate::http::SlackClient;
use crate::traits::NoDirectory;
use crate::types::{InvitationOutcome, InvitationRequest, Permission};
use crate::username;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Inputs of `extract_github_username_function`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractUsernameInputs {
    /// Message text to extract a GitHub username from
    pub message_text: String,
}

/// Outputs of `extract_github_username_function`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractUsernameOutputs {
    /// Extracted username, empty when none was found
    pub github_username: String,
}

/// Inputs of `github_invite_function`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrgInviteInputs {
    /// GitHub username to invite
    pub github_username: String,
    /// Chat user id of whoever initiated the invitation
    #[serde(default)]
    pub inviter_user_id: Option<String>,
}

/// Inputs of `github_invitation_function`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoInviteInputs {
    /// GitHub username to invite
    pub github_username: String,
    /// Repository as `owner/repo`
    pub repository: String,
    /// Permission level, `read` when omitted, null or empty
    #[serde(default, deserialize_with = "permission_or_default")]
    pub permission_level: Permission,
}

/// Templated triggers pass unset fields through as `""` or `null`
fn permission_or_default<'de, D>(deserializer: D) -> std::result::Result<Permission, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(Permission::default()),
        Some(level) if level.is_empty() => Ok(Permission::default()),
        Some(level) => level.parse().map_err(serde::de::Error::custom),
    }
}

/// Functions this bot registers with the workflow runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFunction {
    /// Extract a GitHub username from a message
    ExtractUsername,
    /// Invite a user to the configured organization
    OrgInvite,
    /// Invite a user as a repository collaborator
    RepoInvite,
}

impl StepFunction {
    /// All registered functions
    pub const ALL: [StepFunction; 3] = [
        StepFunction::ExtractUsername,
        StepFunction::OrgInvite,
        StepFunction::RepoInvite,
    ];

    /// Callback id known to the workflow runtime
    pub const fn callback_id(&self) -> &'static str {
        match self {
            StepFunction::ExtractUsername => "extract_github_username_function",
            StepFunction::OrgInvite => "github_invite_function",
            StepFunction::RepoInvite => "github_invitation_function",
        }
    }

    /// Look up a function by callback id
    pub fn from_callback_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.callback_id() == id)
    }

    /// Declared output field names, in declaration order
    pub const fn output_fields(&self) -> &'static [&'static str] {
        match self {
            StepFunction::ExtractUsername => &["github_username"],
            StepFunction::OrgInvite | StepFunction::RepoInvite => &["success", "message"],
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(function: StepFunction, inputs: serde_json::Value) -> Result<T> {
    serde_json::from_value(inputs).map_err(|e| {
        Error::Step(format!("invalid inputs for {}: {}", function.callback_id(), e))
    })
}

/// Run `extract_github_username_function`
pub fn run_extract(inputs: ExtractUsernameInputs) -> ExtractUsernameOutputs {
    ExtractUsernameOutputs {
        github_username: username::extract_username(&inputs.message_text),
    }
}

/// Run `github_invite_function` with configuration from `env`
pub async fn run_org_invite(inputs: OrgInviteInputs, env: &HashMap<String, String>) -> InvitationOutcome {
    let config = InvitationConfig::from_env_map(env);
    let mut request = InvitationRequest::new(inputs.github_username);
    if let Some(inviter) = inputs.inviter_user_id {
        request = request.with_inviter(inviter);
    }

    let slack = SlackConfig::from_env_map(env);
    if slack.bot_token.is_some() {
        let directory = SlackClient::from_config(&slack);
        dispatch::dispatch(&request, &config, &directory).await
    } else {
        dispatch::dispatch(&request, &config, &NoDirectory).await
    }
}

/// Run `github_invitation_function` with configuration from `env`
pub async fn run_repo_invite(inputs: RepoInviteInputs, env: &HashMap<String, String>) -> InvitationOutcome {
    let config = InvitationConfig::from_env_map(env);
    let request = CollaboratorRequest {
        username: inputs.github_username,
        repository: inputs.repository,
        permission: inputs.permission_level,
    };
    dispatch::invite_collaborator(&request, &config).await
}

/// Decode `inputs`, run the function registered as `callback_id`, and
/// encode its declared outputs.
///
/// Unknown callback ids and malformed inputs are errors; the runtime
/// rejects the call.
pub async fn run_step(
    callback_id: &str,
    inputs: serde_json::Value,
    env: &HashMap<String, String>,
) -> Result<serde_json::Value> {
    let function = StepFunction::from_callback_id(callback_id)
        .ok_or_else(|| Error::Step(format!("unknown function callback id '{}'", callback_id)))?;

    tracing::debug!(callback_id, "running workflow step");

    let outputs = match function {
        StepFunction::ExtractUsername => serde_json::to_value(run_extract(decode(function, inputs)?))?,
        StepFunction::OrgInvite => {
            serde_json::to_value(run_org_invite(decode(function, inputs)?, env).await)?
        }
        StepFunction::RepoInvite => {
            serde_json::to_value(run_repo_invite(decode(function, inputs)?, env).await)?
        }
    };

    Ok(outputs)
}
