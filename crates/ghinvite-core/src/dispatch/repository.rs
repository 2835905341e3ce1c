//! Repository collaborator invitations

use crate::config::InvitationConfig;
use crate::http::GitHubClient;
use crate::traits::InvitationApi;
use crate::types::{InvitationOutcome, Permission, UNKNOWN_ERROR};

/// Message returned when no GitHub token is configured
pub const TOKEN_MISSING_MESSAGE: &str =
    "GitHub configuration is missing. Please set the GITHUB_TOKEN environment variable.";

/// A collaborator invitation for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorRequest {
    /// GitHub login to invite
    pub username: String,
    /// Repository as `owner/repo`
    pub repository: String,
    /// Access level to grant
    pub permission: Permission,
}

impl CollaboratorRequest {
    /// Split `repository` into owner and name.
    ///
    /// Exactly one `/` with non-empty halves is accepted.
    pub fn owner_and_repo(&self) -> Option<(&str, &str)> {
        let (owner, repo) = self.repository.split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some((owner, repo))
    }
}

/// Classified response of the collaborators endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorStatus {
    /// 201, invitation created
    Invited,
    /// 204, user already has access
    AlreadyCollaborator,
    /// 404, repository or user unknown
    NotFound,
    /// Any other status
    Rejected {
        /// GitHub's `message` field, if any
        detail: Option<String>,
    },
    /// No usable response
    Transport {
        /// Underlying error text, if any
        detail: Option<String>,
    },
}

impl CollaboratorStatus {
    /// Classify an HTTP status and GitHub's error `message`
    pub fn classify(status: u16, error_message: Option<&str>) -> Self {
        match status {
            201 => Self::Invited,
            204 => Self::AlreadyCollaborator,
            404 => Self::NotFound,
            _ => Self::Rejected {
                detail: error_message.filter(|m| !m.is_empty()).map(str::to_owned),
            },
        }
    }

    /// Render the chat message for this status
    pub fn into_outcome(self, request: &CollaboratorRequest) -> InvitationOutcome {
        let user = &request.username;
        let repo = &request.repository;
        match self {
            Self::Invited => InvitationOutcome::success(format!(
                "Successfully invited {} to {} with {} permissions",
                user, repo, request.permission
            )),
            Self::AlreadyCollaborator => {
                InvitationOutcome::failure(format!("@{} already has access to {}.", user, repo))
            }
            Self::NotFound => InvitationOutcome::failure(format!(
                "Could not find repository {} or GitHub user @{}.",
                repo, user
            )),
            Self::Rejected { detail } => InvitationOutcome::failure(format!(
                "Failed to invite @{} to {}: {}",
                user,
                repo,
                detail.as_deref().unwrap_or(UNKNOWN_ERROR)
            )),
            Self::Transport { detail } => InvitationOutcome::failure(format!(
                "Error inviting @{} to {}: {}",
                user,
                repo,
                detail.as_deref().unwrap_or(UNKNOWN_ERROR)
            )),
        }
    }
}

/// Validate the token and invite a collaborator with one call
pub async fn invite_collaborator(
    request: &CollaboratorRequest,
    config: &InvitationConfig,
) -> InvitationOutcome {
    let Some(token) = config.api_token.as_deref() else {
        return InvitationOutcome::failure(TOKEN_MISSING_MESSAGE);
    };

    let api = GitHubClient::new(config.api_url.clone(), Some(token.to_string()));
    send_collaborator_invitation(&api, request).await
}

/// Invite a collaborator through `api` and classify the result
pub async fn send_collaborator_invitation<A: InvitationApi>(
    api: &A,
    request: &CollaboratorRequest,
) -> InvitationOutcome {
    if request.username.is_empty() {
        return InvitationOutcome::failure(super::MISSING_USERNAME_MESSAGE);
    }

    let Some((owner, repo)) = request.owner_and_repo() else {
        return InvitationOutcome::failure(format!(
            "Invalid repository '{}': expected owner/repo",
            request.repository
        ));
    };

    tracing::info!(
        username = %request.username,
        repository = %request.repository,
        permission = %request.permission,
        "inviting repository collaborator"
    );

    let status = match api
        .add_repository_collaborator(owner, repo, &request.username, request.permission)
        .await
    {
        Ok(response) => CollaboratorStatus::classify(response.status, response.message.as_deref()),
        Err(e) => CollaboratorStatus::Transport {
            detail: Some(e.message().to_string()).filter(|m| !m.is_empty()),
        },
    };

    if let CollaboratorStatus::Rejected { detail } | CollaboratorStatus::Transport { detail } = &status {
        tracing::error!(username = %request.username, repository = %request.repository, detail = ?detail, "collaborator invitation failed");
    }

    status.into_outcome(request)
}
