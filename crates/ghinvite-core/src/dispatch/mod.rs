//! Invitation dispatch: guard, best-effort enrichment, one call, classification
//!
//! Every path ends in an [`InvitationOutcome`]; nothing here returns an
//! error to the caller.

pub mod repository;

use crate::config::{InvitationConfig, CONFIG_MISSING_MESSAGE};
use crate::http::GitHubClient;
use crate::traits::{InvitationApi, UserDirectory};
use crate::types::{InvitationOutcome, InvitationRequest, InvitationStatus, DEFAULT_INVITER_NAME};

pub use repository::{invite_collaborator, CollaboratorRequest, CollaboratorStatus};

/// Message returned for an empty username
pub const MISSING_USERNAME_MESSAGE: &str = "No GitHub username was provided.";

/// Resolve the inviter's display name, never failing.
///
/// Lookup errors are logged and replaced by [`DEFAULT_INVITER_NAME`].
pub async fn resolve_inviter<D: UserDirectory>(directory: &D, inviter_id: Option<&str>) -> String {
    let Some(id) = inviter_id.filter(|id| !id.is_empty()) else {
        return DEFAULT_INVITER_NAME.to_string();
    };

    match directory.display_name(id).await {
        Ok(Some(name)) => name,
        Ok(None) => DEFAULT_INVITER_NAME.to_string(),
        Err(e) => {
            tracing::warn!(inviter_id = %id, error = %e, "inviter lookup failed, using default name");
            DEFAULT_INVITER_NAME.to_string()
        }
    }
}

/// Validate `config` and send one organization invitation.
///
/// Missing token or organization returns a failure without any network call.
pub async fn dispatch<D: UserDirectory>(
    request: &InvitationRequest,
    config: &InvitationConfig,
    directory: &D,
) -> InvitationOutcome {
    let Some((token, org)) = config.credentials() else {
        tracing::warn!(username = %request.username, "GitHub configuration missing, invitation not sent");
        return InvitationOutcome::failure(CONFIG_MISSING_MESSAGE);
    };

    let api = GitHubClient::new(config.api_url.clone(), Some(token.to_string()));
    send_invitation(&api, org, request, directory).await
}

/// Send one organization invitation through `api` and classify the result
pub async fn send_invitation<A, D>(
    api: &A,
    org: &str,
    request: &InvitationRequest,
    directory: &D,
) -> InvitationOutcome
where
    A: InvitationApi,
    D: UserDirectory,
{
    let username = request.username.as_str();
    if username.is_empty() {
        return InvitationOutcome::failure(MISSING_USERNAME_MESSAGE);
    }

    let inviter = resolve_inviter(directory, request.inviter_id.as_deref()).await;
    tracing::info!(username, org, inviter = %inviter, "sending GitHub organization invitation");

    let status = match api.create_org_invitation(org, username).await {
        Ok(response) => InvitationStatus::classify(response.status, response.message.as_deref()),
        Err(e) => InvitationStatus::transport(e.message()),
    };

    match &status {
        InvitationStatus::Sent => tracing::info!(username, org, "invitation sent"),
        InvitationStatus::Rejected { detail } | InvitationStatus::Transport { detail } => {
            tracing::error!(username, org, status = status.as_str(), detail = ?detail, "invitation failed")
        }
        _ => tracing::info!(username, org, status = status.as_str(), "invitation not sent"),
    }

    status.into_outcome(&inviter, username, org)
}
