//! Core request/outcome types shared by the dispatcher and the step contract

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display name used when the inviter is unknown or cannot be looked up
pub const DEFAULT_INVITER_NAME: &str = "Someone";

/// Fallback detail when GitHub or the transport gives no error text
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A single organization invitation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRequest {
    /// GitHub login to invite
    pub username: String,
    /// Chat user id of whoever triggered the invitation
    pub inviter_id: Option<String>,
}

impl InvitationRequest {
    /// Create a request without an inviter
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            inviter_id: None,
        }
    }

    /// Attach the inviter's chat user id (empty ids are ignored)
    pub fn with_inviter(mut self, inviter_id: impl Into<String>) -> Self {
        let id = inviter_id.into();
        self.inviter_id = if id.is_empty() { None } else { Some(id) };
        self
    }
}

/// Terminal result of a dispatch, exactly one per request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationOutcome {
    /// Whether the invitation was sent
    pub success: bool,
    /// Human-readable status for the chat thread
    pub message: String,
}

impl InvitationOutcome {
    /// Successful outcome
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Failed outcome
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Classified response of `POST /orgs/{org}/invitations`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvitationStatus {
    /// 201 Created
    Sent,
    /// 422 and GitHub says the user is already a member
    AlreadyMember,
    /// 422 and GitHub says the user was already invited
    AlreadyInvited,
    /// 404
    UserNotFound,
    /// Any other non-201 response
    Rejected {
        /// GitHub's `message` field, if any
        detail: Option<String>,
    },
    /// The request never produced a usable response
    Transport {
        /// Underlying error text, if any
        detail: Option<String>,
    },
}

impl InvitationStatus {
    /// Classify an HTTP status and GitHub's error `message`.
    ///
    /// Rows are checked top to bottom; the first match wins.
    pub fn classify(status: u16, error_message: Option<&str>) -> Self {
        match (status, error_message) {
            (201, _) => Self::Sent,
            (422, Some(msg)) if msg.contains("already a member") => Self::AlreadyMember,
            (422, Some(msg)) if msg.contains("already invited") => Self::AlreadyInvited,
            (404, _) => Self::UserNotFound,
            (_, msg) => Self::Rejected {
                detail: non_empty(msg),
            },
        }
    }

    /// Classify a transport or decoding failure
    pub fn transport(detail: impl AsRef<str>) -> Self {
        Self::Transport {
            detail: non_empty(Some(detail.as_ref())),
        }
    }

    /// True only for [`InvitationStatus::Sent`]
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Sent)
    }

    /// Short machine-friendly label, used in logs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::AlreadyMember => "already_member",
            Self::AlreadyInvited => "already_invited",
            Self::UserNotFound => "user_not_found",
            Self::Rejected { .. } => "rejected",
            Self::Transport { .. } => "transport",
        }
    }

    /// Render the chat message for this status
    pub fn into_outcome(self, inviter: &str, username: &str, org: &str) -> InvitationOutcome {
        match self {
            Self::Sent => InvitationOutcome::success(format!(
                "✅ {inviter} has invited @{username} to join the {org} GitHub organization."
            )),
            Self::AlreadyMember => InvitationOutcome::failure(format!(
                "@{username} is already a member of the {org} organization."
            )),
            Self::AlreadyInvited => InvitationOutcome::failure(format!(
                "@{username} already has a pending invitation to the {org} organization."
            )),
            Self::UserNotFound => InvitationOutcome::failure(format!(
                "Could not find GitHub user @{username}. Please verify the username."
            )),
            Self::Rejected { detail } => InvitationOutcome::failure(format!(
                "Failed to invite @{username}: {}",
                detail.as_deref().unwrap_or(UNKNOWN_ERROR)
            )),
            Self::Transport { detail } => InvitationOutcome::failure(format!(
                "Error inviting @{username}: {}",
                detail.as_deref().unwrap_or(UNKNOWN_ERROR)
            )),
        }
    }
}

fn non_empty(msg: Option<&str>) -> Option<String> {
    msg.filter(|m| !m.is_empty()).map(str::to_owned)
}

/// Repository permission level offered by the collaborator invitation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read access
    #[default]
    Read,
    /// Write access
    Write,
    /// Admin access
    Admin,
}

impl Permission {
    /// Name used in chat messages and step inputs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }

    /// Value of the `permission` field in the GitHub collaborators API
    pub const fn as_api_str(&self) -> &'static str {
        match self {
            Self::Read => "pull",
            Self::Write => "push",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            other => Err(crate::Error::Config(format!(
                "Invalid permission level '{}': expected read, write or admin",
                other
            ))),
        }
    }
}
