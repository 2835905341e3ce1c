//! GitHub REST API client for organization and repository invitations

use crate::config::InvitationConfig;
use crate::error::{Error, Result};
use crate::traits::{ApiResponse, InvitationApi};
use crate::types::Permission;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// REST API version pinned in every request
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Role granted by organization invitations
pub const INVITE_ROLE: &str = "direct_member";

/// Body of `POST /orgs/{org}/invitations`
#[derive(Debug, Serialize)]
struct OrgInvitationBody<'a> {
    email: Option<&'a str>,
    role: &'a str,
    invitee_id: Option<u64>,
    team_ids: &'a [u64],
    login: &'a str,
}

/// Body of `PUT /repos/{owner}/{repo}/collaborators/{username}`
#[derive(Debug, Serialize)]
struct CollaboratorBody<'a> {
    permission: &'a str,
}

/// GitHub error payload
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    documentation_url: Option<String>,
}

/// GitHub API client for invitation endpoints
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a new GitHub API client.
    ///
    /// No request timeout is set; the transport default applies.
    pub fn new(base_url: String, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ghinvite/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create from an invitation config
    pub fn from_config(config: &InvitationConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_token.clone())
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        request
    }

    /// Send a write request and keep the status plus GitHub's error text.
    ///
    /// Bodies of `ok_statuses` responses are not read. Any other response
    /// must carry a JSON body; a non-JSON body is a decoding error.
    async fn send(&self, request: reqwest::RequestBuilder, ok_statuses: &[u16]) -> Result<ApiResponse> {
        let response = request.send().await?;
        let status = response.status().as_u16();

        if ok_statuses.contains(&status) {
            return Ok(ApiResponse {
                status,
                message: None,
            });
        }

        let text = response.text().await?;
        let body: GitHubErrorBody = serde_json::from_str(&text).map_err(|e| {
            Error::Json(format!("Failed to parse GitHub error response ({}): {}", status, e))
        })?;

        Ok(ApiResponse {
            status,
            message: body.message,
        })
    }

    /// Invite `username` to `org` as a direct member with no teams
    pub async fn create_org_invitation(&self, org: &str, username: &str) -> Result<ApiResponse> {
        let url = format!("{}/orgs/{}/invitations", self.base_url, org);
        let body = OrgInvitationBody {
            email: None,
            role: INVITE_ROLE,
            invitee_id: None,
            team_ids: &[],
            login: username,
        };

        let request = self.request(reqwest::Method::POST, &url).json(&body);
        self.send(request, &[201]).await
    }

    /// Invite `username` as a collaborator on `owner/repo`
    pub async fn add_repository_collaborator(
        &self,
        owner: &str,
        repo: &str,
        username: &str,
        permission: Permission,
    ) -> Result<ApiResponse> {
        let url = format!(
            "{}/repos/{}/{}/collaborators/{}",
            self.base_url, owner, repo, username
        );
        let body = CollaboratorBody {
            permission: permission.as_api_str(),
        };

        let request = self.request(reqwest::Method::PUT, &url).json(&body);
        self.send(request, &[201, 204]).await
    }
}

impl InvitationApi for GitHubClient {
    fn create_org_invitation<'a>(
        &'a self,
        org: &'a str,
        username: &'a str,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a {
        GitHubClient::create_org_invitation(self, org, username)
    }

    fn add_repository_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
        permission: Permission,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a {
        GitHubClient::add_repository_collaborator(self, owner, repo, username, permission)
    }
}
