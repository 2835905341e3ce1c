//! Dispatcher tests against a mock GitHub/Slack server

use ghinvite_core::dispatch::{invite_collaborator, CollaboratorRequest};
use ghinvite_core::http::SlackClient;
use ghinvite_core::{dispatch, InvitationConfig, InvitationRequest, NoDirectory, Permission};
use httpmock::prelude::*;
use serde_json::json;

const DOCS_URL: &str = "https://docs.github.com/rest/reference/orgs#create-an-organization-invitation";

fn config(server: &MockServer) -> InvitationConfig {
    InvitationConfig::new(Some("test-token".into()), Some("testorg".into()))
        .with_api_url(server.base_url())
}

fn request() -> InvitationRequest {
    InvitationRequest::new("testuser").with_inviter("U12345678")
}

async fn mock_invitation_error(server: &MockServer, status: u16, message: &str) {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/orgs/testorg/invitations");
            then.status(status)
                .header("Content-Type", "application/json")
                .json_body(json!({ "message": message, "documentation_url": DOCS_URL }));
        })
        .await;
}

#[tokio::test]
async fn successfully_invites_user_with_inviter_name() {
    let server = MockServer::start_async().await;

    let users_info = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/users.info")
                .query_param("user", "U12345678");
            then.status(200).json_body(json!({
                "ok": true,
                "user": { "id": "U12345678", "name": "testuser", "real_name": "Test User" }
            }));
        })
        .await;

    let invitation = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/orgs/testorg/invitations")
                .header("Authorization", "Bearer test-token")
                .header("Accept", "application/vnd.github+json")
                .header("X-GitHub-Api-Version", "2022-11-28")
                .json_body(json!({
                    "email": null,
                    "role": "direct_member",
                    "invitee_id": null,
                    "team_ids": [],
                    "login": "testuser"
                }));
            then.status(201).json_body(json!({
                "id": 12345,
                "login": "testuser",
                "node_id": "MDQ6VXNlcjE=",
                "email": null,
                "role": "direct_member"
            }));
        })
        .await;

    let slack = SlackClient::new(server.base_url(), Some("xoxb-test".into()));
    let outcome = dispatch(&request(), &config(&server), &slack).await;

    users_info.assert_async().await;
    invitation.assert_async().await;
    assert!(outcome.success, "{:?}", outcome);
    assert!(outcome
        .message
        .contains("Test User has invited @testuser to join the testorg GitHub organization"));
}

#[tokio::test]
async fn handles_user_already_member() {
    let server = MockServer::start_async().await;
    mock_invitation_error(&server, 422, "testuser is already a member of the organization.").await;

    let outcome = dispatch(&request(), &config(&server), &NoDirectory).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("already a member of the testorg organization"));
}

#[tokio::test]
async fn handles_user_already_invited() {
    let server = MockServer::start_async().await;
    mock_invitation_error(&server, 422, "testuser is already invited to this organization.").await;

    let outcome = dispatch(&request(), &config(&server), &NoDirectory).await;

    assert!(!outcome.success);
    assert!(outcome
        .message
        .contains("already has a pending invitation to the testorg organization"));
}

#[tokio::test]
async fn handles_user_not_found() {
    let server = MockServer::start_async().await;
    mock_invitation_error(&server, 404, "Not Found").await;

    let request = InvitationRequest::new("nonexistentuser");
    let outcome = dispatch(&request, &config(&server), &NoDirectory).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("Could not find GitHub user @nonexistentuser"));
}

#[tokio::test]
async fn other_status_reports_github_message() {
    let server = MockServer::start_async().await;
    mock_invitation_error(&server, 403, "Must have admin rights to Repository.").await;

    let outcome = dispatch(&request(), &config(&server), &NoDirectory).await;

    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Failed to invite @testuser: Must have admin rights to Repository."
    );
}

#[tokio::test]
async fn other_status_without_message_is_unknown_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/orgs/testorg/invitations");
            then.status(500).json_body(json!({}));
        })
        .await;

    let outcome = dispatch(&request(), &config(&server), &NoDirectory).await;

    assert_eq!(outcome.message, "Failed to invite @testuser: Unknown error");
}

#[tokio::test]
async fn non_json_error_body_is_transport_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/orgs/testorg/invitations");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let outcome = dispatch(&request(), &config(&server), &NoDirectory).await;

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Error inviting @testuser: "), "{}", outcome.message);
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    let config = InvitationConfig::new(Some("test-token".into()), Some("testorg".into()))
        .with_api_url("http://127.0.0.1:1");

    let outcome = dispatch(&request(), &config, &NoDirectory).await;

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Error inviting @testuser: "));
    assert!(!outcome.message.contains("test-token"));
}

#[tokio::test]
async fn missing_configuration_makes_no_call() {
    let server = MockServer::start_async().await;
    let invitation = server
        .mock_async(|when, then| {
            when.method(POST).path("/orgs/testorg/invitations");
            then.status(201);
        })
        .await;

    let config = InvitationConfig::new(None, None).with_api_url(server.base_url());
    let outcome = dispatch(&request(), &config, &NoDirectory).await;

    assert!(!outcome.success);
    assert!(outcome.message.contains("GitHub configuration is missing"));
    assert_eq!(invitation.hits_async().await, 0);
}

#[tokio::test]
async fn lookup_failure_still_sends_invitation() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users.info");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "user_not_found" }));
        })
        .await;
    let invitation = server
        .mock_async(|when, then| {
            when.method(POST).path("/orgs/testorg/invitations");
            then.status(201);
        })
        .await;

    let slack = SlackClient::new(server.base_url(), Some("xoxb-test".into()));
    let outcome = dispatch(&request(), &config(&server), &slack).await;

    assert_eq!(invitation.hits_async().await, 1);
    assert!(outcome.success);
    assert!(outcome.message.starts_with("✅ Someone has invited @testuser"));
}

#[tokio::test]
async fn lookup_http_error_still_sends_invitation() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users.info");
            then.status(500);
        })
        .await;
    mock_invitation_error(&server, 404, "Not Found").await;

    let slack = SlackClient::new(server.base_url(), Some("xoxb-test".into()));
    let outcome = dispatch(&request(), &config(&server), &slack).await;

    // Outcome is governed by the invitation endpoint alone
    assert!(!outcome.success);
    assert!(outcome.message.contains("Could not find GitHub user @testuser"));
}

#[tokio::test]
async fn invites_repository_collaborator() {
    let server = MockServer::start_async().await;
    let collaborator = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/repos/nf-core/tools/collaborators/octocat")
                .header("Authorization", "Bearer test-token")
                .json_body(json!({ "permission": "push" }));
            then.status(201).json_body(json!({ "id": 1 }));
        })
        .await;

    let request = CollaboratorRequest {
        username: "octocat".into(),
        repository: "nf-core/tools".into(),
        permission: Permission::Write,
    };
    let outcome = invite_collaborator(&request, &config(&server)).await;

    collaborator.assert_async().await;
    assert!(outcome.success);
    assert_eq!(
        outcome.message,
        "Successfully invited octocat to nf-core/tools with write permissions"
    );
}

#[tokio::test]
async fn repository_collaborator_already_present() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/repos/nf-core/tools/collaborators/octocat");
            then.status(204);
        })
        .await;

    let request = CollaboratorRequest {
        username: "octocat".into(),
        repository: "nf-core/tools".into(),
        permission: Permission::Read,
    };
    let outcome = invite_collaborator(&request, &config(&server)).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "@octocat already has access to nf-core/tools.");
}
