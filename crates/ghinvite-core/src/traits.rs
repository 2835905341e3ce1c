//! Collaborator seams for the dispatcher and the reaction workflow
//!
//! Methods return `impl Future + Send` so callers stay generic without
//! boxing or dynamic dispatch.

use crate::error::Result;
use crate::types::Permission;
use std::future::Future;

/// Raw response of a GitHub write endpoint, before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// GitHub's error `message` field, only read on non-success statuses
    pub message: Option<String>,
}

/// GitHub invitation endpoints
pub trait InvitationApi {
    /// `POST /orgs/{org}/invitations` for `username`
    fn create_org_invitation<'a>(
        &'a self,
        org: &'a str,
        username: &'a str,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;

    /// `PUT /repos/{owner}/{repo}/collaborators/{username}`
    fn add_repository_collaborator<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        username: &'a str,
        permission: Permission,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;
}

/// Chat user lookup used to name the inviter
pub trait UserDirectory {
    /// Display name for a chat user id, `None` when the user has none
    fn display_name<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Future<Output = Result<Option<String>>> + Send + 'a;
}

/// Directory that knows nobody; every inviter falls back to the default name
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDirectory;

impl UserDirectory for NoDirectory {
    fn display_name<'a>(
        &'a self,
        _user_id: &'a str,
    ) -> impl Future<Output = Result<Option<String>>> + Send + 'a {
        std::future::ready(Ok(None))
    }
}

/// Fetches the text of a chat message
pub trait MessageSource {
    /// Text of the message at `ts` in `channel`
    fn message_text<'a>(
        &'a self,
        channel: &'a str,
        ts: &'a str,
    ) -> impl Future<Output = Result<String>> + Send + 'a;
}

/// Posts replies into a chat thread
pub trait ThreadPoster {
    /// Reply to the thread rooted at `thread_ts`
    fn post_reply<'a>(
        &'a self,
        channel: &'a str,
        thread_ts: &'a str,
        text: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a;
}
