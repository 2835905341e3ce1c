//! Slack Web API client: user lookup, message fetch and thread replies

use crate::config::SlackConfig;
use crate::error::{Error, Result};
use crate::traits::{MessageSource, ThreadPoster, UserDirectory};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Fields every Slack Web API response carries
trait SlackEnvelope {
    fn ok(&self) -> bool;
    fn error(&self) -> Option<&str>;
}

macro_rules! slack_envelope {
    ($ty:ty) => {
        impl SlackEnvelope for $ty {
            fn ok(&self) -> bool {
                self.ok
            }
            fn error(&self) -> Option<&str> {
                self.error.as_deref()
            }
        }
    };
}

/// `users.info` response
#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    user: Option<SlackUser>,
}

/// Slack user profile subset
#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    /// User id
    #[serde(default)]
    pub id: Option<String>,
    /// Handle
    #[serde(default)]
    pub name: Option<String>,
    /// Full name
    #[serde(default)]
    pub real_name: Option<String>,
}

impl SlackUser {
    /// `real_name`, then `name`, skipping empty values
    pub fn display_name(&self) -> Option<&str> {
        self.real_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.name.as_deref().filter(|n| !n.is_empty()))
    }
}

/// `conversations.history` response
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<SlackMessage>,
}

#[derive(Debug, Deserialize)]
struct SlackMessage {
    #[serde(default)]
    text: Option<String>,
}

/// `chat.postMessage` response
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

slack_envelope!(UsersInfoResponse);
slack_envelope!(HistoryResponse);
slack_envelope!(PostMessageResponse);

#[derive(Debug, Serialize)]
struct PostMessageBody<'a> {
    channel: &'a str,
    thread_ts: &'a str,
    text: &'a str,
}

/// Slack Web API client
pub struct SlackClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Create a new Slack client
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

    /// Create from a Slack config
    pub fn from_config(config: &SlackConfig) -> Self {
        Self::new(config.api_url.clone(), config.bot_token.clone())
    }

    fn authorize(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    /// Send a Web API call and unwrap Slack's `ok`/`error` envelope
    async fn call<T>(&self, method: &str, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + SlackEnvelope,
    {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::Http(format!("Slack {} request failed: {}", method, e)))?;

        if !response.status().is_success() {
            return Err(Error::Slack(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let body: T = response
            .json()
            .await
            .map_err(|e| Error::Json(format!("Failed to parse {} response: {}", method, e)))?;

        if !body.ok() {
            return Err(Error::Slack(format!(
                "{} failed: {}",
                method,
                body.error().unwrap_or("unknown_error")
            )));
        }

        Ok(body)
    }

    /// Look up a user by id
    pub async fn users_info(&self, user_id: &str) -> Result<Option<SlackUser>> {
        let url = format!("{}/users.info", self.base_url);
        let request = self.client.get(&url).query(&[("user", user_id)]);
        let body: UsersInfoResponse = self.call("users.info", request).await?;
        Ok(body.user)
    }

    /// Fetch the text of the message at `ts`
    pub async fn conversation_message(&self, channel: &str, ts: &str) -> Result<String> {
        let url = format!("{}/conversations.history", self.base_url);
        let request = self.client.get(&url).query(&[
            ("channel", channel),
            ("latest", ts),
            ("inclusive", "true"),
            ("limit", "1"),
        ]);
        let body: HistoryResponse = self.call("conversations.history", request).await?;

        body.messages
            .into_iter()
            .next()
            .map(|m| m.text.unwrap_or_default())
            .ok_or_else(|| Error::Slack(format!("message {} not found in {}", ts, channel)))
    }

    /// Post `text` as a reply in the thread rooted at `thread_ts`
    pub async fn post_message(&self, channel: &str, thread_ts: &str, text: &str) -> Result<()> {
        let url = format!("{}/chat.postMessage", self.base_url);
        let request = self.client.post(&url).json(&PostMessageBody {
            channel,
            thread_ts,
            text,
        });
        let _: PostMessageResponse = self.call("chat.postMessage", request).await?;
        Ok(())
    }
}

impl UserDirectory for SlackClient {
    fn display_name<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Future<Output = Result<Option<String>>> + Send + 'a {
        async move {
            let user = self.users_info(user_id).await?;
            Ok(user.as_ref().and_then(SlackUser::display_name).map(str::to_owned))
        }
    }
}

impl MessageSource for SlackClient {
    fn message_text<'a>(
        &'a self,
        channel: &'a str,
        ts: &'a str,
    ) -> impl Future<Output = Result<String>> + Send + 'a {
        self.conversation_message(channel, ts)
    }
}

impl ThreadPoster for SlackClient {
    fn post_reply<'a>(
        &'a self,
        channel: &'a str,
        thread_ts: &'a str,
        text: &'a str,
    ) -> impl Future<Output = Result<()>> + Send + 'a {
        self.post_message(channel, thread_ts, text)
    }
}
