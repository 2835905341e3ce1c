//! Reaction-triggered invitation workflow
//!
//! reaction → fetch message → extract username → dispatch → reply in thread

use crate::config::InvitationConfig;
use crate::dispatch;
use crate::error::Result;
use crate::traits::{MessageSource, ThreadPoster, UserDirectory};
use crate::types::{InvitationOutcome, InvitationRequest};
use crate::username;
use serde::{Deserialize, Serialize};

/// Message posted when the reacted message holds no username
pub const NO_USERNAME_MESSAGE: &str = "Could not find a GitHub username in the message.";

/// Payload of a `reaction_added` trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    /// User who added the reaction; becomes the inviter
    pub user_id: String,
    /// Channel of the reacted message
    pub channel_id: String,
    /// Timestamp of the reacted message
    pub message_ts: String,
    /// Reaction name without colons
    #[serde(default)]
    pub reaction: String,
}

/// Composes the extractor and dispatcher over a chat backend
pub struct ReactionWorkflow<'a, C> {
    chat: &'a C,
    config: &'a InvitationConfig,
    trigger_reaction: Option<&'a str>,
}

impl<'a, C> ReactionWorkflow<'a, C>
where
    C: MessageSource + ThreadPoster + UserDirectory,
{
    /// Create a workflow that reacts to every reaction
    pub fn new(chat: &'a C, config: &'a InvitationConfig) -> Self {
        Self {
            chat,
            config,
            trigger_reaction: None,
        }
    }

    /// Only run for this reaction name
    pub fn with_trigger_reaction(mut self, reaction: &'a str) -> Self {
        self.trigger_reaction = Some(reaction).filter(|r| !r.is_empty());
        self
    }

    /// Whether `event` should start the workflow
    pub fn accepts(&self, event: &ReactionEvent) -> bool {
        self.trigger_reaction
            .map_or(true, |wanted| wanted == event.reaction.trim_matches(':'))
    }

    /// Run the workflow for one reaction.
    ///
    /// Returns `Ok(None)` when the reaction is filtered out. Errors come
    /// only from fetching the message or posting the reply.
    pub async fn handle(&self, event: &ReactionEvent) -> Result<Option<InvitationOutcome>> {
        if !self.accepts(event) {
            tracing::debug!(reaction = %event.reaction, "reaction ignored");
            return Ok(None);
        }

        let text = self
            .chat
            .message_text(&event.channel_id, &event.message_ts)
            .await?;

        let outcome = match username::extract_with_source(&text) {
            Some(found) if !found.username.is_empty() => {
                tracing::info!(
                    username = found.username,
                    source = found.source.as_str(),
                    "extracted GitHub username"
                );
                let request = InvitationRequest::new(found.username).with_inviter(event.user_id.as_str());
                dispatch::dispatch(&request, self.config, self.chat).await
            }
            _ => {
                tracing::info!(channel = %event.channel_id, ts = %event.message_ts, "no GitHub username in message");
                InvitationOutcome::failure(NO_USERNAME_MESSAGE)
            }
        };

        self.chat
            .post_reply(&event.channel_id, &event.message_ts, &outcome.message)
            .await?;

        Ok(Some(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeChat {
        text: Option<String>,
        replies: Mutex<Vec<(String, String, String)>>,
    }

    impl MessageSource for FakeChat {
        fn message_text<'a>(
            &'a self,
            _channel: &'a str,
            ts: &'a str,
        ) -> impl Future<Output = Result<String>> + Send + 'a {
            let result = self
                .text
                .clone()
                .ok_or_else(|| Error::Slack(format!("message {} not found", ts)));
            std::future::ready(result)
        }
    }

    impl ThreadPoster for FakeChat {
        fn post_reply<'a>(
            &'a self,
            channel: &'a str,
            thread_ts: &'a str,
            text: &'a str,
        ) -> impl Future<Output = Result<()>> + Send + 'a {
            if let Ok(mut replies) = self.replies.lock() {
                replies.push((channel.to_string(), thread_ts.to_string(), text.to_string()));
            }
            std::future::ready(Ok(()))
        }
    }

    impl UserDirectory for FakeChat {
        fn display_name<'a>(
            &'a self,
            _user_id: &'a str,
        ) -> impl Future<Output = Result<Option<String>>> + Send + 'a {
            std::future::ready(Ok(Some("Test User".to_string())))
        }
    }

    fn event(reaction: &str) -> ReactionEvent {
        ReactionEvent {
            user_id: "U12345678".into(),
            channel_id: "C1".into(),
            message_ts: "1700000000.000100".into(),
            reaction: reaction.into(),
        }
    }

    #[tokio::test]
    async fn test_filtered_reaction_is_skipped() {
        let chat = FakeChat::default();
        let config = InvitationConfig::default();
        let workflow = ReactionWorkflow::new(&chat, &config).with_trigger_reaction("github");

        assert!(workflow.handle(&event("thumbsup")).await.unwrap().is_none());
        assert!(workflow.accepts(&event(":github:")));
        assert!(chat.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_username_posts_reply() {
        let chat = FakeChat {
            text: Some("🎉".into()),
            ..Default::default()
        };
        let config = InvitationConfig::default();
        let outcome = ReactionWorkflow::new(&chat, &config)
            .handle(&event("github"))
            .await
            .unwrap()
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message, NO_USERNAME_MESSAGE);
        let replies = chat.replies.lock().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].1, "1700000000.000100");
    }

    #[tokio::test]
    async fn test_missing_config_reply() {
        let chat = FakeChat {
            text: Some("GitHub: octocat".into()),
            ..Default::default()
        };
        let config = InvitationConfig::default();
        let outcome = ReactionWorkflow::new(&chat, &config)
            .handle(&event("github"))
            .await
            .unwrap()
            .unwrap();

        assert!(outcome.message.contains("GitHub configuration is missing"));
        assert_eq!(chat.replies.lock().unwrap()[0].2, outcome.message);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let chat = FakeChat::default();
        let config = InvitationConfig::default();
        let result = ReactionWorkflow::new(&chat, &config).handle(&event("github")).await;
        assert!(result.is_err());
    }
}
