//! HTTP clients for the GitHub and Slack APIs

pub mod github;
pub mod slack;

pub use github::GitHubClient;
pub use slack::{SlackClient, SlackUser};
