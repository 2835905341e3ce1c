//! # ghinvite core
//!
//! GitHub organization invitations driven by chat messages.
//!
//! Two stateless units do the work:
//! - [`username`] pulls a best-guess GitHub username out of free text with
//!   an ordered chain of heuristics
//! - [`dispatch`] sends one invitation and classifies GitHub's answer into
//!   an [`InvitationOutcome`], never an error
//!
//! [`step`] exposes both as workflow functions with a fixed input/output
//! contract, and [`workflow`] wires them to a reaction on a chat message.
//!
//! ## Example
//!
//! ```no_run
//! use ghinvite_core::{dispatch, extract_username, InvitationConfig, InvitationRequest, NoDirectory};
//!
//! # async fn example() {
//! let username = extract_username("Please add this person to our GitHub: octocat");
//! assert_eq!(username, "octocat");
//!
//! let config = InvitationConfig::from_env();
//! let outcome = dispatch(&InvitationRequest::new(username), &config, &NoDirectory).await;
//! println!("{}", outcome.message);
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod logging;
pub mod step;
pub mod traits;
pub mod types;
pub mod username;
pub mod workflow;

pub use config::{InvitationConfig, SlackConfig};
pub use dispatch::dispatch;
pub use error::{Error, ErrorKind, Result};
pub use traits::{InvitationApi, MessageSource, NoDirectory, ThreadPoster, UserDirectory};
pub use types::{InvitationOutcome, InvitationRequest, InvitationStatus, Permission};
pub use username::extract_username;
pub use workflow::{ReactionEvent, ReactionWorkflow};
