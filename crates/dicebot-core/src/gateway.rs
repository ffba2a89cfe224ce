//! Collaborator traits the dispatcher talks to.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatId, UserId};

/// The chat platform, as seen by the dispatcher.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Fetches the current administrators of `chat`.
    async fn chat_admins(&self, chat: ChatId) -> Result<Vec<UserId>>;

    /// Sends a plain text message. Private messages use the user's id as the
    /// chat id.
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<()>;
}

/// External service that rewards slot jackpots.
#[async_trait]
pub trait PrizeIssuer: Send + Sync {
    /// Issues the prize to `user`. The response body is not interpreted.
    async fn issue(&self, user: UserId) -> Result<()>;
}
