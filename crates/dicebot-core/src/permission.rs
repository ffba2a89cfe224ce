//! Live admin checks.

use tracing::{debug, warn};

use crate::gateway::ChatGateway;
use crate::types::{ChatId, UserId};

/// Returns whether `user` currently administers `chat`.
///
/// The admin list is fetched on every call. If the fetch fails the user is
/// treated as not authorized.
pub async fn is_authorized_admin(gateway: &dyn ChatGateway, chat: ChatId, user: UserId) -> bool {
    match gateway.chat_admins(chat).await {
        Ok(admins) => {
            let authorized = admins.contains(&user);
            debug!(chat_id = %chat, user_id = %user, authorized, "Checked chat admin");
            authorized
        }
        Err(e) => {
            warn!(chat_id = %chat, user_id = %user, error = %e, "Failed to fetch chat admins");
            false
        }
    }
}
