//! Deep links to players, groups and messages.
//!
//! Public entities get `https://t.me/...` links. Everything else falls back
//! to `tg://` links that only open inside a Telegram client.

use crate::types::{ChatContext, Player};

/// Link to the player's profile.
pub fn player_link(player: &Player) -> String {
    match &player.username {
        Some(username) => format!("https://t.me/{}", username),
        None => format!("tg://user?id={}", player.id),
    }
}

/// Link to the group.
pub fn group_link(chat: &ChatContext) -> String {
    match &chat.username {
        Some(username) => format!("https://t.me/{}", username),
        None => format!("tg://openmessage?chat_id={}", chat.id),
    }
}

/// Permalink to a message in the group.
pub fn message_link(chat: &ChatContext, message_id: i32) -> String {
    match &chat.username {
        Some(username) => format!("https://t.me/{}/{}", username, message_id),
        None => format!(
            "tg://openmessage?chat_id={}&message_id={}",
            chat.id, message_id
        ),
    }
}
