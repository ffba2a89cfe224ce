//! Text of the private message admins receive on a win.

use crate::links::{group_link, message_link, player_link};
use crate::types::{DiceEvent, GameMode};

/// Formats the win notification for `event` rolled under `mode`.
pub fn win_message(event: &DiceEvent, mode: GameMode) -> String {
    let title = event.chat.title.as_deref().unwrap_or_default();
    format!(
        "🚨 В группе \"{title}\"\n\
         {symbol} Игрок {name} выбил {label}\n\n\
         🔗 Ссылка на игрока: {player}\n\
         🔗 Ссылка на группу: {group}\n\
         🔗 Ссылка на сообщение: {message}",
        title = title,
        symbol = mode.emoji().as_str(),
        name = event.player.first_name,
        label = mode.prize_label(),
        player = player_link(&event.player),
        group = group_link(&event.chat),
        message = message_link(&event.chat, event.message_id),
    )
}
