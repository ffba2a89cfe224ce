//! [`ChatGateway`] backed by the Telegram Bot API.

use async_trait::async_trait;
use dicebot_core::{ChatGateway, ChatId, CoreError, UserId};
use teloxide::requests::Requester;
use teloxide::{types as tg, Bot};

/// Sends messages and looks up chat admins through teloxide.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn chat_admins(&self, chat: ChatId) -> dicebot_core::Result<Vec<UserId>> {
        let members = self
            .bot
            .get_chat_administrators(tg::ChatId(chat.0))
            .await
            .map_err(|e| CoreError::Transport(e.to_string()))?;
        Ok(members.into_iter().map(|m| UserId(m.user.id.0)).collect())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> dicebot_core::Result<()> {
        self.bot
            .send_message(tg::ChatId(chat.0), text)
            .await
            .map_err(|e| CoreError::Transport(e.to_string()))?;
        Ok(())
    }
}
