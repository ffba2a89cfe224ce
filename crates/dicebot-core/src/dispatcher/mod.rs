//! Event dispatcher: command handling, dice evaluation and win fan-out.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{AudiencePolicy, DispatchConfig};
use crate::gateway::{ChatGateway, PrizeIssuer};
use crate::notification::win_message;
use crate::permission::is_authorized_admin;
use crate::state::SessionState;
use crate::types::{ChatContext, ChatId, Command, CommandEvent, DiceEvent, GameMode, UserId};

#[cfg(test)]
mod tests;

/// Reply to `/start` in a private chat.
pub const SUBSCRIBED_REPLY: &str = "Привет! Я буду отправлять тебе уведомления из группы.";

/// Reply to `/start` in a group.
pub const ENABLED_REPLY: &str = "✅ Бот включён. Админ может выбрать режим:\n/cube\n/slot";

/// Reply to `/off`.
pub const DISABLED_REPLY: &str = "🛑 Бот выключен";

/// Why a command was dropped without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The message had no sender.
    NoSender,
    /// The command only makes sense in a group.
    PrivateChat,
    /// The bot is switched off.
    Disabled,
    /// The sender is not an admin of the group, or the check failed.
    NotAdmin,
}

/// Result of handling a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State was updated and a confirmation was sent.
    Applied,
    /// Nothing happened.
    Dropped(DropReason),
}

/// Why a dice roll was not evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Disabled,
    NoMode,
    /// The roll used a different emoji than the chat's mode expects.
    EmojiMismatch,
}

/// Result of handling a dice roll.
#[derive(Debug)]
pub enum DiceOutcome {
    Ignored(IgnoreReason),
    /// Right game, losing value.
    Miss,
    /// Winning roll; notifications are on their way.
    Win(Delivery),
}

impl DiceOutcome {
    pub fn is_win(&self) -> bool {
        matches!(self, DiceOutcome::Win(_))
    }
}

/// Detached notification and prize tasks started for a win.
///
/// Dropping a `Delivery` does not cancel anything.
#[derive(Debug)]
pub struct Delivery {
    /// Admins a notification was addressed to.
    pub recipients: Vec<UserId>,
    tasks: Vec<JoinHandle<()>>,
}

impl Delivery {
    /// Waits until every send (and the prize request) has finished.
    pub async fn settle(self) {
        join_all(self.tasks).await;
    }
}

type Transition = std::result::Result<&'static str, DropReason>;

/// Routes normalized chat events to the bot's state machine.
pub struct EventDispatcher {
    state: Arc<SessionState>,
    gateway: Arc<dyn ChatGateway>,
    prize: Option<Arc<dyn PrizeIssuer>>,
    config: DispatchConfig,
}

impl EventDispatcher {
    pub fn new(
        state: Arc<SessionState>,
        gateway: Arc<dyn ChatGateway>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            state,
            gateway,
            prize: None,
            config,
        }
    }

    /// Enables prize issuance for slot jackpots.
    pub fn with_prize_issuer(mut self, prize: Arc<dyn PrizeIssuer>) -> Self {
        self.prize = Some(prize);
        self
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handles a bot command. Dropped commands get no reply.
    pub async fn handle_command(&self, event: CommandEvent) -> CommandOutcome {
        let Some(sender) = event.sender else {
            debug!(chat_id = %event.chat.id, command = event.command.name(), "Command without sender dropped");
            return CommandOutcome::Dropped(DropReason::NoSender);
        };

        let transition = match event.command {
            Command::Start => self.start(&event.chat, sender).await,
            Command::Off => self.off(&event.chat, sender).await,
            Command::Cube => self.select_mode(&event.chat, sender, GameMode::Cube).await,
            Command::Slot => self.select_mode(&event.chat, sender, GameMode::Slot).await,
        };

        match transition {
            Ok(reply) => {
                info!(chat_id = %event.chat.id, user_id = %sender, command = event.command.name(), "Command applied");
                if let Err(e) = self.gateway.send_text(event.chat.id, reply).await {
                    warn!(chat_id = %event.chat.id, error = %e, "Failed to send command reply");
                }
                CommandOutcome::Applied
            }
            Err(reason) => {
                debug!(chat_id = %event.chat.id, user_id = %sender, command = event.command.name(), ?reason, "Command dropped");
                CommandOutcome::Dropped(reason)
            }
        }
    }

    /// Evaluates a dice roll and notifies admins on a win.
    pub async fn handle_dice(&self, event: DiceEvent) -> DiceOutcome {
        if !self.state.is_enabled().await {
            return DiceOutcome::Ignored(IgnoreReason::Disabled);
        }
        let Some(mode) = self.state.mode(event.chat.id).await else {
            return DiceOutcome::Ignored(IgnoreReason::NoMode);
        };
        if event.emoji != mode.emoji() {
            return DiceOutcome::Ignored(IgnoreReason::EmojiMismatch);
        }
        if !mode.is_win(event.emoji, event.value) {
            debug!(chat_id = %event.chat.id, value = event.value, "Roll did not win");
            return DiceOutcome::Miss;
        }

        info!(
            chat_id = %event.chat.id,
            user_id = %event.player.id,
            mode = %mode,
            message_id = event.message_id,
            "Winning roll"
        );

        let mut tasks = Vec::new();
        if mode == GameMode::Slot {
            if let Some(task) = self.issue_prize(event.player.id) {
                tasks.push(task);
            }
        }

        let text = Arc::new(win_message(&event, mode));
        let recipients = self.audience(event.chat.id).await;
        info!(chat_id = %event.chat.id, recipients = recipients.len(), "Notifying admins");

        for &recipient in &recipients {
            let gateway = Arc::clone(&self.gateway);
            let text = Arc::clone(&text);
            tasks.push(tokio::spawn(async move {
                match gateway.send_text(ChatId::from(recipient), &text).await {
                    Ok(()) => debug!(user_id = %recipient, "Win notification sent"),
                    Err(e) => warn!(user_id = %recipient, error = %e, "Failed to send win notification"),
                }
            }));
        }

        DiceOutcome::Win(Delivery { recipients, tasks })
    }

    async fn start(&self, chat: &ChatContext, sender: UserId) -> Transition {
        if chat.is_private() {
            self.state.add_admin(sender).await;
            return Ok(SUBSCRIBED_REPLY);
        }

        self.require_admin(chat.id, sender).await?;

        self.state.set_enabled(true).await;
        self.state.add_admin(sender).await;
        if let Some(mode) = self.config.start_mode {
            self.state.set_mode(chat.id, mode).await;
        }
        Ok(ENABLED_REPLY)
    }

    async fn off(&self, chat: &ChatContext, sender: UserId) -> Transition {
        if chat.is_private() {
            return Err(DropReason::PrivateChat);
        }
        if !self.state.is_enabled().await {
            return Err(DropReason::Disabled);
        }
        self.require_admin(chat.id, sender).await?;

        self.state.set_enabled(false).await;
        Ok(DISABLED_REPLY)
    }

    async fn select_mode(&self, chat: &ChatContext, sender: UserId, mode: GameMode) -> Transition {
        if !self.state.is_enabled().await {
            return Err(DropReason::Disabled);
        }
        if chat.is_private() {
            return Err(DropReason::PrivateChat);
        }
        self.require_admin(chat.id, sender).await?;

        self.state.set_mode(chat.id, mode).await;
        Ok(mode.confirmation())
    }

    async fn require_admin(&self, chat: ChatId, user: UserId) -> std::result::Result<(), DropReason> {
        if is_authorized_admin(self.gateway.as_ref(), chat, user).await {
            Ok(())
        } else {
            Err(DropReason::NotAdmin)
        }
    }

    /// Registered admins who should hear about a win in `chat`.
    async fn audience(&self, chat: ChatId) -> Vec<UserId> {
        let registered = self.state.admins().await;
        match self.config.audience {
            AudiencePolicy::AllAdmins => registered.into_iter().collect(),
            AudiencePolicy::ChatAdmins => match self.gateway.chat_admins(chat).await {
                Ok(live) => live
                    .into_iter()
                    .filter(|user| registered.contains(user))
                    .collect(),
                Err(e) => {
                    warn!(chat_id = %chat, error = %e, "Failed to fetch chat admins, nobody notified");
                    Vec::new()
                }
            },
        }
    }

    fn issue_prize(&self, user: UserId) -> Option<JoinHandle<()>> {
        let prize = Arc::clone(self.prize.as_ref()?);
        Some(tokio::spawn(async move {
            match prize.issue(user).await {
                Ok(()) => info!(user_id = %user, "Prize issued"),
                Err(e) => warn!(user_id = %user, error = %e, "Prize issuance failed"),
            }
        }))
    }
}
