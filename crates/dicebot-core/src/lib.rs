//! Core logic of the dice notifier bot.
//!
//! Group admins switch the bot on with `/start` and pick a game with `/cube`
//! or `/slot`. When a player then rolls a 6 on the die (or 777 on the slot
//! machine) every registered admin gets a private message with links to the
//! player, the group and the winning message.
//!
//! This crate knows nothing about the Telegram client library. Everything it
//! needs from the outside world goes through two traits:
//!
//! - [`ChatGateway`]: fetch chat administrators, send a text message
//! - [`PrizeIssuer`]: hand out a reward for a slot jackpot
//!
//! # Example
//!
//! ```ignore
//! use dicebot_core::{DispatchConfig, EventDispatcher, SessionState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(SessionState::new());
//! let dispatcher = EventDispatcher::new(state, gateway, DispatchConfig::default());
//!
//! dispatcher.handle_command(event).await;
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod links;
pub mod notification;
pub mod permission;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AudiencePolicy, DispatchConfig};
pub use dispatcher::{CommandOutcome, Delivery, DiceOutcome, DropReason, EventDispatcher, IgnoreReason};
pub use error::{CoreError, Result};
pub use gateway::{ChatGateway, PrizeIssuer};
pub use permission::is_authorized_admin;
pub use state::SessionState;
pub use types::{
    ChatContext, ChatId, ChatKind, Command, CommandEvent, DiceEmoji, DiceEvent, GameMode, Player,
    UserId,
};
