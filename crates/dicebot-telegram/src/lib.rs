//! Telegram transport for the dice notifier bot.
//!
//! Wires the [`dicebot_core`] state machine to the Telegram Bot API using
//! teloxide, either by long polling or through a webhook served by axum.
//!
//! # Environment Variables
//!
//! Required:
//! - `BOT_TOKEN` (or `TELEGRAM_BOT_TOKEN`): Bot token from @BotFather
//! - `WEBHOOK_URL`: Public base URL, webhook mode only
//!
//! Optional:
//! - `PORT`: Webhook listen port (default: 8443)
//! - `PERSIST_ADMINS` / `ADMINS_FILE`: Keep the admin list on disk
//! - `AUDIENCE_POLICY`: `chat-admins` (default) or `all-admins`
//! - `START_MODE`: Mode a group gets on `/start` (`cube` or `slot`)
//! - `PRIZE_URL`: Base URL of the prize service for slot jackpots
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use dicebot_telegram::{Args, BotConfig, DiceBot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_args(Args::parse())?;
//!     let bot = DiceBot::new(config)?;
//!     bot.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Subscribe to notifications (private) or switch the bot on (group)
//! - `/off` - Switch the bot off
//! - `/cube` - Watch for sixes on 🎲
//! - `/slot` - Watch for 777 on 🎰

pub mod bot;
pub mod config;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod prize;
pub mod webhook;

pub use bot::DiceBot;
pub use config::{Args, BotConfig, Transport};
pub use error::{Result, TelegramError};
pub use gateway::TelegramGateway;
pub use prize::HttpPrizeIssuer;
