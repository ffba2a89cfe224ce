//! Error types for the Telegram transport.

use thiserror::Error;

/// Errors that can occur while configuring or running the bot.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set BOT_TOKEN environment variable.")]
    NoToken,

    /// Webhook mode without a public URL.
    #[error("Webhook URL not set. Set WEBHOOK_URL environment variable.")]
    NoWebhookUrl,

    /// Webhook URL could not be built.
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// Webhook registration failed.
    #[error("Failed to register webhook: {0}")]
    WebhookFailed(String),

    /// HTTP client setup error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the core state machine or its collaborators.
    #[error(transparent)]
    Core(#[from] dicebot_core::CoreError),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        TelegramError::HttpError(e.to_string())
    }
}
