//! Command line and environment configuration.
//!
//! Every option can be given as a flag or as an environment variable; `.env`
//! files are loaded by the binary before parsing.

use std::path::PathBuf;

use clap::Parser;
use dicebot_core::{AudiencePolicy, DispatchConfig, GameMode};
use url::Url;

use crate::error::{Result, TelegramError};

/// Environment variable for a custom state directory.
pub const STATE_DIR_ENV: &str = "DICEBOT_STATE_DIR";

/// Token variable accepted when `BOT_TOKEN` is not set.
pub const LEGACY_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".dicebot";

/// Admin list file name inside the state directory.
const ADMINS_FILE_NAME: &str = "admins.json";

/// Default webhook port.
pub const DEFAULT_WEBHOOK_PORT: u16 = 8443;

/// Dice notifier bot - tells group admins when someone rolls a 6 or hits 777
#[derive(Parser, Debug, Clone)]
#[command(name = "dicebot")]
#[command(about = "Telegram bot that notifies admins about winning dice rolls")]
pub struct Args {
    /// Bot token from @BotFather
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Receive updates through a webhook instead of long polling
    #[arg(short, long, env = "USE_WEBHOOK")]
    pub webhook: bool,

    /// Public base URL Telegram should post updates to (webhook mode)
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<Url>,

    /// Port the webhook server listens on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_WEBHOOK_PORT)]
    pub port: u16,

    /// Keep the admin list on disk across restarts
    #[arg(long, env = "PERSIST_ADMINS")]
    pub persist_admins: bool,

    /// Admin list file (implies --persist-admins)
    #[arg(long, env = "ADMINS_FILE")]
    pub admins_file: Option<PathBuf>,

    /// Who gets win notifications: chat-admins or all-admins
    #[arg(long, env = "AUDIENCE_POLICY", default_value = "chat-admins")]
    pub audience: AudiencePolicy,

    /// Mode a group gets when an admin sends /start (cube or slot)
    #[arg(long, env = "START_MODE")]
    pub start_mode: Option<GameMode>,

    /// Base URL of the prize service; slot jackpots post to <url>/win777
    #[arg(long, env = "PRIZE_URL")]
    pub prize_url: Option<Url>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// How updates reach the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// `getUpdates` long polling.
    Polling,
    /// Telegram posts updates to `<base_url>/bot<token>`; the server listens
    /// on `port`.
    Webhook { base_url: Url, port: u16 },
}

/// Validated bot configuration.
#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub transport: Transport,
    /// Admin list file, when persistence is on.
    pub admins_file: Option<PathBuf>,
    pub dispatch: DispatchConfig,
    pub prize_url: Option<Url>,
}

impl BotConfig {
    /// Validates parsed arguments.
    ///
    /// Fails when the token is missing, or when webhook mode is requested
    /// without a public URL.
    pub fn from_args(args: Args) -> Result<Self> {
        let token = args
            .token
            .or_else(|| std::env::var(LEGACY_TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
            .ok_or(TelegramError::NoToken)?;

        let transport = if args.webhook {
            let base_url = args.webhook_url.ok_or(TelegramError::NoWebhookUrl)?;
            Transport::Webhook {
                base_url,
                port: args.port,
            }
        } else {
            Transport::Polling
        };

        let admins_file = match args.admins_file {
            Some(path) => Some(path),
            None if args.persist_admins => Some(default_admins_file()),
            None => None,
        };

        Ok(Self {
            token,
            transport,
            admins_file,
            dispatch: DispatchConfig::default()
                .with_audience(args.audience)
                .with_start_mode(args.start_mode),
            prize_url: args.prize_url,
        })
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("transport", &self.transport)
            .field("admins_file", &self.admins_file)
            .field("dispatch", &self.dispatch)
            .field("prize_url", &self.prize_url)
            .finish()
    }
}

/// Get the bot's state directory.
///
/// Determined by `DICEBOT_STATE_DIR` if set, then `~/.dicebot`, then
/// `.dicebot` in the current directory.
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Default location of the persisted admin list.
pub fn default_admins_file() -> PathBuf {
    state_dir().join(ADMINS_FILE_NAME)
}
