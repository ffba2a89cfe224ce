//! Normalized chat events and identifiers.
//!
//! The transport converts whatever its client library delivers into these
//! types before handing them to the dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Telegram chat identifier. Negative for groups, equal to the user id for
/// private chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Telegram user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl From<UserId> for ChatId {
    /// The private chat with a user shares the user's id.
    fn from(user: UserId) -> Self {
        ChatId(user.0 as i64)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a chat is a one-to-one conversation with the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
}

/// The chat an event originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub id: ChatId,
    pub kind: ChatKind,
    /// Display title. Private chats have none.
    pub title: Option<String>,
    /// Public `@username` without the `@`, if the chat has one.
    pub username: Option<String>,
}

impl ChatContext {
    /// Creates a group chat context.
    pub fn group(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: ChatId(id),
            kind: ChatKind::Group,
            title: Some(title.into()),
            username: None,
        }
    }

    /// Creates a private chat context.
    pub fn private(id: i64) -> Self {
        Self {
            id: ChatId(id),
            kind: ChatKind::Private,
            title: None,
            username: None,
        }
    }

    /// Sets the public username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}

/// The user who rolled the dice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

impl Player {
    pub fn new(id: u64, first_name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            first_name: first_name.into(),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Animated emoji a dice message was sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceEmoji {
    /// 🎲
    Die,
    /// 🎰
    SlotMachine,
    /// 🎯
    Darts,
    /// 🏀
    Basketball,
    /// ⚽
    Football,
    /// 🎳
    Bowling,
}

impl DiceEmoji {
    /// Parses the emoji Telegram puts in the `dice.emoji` field.
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            "🎲" => Some(Self::Die),
            "🎰" => Some(Self::SlotMachine),
            "🎯" => Some(Self::Darts),
            "🏀" => Some(Self::Basketball),
            "⚽" => Some(Self::Football),
            "🎳" => Some(Self::Bowling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Die => "🎲",
            Self::SlotMachine => "🎰",
            Self::Darts => "🎯",
            Self::Basketball => "🏀",
            Self::Football => "⚽",
            Self::Bowling => "🎳",
        }
    }
}

/// Game selected for a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Cube,
    Slot,
}

impl GameMode {
    /// Dice value Telegram reports for the slot machine's "777" combination.
    pub const SLOT_JACKPOT: u8 = 64;

    /// Top face of the die.
    pub const CUBE_SIX: u8 = 6;

    /// The only emoji this mode reacts to.
    pub fn emoji(&self) -> DiceEmoji {
        match self {
            GameMode::Cube => DiceEmoji::Die,
            GameMode::Slot => DiceEmoji::SlotMachine,
        }
    }

    pub fn winning_value(&self) -> u8 {
        match self {
            GameMode::Cube => Self::CUBE_SIX,
            GameMode::Slot => Self::SLOT_JACKPOT,
        }
    }

    /// What the player "hit", as shown in the notification.
    pub fn prize_label(&self) -> &'static str {
        match self {
            GameMode::Cube => "6",
            GameMode::Slot => "777",
        }
    }

    /// Whether a roll with `emoji` and `value` wins in this mode.
    pub fn is_win(&self, emoji: DiceEmoji, value: u8) -> bool {
        emoji == self.emoji() && value == self.winning_value()
    }

    /// Group reply confirming the mode switch.
    pub fn confirmation(&self) -> &'static str {
        match self {
            GameMode::Cube => "🎲 Режим КУБИКА включён",
            GameMode::Slot => "🎰 Режим СЛОТА включён",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Cube => "cube",
            GameMode::Slot => "slot",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cube" | "dice" => Ok(GameMode::Cube),
            "slot" => Ok(GameMode::Slot),
            other => Err(format!("unknown game mode '{}' (expected cube or slot)", other)),
        }
    }
}

/// Commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Register for notifications (private) or switch the bot on (group).
    Start,
    /// Switch the bot off.
    Off,
    /// Select the die game.
    Cube,
    /// Select the slot machine game.
    Slot,
}

impl Command {
    /// Every command, in menu order.
    pub const ALL: [Command; 4] = [Command::Start, Command::Off, Command::Cube, Command::Slot];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Off => "off",
            Command::Cube => "cube",
            Command::Slot => "slot",
        }
    }

    /// Looks up a command by name, without the leading slash.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// Parses `/name` or `/name@bot_username` from the start of a message.
    ///
    /// Commands addressed to a different bot are rejected.
    pub fn parse(text: &str, bot_username: Option<&str>) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let (name, target) = match name.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (name, None),
        };
        if let (Some(target), Some(me)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(me) {
                return None;
            }
        }
        Self::from_name(&name.to_ascii_lowercase())
    }

    /// Text shown in the Telegram command menu.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Включить бота / подписаться на уведомления",
            Command::Off => "Выключить бота",
            Command::Cube => "Режим кубика",
            Command::Slot => "Режим слота",
        }
    }
}

/// A command sent in some chat.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    pub command: Command,
    pub chat: ChatContext,
    /// `None` for messages without a sender, e.g. channel posts.
    pub sender: Option<UserId>,
}

/// A dice message sent in some chat.
#[derive(Debug, Clone)]
pub struct DiceEvent {
    pub chat: ChatContext,
    pub player: Player,
    pub emoji: DiceEmoji,
    pub value: u8,
    pub message_id: i32,
}
