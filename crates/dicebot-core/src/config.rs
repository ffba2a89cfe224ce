//! Dispatcher configuration.

use std::fmt;
use std::str::FromStr;

use crate::types::GameMode;

/// Who receives a win notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudiencePolicy {
    /// Registered admins who are also administrators of the chat the win
    /// happened in, checked live at notification time.
    #[default]
    ChatAdmins,
    /// Every registered admin, regardless of chat.
    AllAdmins,
}

impl AudiencePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudiencePolicy::ChatAdmins => "chat-admins",
            AudiencePolicy::AllAdmins => "all-admins",
        }
    }
}

impl fmt::Display for AudiencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudiencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "chat-admins" => Ok(AudiencePolicy::ChatAdmins),
            "all-admins" => Ok(AudiencePolicy::AllAdmins),
            other => Err(format!(
                "unknown audience policy '{}' (expected chat-admins or all-admins)",
                other
            )),
        }
    }
}

/// Behavior knobs for [`EventDispatcher`](crate::EventDispatcher).
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// Who gets notified about wins.
    pub audience: AudiencePolicy,
    /// Mode assigned to a group when an admin sends `/start` there.
    /// `None` leaves the group without a mode until `/cube` or `/slot`.
    pub start_mode: Option<GameMode>,
}

impl DispatchConfig {
    pub fn with_audience(mut self, audience: AudiencePolicy) -> Self {
        self.audience = audience;
        self
    }

    pub fn with_start_mode(mut self, mode: Option<GameMode>) -> Self {
        self.start_mode = mode;
        self
    }
}
