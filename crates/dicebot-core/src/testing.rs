//! Mock collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CoreError, Result};
use crate::gateway::{ChatGateway, PrizeIssuer};
use crate::types::{ChatId, UserId};

/// In-memory chat platform that records every sent message.
pub(crate) struct MockGateway {
    admins: HashMap<ChatId, Vec<UserId>>,
    fail_admin_lookup: bool,
    unreachable: HashSet<ChatId>,
    lookups: AtomicUsize,
    sent: Mutex<Vec<(ChatId, String)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            admins: HashMap::new(),
            fail_admin_lookup: false,
            unreachable: HashSet::new(),
            lookups: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_admins(mut self, chat: i64, users: &[u64]) -> Self {
        self.admins
            .insert(ChatId(chat), users.iter().copied().map(UserId).collect());
        self
    }

    pub fn failing_admin_lookup(mut self) -> Self {
        self.fail_admin_lookup = true;
        self
    }

    /// Sends to `chat` fail, as if the user blocked the bot.
    pub fn unreachable(mut self, chat: i64) -> Self {
        self.unreachable.insert(ChatId(chat));
        self
    }

    pub fn admin_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat: i64) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| *to == ChatId(chat))
            .map(|(_, text)| text)
            .collect()
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn chat_admins(&self, chat: ChatId) -> Result<Vec<UserId>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_admin_lookup {
            return Err(CoreError::Transport("getChatAdministrators timed out".into()));
        }
        Ok(self.admins.get(&chat).cloned().unwrap_or_default())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> Result<()> {
        if self.unreachable.contains(&chat) {
            return Err(CoreError::Transport("Forbidden: bot was blocked by the user".into()));
        }
        self.sent.lock().unwrap().push((chat, text.to_string()));
        Ok(())
    }
}

/// Prize service that records issued prizes, or always fails.
pub(crate) struct MockPrize {
    fail: bool,
    issued: Mutex<Vec<UserId>>,
}

impl MockPrize {
    pub fn new() -> Self {
        Self {
            fail: false,
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn down() -> Self {
        Self {
            fail: true,
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn issued(&self) -> Vec<UserId> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrizeIssuer for MockPrize {
    async fn issue(&self, user: UserId) -> Result<()> {
        if self.fail {
            return Err(CoreError::Prize("connection refused".into()));
        }
        self.issued.lock().unwrap().push(user);
        Ok(())
    }
}
