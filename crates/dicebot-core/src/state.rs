//! Session state shared by all handlers.

use std::collections::{BTreeSet, HashMap};

use dicebot_persistence::AdminListStore;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::types::{ChatId, GameMode, UserId};

/// Process-lifetime bot state.
///
/// Every operation takes its lock for a single read or assignment, so
/// concurrent handlers see last-writer-wins semantics. Locks are never held
/// across a network call.
pub struct SessionState {
    /// Global on/off switch. Dice and mode commands are ignored while off.
    enabled: RwLock<bool>,
    /// Selected game per chat.
    modes: RwLock<HashMap<ChatId, GameMode>>,
    /// Users who asked to receive win notifications. Never shrinks.
    admins: RwLock<BTreeSet<UserId>>,
    /// Where to checkpoint `admins`, if anywhere.
    store: Option<AdminListStore>,
}

impl SessionState {
    /// Creates an in-memory state with nothing enabled and no admins.
    pub fn new() -> Self {
        Self {
            enabled: RwLock::new(false),
            modes: RwLock::new(HashMap::new()),
            admins: RwLock::new(BTreeSet::new()),
            store: None,
        }
    }

    /// Creates a state whose admin list is loaded from and saved to `store`.
    ///
    /// An unreadable or corrupt file is logged and treated as empty; the next
    /// registration overwrites it.
    pub fn with_store(store: AdminListStore) -> Self {
        let admins = match store.load() {
            Ok(ids) => ids.into_iter().map(UserId).collect(),
            Err(e) => {
                error!(error = %e, path = %store.path().display(), "Failed to load admin list, starting empty");
                BTreeSet::new()
            }
        };
        Self {
            admins: RwLock::new(admins),
            store: Some(store),
            ..Self::new()
        }
    }

    pub async fn is_enabled(&self) -> bool {
        *self.enabled.read().await
    }

    pub async fn set_enabled(&self, enabled: bool) {
        *self.enabled.write().await = enabled;
        info!(enabled, "Bot switched");
    }

    /// Mode selected for `chat`, if any.
    pub async fn mode(&self, chat: ChatId) -> Option<GameMode> {
        self.modes.read().await.get(&chat).copied()
    }

    pub async fn set_mode(&self, chat: ChatId, mode: GameMode) {
        self.modes.write().await.insert(chat, mode);
        info!(chat_id = %chat, mode = %mode, "Game mode selected");
    }

    pub async fn is_admin(&self, user: UserId) -> bool {
        self.admins.read().await.contains(&user)
    }

    /// Snapshot of the registered admins.
    pub async fn admins(&self) -> BTreeSet<UserId> {
        self.admins.read().await.clone()
    }

    /// Registers `user` for notifications.
    ///
    /// Returns `true` if the user was not registered before. A failed save is
    /// logged; the user stays registered in memory.
    pub async fn add_admin(&self, user: UserId) -> bool {
        let mut admins = self.admins.write().await;
        if !admins.insert(user) {
            debug!(user_id = %user, "Admin already registered");
            return false;
        }
        info!(user_id = %user, count = admins.len(), "Admin registered");

        // Saved under the write lock so snapshots hit the disk in order.
        if let Some(store) = &self.store {
            let ids: BTreeSet<u64> = admins.iter().map(|id| id.0).collect();
            if let Err(e) = store.save(&ids) {
                error!(error = %e, path = %store.path().display(), "Failed to save admin list");
            }
        }
        true
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
