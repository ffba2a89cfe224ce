//! Persistence layer for the dice notifier bot.
//!
//! The only persisted state is the list of admins who receive win
//! notifications. It is stored as a plain JSON array of Telegram user ids and
//! rewritten in full (temp file, then rename) every time it changes.
//!
//! # Example
//!
//! ```no_run
//! use dicebot_persistence::AdminListStore;
//! use std::collections::BTreeSet;
//!
//! let store = AdminListStore::new("/home/user/.dicebot/admins.json");
//!
//! let mut admins: BTreeSet<u64> = store.load().unwrap();
//! admins.insert(42);
//! store.save(&admins).unwrap();
//! ```

pub mod admin_store;
pub mod atomic;
pub mod error;

pub use admin_store::AdminListStore;
pub use error::{PersistenceError, Result};
