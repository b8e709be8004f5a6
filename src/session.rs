//! Per-user chat state.
//!
//! The store is owned by the bot and passed to every handler. The lock is
//! only held for map access, never across an `.await`.

use crate::models::Language;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Telegram user id.
pub type UserId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub language: Language,
    /// Country key of the last news request, used by "Refresh".
    pub last_country: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the user's session; a default session if none exists.
    pub fn get(&self, user: UserId) -> Session {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&user)
            .cloned()
            .unwrap_or_default()
    }

    pub fn language(&self, user: UserId) -> Language {
        self.get(user).language
    }

    pub fn last_country(&self, user: UserId) -> Option<String> {
        self.get(user).last_country
    }

    pub fn set_language(&self, user: UserId, language: Language) {
        self.update(user, |s| s.language = language);
    }

    pub fn set_last_country(&self, user: UserId, country: &str) {
        self.update(user, |s| s.last_country = Some(country.to_string()));
    }

    pub fn user_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn update(&self, user: UserId, f: impl FnOnce(&mut Session)) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(sessions.entry(user).or_default());
    }
}
