//! Persisted session: bearer token plus the signed-in user.
//!
//! The two halves live under separate keys so the API client can read the
//! token without decoding the user. They are only meaningful together:
//! [`SessionStore::read`] discards either half when the other is missing or
//! the user record does not decode.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;

use crate::net::types::User;
use crate::storage::{Storage, StorageError};

pub const TOKEN_KEY: &str = "rat_token";
pub const USER_KEY: &str = "rat_user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Read/write/clear access to the persisted session. Cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load the stored session. Never fails: a half-written or undecodable
    /// session is wiped and reported as absent.
    #[must_use]
    pub fn read(&self) -> Option<Session> {
        let token = self.token();
        let raw_user = self.storage.get(USER_KEY).filter(|u| !u.is_empty());

        let (token, raw_user) = match (token, raw_user) {
            (Some(token), Some(raw_user)) => (token, raw_user),
            (None, None) => return None,
            _ => {
                tracing::warn!("discarding incomplete stored session");
                self.discard();
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session { token, user }),
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse stored user; clearing session");
                self.discard();
                None
            }
        }
    }

    /// Persist both halves. If the user cannot be stored the token written
    /// just before it is rolled back.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects either write.
    pub fn write(&self, session: &Session) -> Result<(), StorageError> {
        let user = serde_json::to_string(&session.user)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user) {
            let _ = self.storage.remove(TOKEN_KEY);
            return Err(e);
        }
        Ok(())
    }

    /// Remove both halves. Both removals are attempted even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn clear(&self) -> Result<(), StorageError> {
        let token = self.storage.remove(TOKEN_KEY);
        let user = self.storage.remove(USER_KEY);
        token.and(user)
    }

    /// The raw bearer token, as the request interceptor sees it.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    fn discard(&self) {
        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "failed to clear stored session");
        }
    }
}
