//! Authentication state and its single writer.
//!
//! DESIGN
//! ======
//! [`AuthContext`] owns the [`SessionStore`] and a `watch` channel holding the
//! current [`AuthState`]. Only three transitions mutate either: hydration
//! (once), `login`, and `logout`. Views hold clones of the context and read
//! or subscribe; nothing else writes the session.
//!
//! Hydration reads storage off the async executor. If `login`/`logout` runs
//! while that read is in flight, the stale read must not overwrite the newer
//! user, so each transition bumps a generation counter that hydration checks
//! before applying what it read.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::watch;

use super::session::{Session, SessionStore};
use crate::net::types::{Role, User};
use crate::storage::StorageError;

/// Snapshot of who is signed in and whether that is known yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl AuthState {
    /// State before the session has been read from storage.
    #[must_use]
    pub fn hydrating() -> Self {
        Self { user: None, is_loading: true }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        match (&self.user, self.is_loading) {
            (_, true) => AuthPhase::Hydrating,
            (Some(user), false) => AuthPhase::Authenticated(user.clone()),
            (None, false) => AuthPhase::Anonymous,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthPhase {
    Hydrating,
    Authenticated(User),
    Anonymous,
}

/// Owner of the session and the auth state. Cheap to clone.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthInner>,
}

struct AuthInner {
    session: SessionStore,
    state: watch::Sender<AuthState>,
    hydration_started: AtomicBool,
    generation: AtomicU64,
}

impl AuthContext {
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        let (state, _) = watch::channel(AuthState::hydrating());
        Self {
            inner: Arc::new(AuthInner {
                session,
                state,
                hydration_started: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Read the stored session once and leave the loading state.
    ///
    /// The read runs on its own task, so dropping this future (a timeout, a
    /// `select!`) does not strand the context in `Hydrating`. Later calls wait
    /// for that task's result instead of starting another read.
    pub async fn hydrate(&self) {
        if !self.inner.hydration_started.swap(true, Ordering::SeqCst) {
            let auth = self.clone();
            if let Err(e) = tokio::spawn(async move { auth.load_stored_session().await }).await {
                tracing::warn!(error = %e, "session hydration task failed");
                self.inner.state.send_modify(|state| state.is_loading = false);
            }
        }

        let mut rx = self.subscribe();
        if rx.wait_for(|state| !state.is_loading).await.is_err() {
            tracing::warn!("auth state closed before hydration finished");
        }
    }

    async fn load_stored_session(&self) {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let session = self.inner.session.clone();
        let stored = match tokio::task::spawn_blocking(move || session.read()).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "session read failed");
                None
            }
        };

        self.inner.state.send_modify(|state| {
            if self.inner.generation.load(Ordering::SeqCst) == generation {
                state.user = stored.map(|s| s.user);
            }
            state.is_loading = false;
        });
        tracing::debug!(authenticated = self.state().is_authenticated(), "session hydrated");
    }

    /// Persist a new session and become authenticated as `user`.
    ///
    /// # Errors
    ///
    /// Returns an error, without changing state, if the session cannot be
    /// persisted.
    pub fn login(&self, token: String, user: User) -> Result<(), StorageError> {
        let session = Session { token, user };
        self.inner.session.write(&session)?;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        tracing::info!(user_id = %session.user.id, role = %session.user.role, "signed in");
        self.inner.state.send_modify(|state| state.user = Some(session.user));
        Ok(())
    }

    /// Drop the session and become anonymous. Safe to call repeatedly.
    pub fn logout(&self) {
        if let Err(e) = self.inner.session.clear() {
            tracing::warn!(error = %e, "failed to clear stored session on logout");
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        let was_signed_in = self.state().is_authenticated();
        self.inner.state.send_if_modified(|state| state.user.take().is_some());
        if was_signed_in {
            tracing::info!("signed out");
        }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.inner.state.borrow().phase()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }
}
