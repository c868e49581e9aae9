//! Composition root: storage, session, auth context, and API client wired
//! into one scope.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front ends build one [`App`], call [`App::start`] once to hydrate the
//! session, then resolve every navigation through [`App::navigate`] and
//! construct pages from [`App::scope`] only when it says `Render`.

#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::{ApiClient, ApiError, RentalApi};
use crate::routing::{LocationState, Navigation, Route, resolve, resolve_route};
use crate::state::{AuthContext, Scope, SessionStore};
use crate::storage::{FileStorage, Storage};

pub struct App {
    scope: Scope,
    auth: AuthContext,
    api: Arc<dyn RentalApi>,
}

impl App {
    /// File-backed session and the HTTP client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.session_file));
        let session = SessionStore::new(storage);
        let auth = AuthContext::new(session.clone());
        let api = ApiClient::new(config, session)?.with_auth(auth.clone());
        tracing::debug!(api_url = %api.base_url(), session_file = %config.session_file.display(), "client configured");
        Ok(Self::assemble(auth, Arc::new(api)))
    }

    /// Wire caller-supplied storage and API, e.g. in tests.
    #[must_use]
    pub fn with_parts(storage: Arc<dyn Storage>, api: Arc<dyn RentalApi>) -> Self {
        Self::assemble(AuthContext::new(SessionStore::new(storage)), api)
    }

    fn assemble(auth: AuthContext, api: Arc<dyn RentalApi>) -> Self {
        let scope = Scope::new();
        scope.provide(auth.clone());
        scope.provide(Arc::clone(&api));
        Self { scope, auth, api }
    }

    /// Hydrate the session. Safe to call more than once.
    pub async fn start(&self) {
        self.auth.hydrate().await;
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn RentalApi> {
        &self.api
    }

    #[must_use]
    pub fn navigate(&self, path: &str, state: LocationState) -> Navigation {
        resolve(&self.auth.state(), path, state)
    }

    /// Like [`App::navigate`] for a route built in code rather than typed.
    #[must_use]
    pub fn navigate_to(&self, route: Route, state: LocationState) -> Navigation {
        resolve_route(&self.auth.state(), route, state)
    }
}
