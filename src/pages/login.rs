//! Sign-in form.

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

use std::sync::Arc;

use super::lifecycle::ViewCell;
use crate::net::RentalApi;
use crate::routing::{Goto, LocationState, Route};
use crate::state::{AuthContext, MissingProvider, Scope, use_api, use_auth};

pub const LOGIN_FAILED: &str = "Invalid credentials.";
const SESSION_NOT_SAVED: &str = "Could not save your session. Please try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    pub loading: bool,
    pub error: Option<String>,
    /// Message handed over by the page that sent the visitor here.
    pub flash: Option<String>,
}

pub struct LoginPage {
    auth: AuthContext,
    api: Arc<dyn RentalApi>,
    cell: ViewCell<LoginState>,
    return_to: Option<String>,
}

impl LoginPage {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the auth context or API.
    pub fn new(scope: &Scope, location: &LocationState) -> Result<Self, MissingProvider> {
        Ok(Self {
            auth: use_auth(scope)?,
            api: use_api(scope)?,
            cell: ViewCell::new(LoginState { flash: location.message.clone(), ..LoginState::default() }),
            return_to: location.from.clone(),
        })
    }

    #[must_use]
    pub fn state(&self) -> LoginState {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    /// Sign in and start the session. On success returns where to go next:
    /// the page that redirected here, else home. Ignored while a previous
    /// submit is in flight.
    pub async fn submit(&self, email: &str, password: &str) -> Option<Goto> {
        let mut started = false;
        self.cell.update(|s| {
            if !s.loading {
                s.loading = true;
                s.error = None;
                started = true;
            }
        });
        if !started {
            return None;
        }

        let outcome = match self.api.sign_in(email.trim(), password).await {
            Ok(data) => self.auth.login(data.token, data.user).map_err(|e| {
                tracing::warn!(error = %e, "failed to persist session");
                SESSION_NOT_SAVED.to_owned()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "sign in rejected");
                Err(e.user_message(LOGIN_FAILED))
            }
        };

        let applied = self.cell.update(|s| {
            s.loading = false;
            if let Err(message) = &outcome {
                s.error = Some(message.clone());
            }
        });
        match outcome {
            Ok(()) if applied => {
                let path = self.return_to.clone().unwrap_or_else(|| Route::Home.path());
                Some(Goto::new(path, LocationState::default()))
            }
            _ => None,
        }
    }
}
