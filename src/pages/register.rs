//! Account creation form.

#[cfg(test)]
#[path = "register_test.rs"]
mod tests;

use std::sync::Arc;

use super::lifecycle::ViewCell;
use crate::net::RentalApi;
use crate::net::types::{Role, SignUpRequest};
use crate::routing::{Goto, LocationState, Route};
use crate::state::{MissingProvider, Scope, use_api};

pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const REGISTERED: &str = "Account created successfully! Please log in.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterState {
    pub loading: bool,
    pub error: Option<String>,
}

pub struct RegisterPage {
    api: Arc<dyn RentalApi>,
    cell: ViewCell<RegisterState>,
}

impl RegisterPage {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, cell: ViewCell::new(RegisterState::default()) })
    }

    #[must_use]
    pub fn state(&self) -> RegisterState {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    /// Create a customer account. Sign-up issues no token, so success sends
    /// the visitor to sign in with a confirmation message.
    pub async fn submit(&self, form: &RegisterForm) -> Option<Goto> {
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

        let request = SignUpRequest {
            name: form.name.trim().to_owned(),
            email: form.email.trim().to_owned(),
            password: form.password.clone(),
            phone: form.phone.trim().to_owned(),
            address: form.address.trim().to_owned(),
            role: Role::Customer,
        };
        let result = self.api.sign_up(&request).await;
        if let Err(e) = &result {
            tracing::debug!(error = %e, "sign up rejected");
        }

        let applied = self.cell.update(|s| {
            s.loading = false;
            if let Err(e) = &result {
                s.error = Some(e.user_message(REGISTER_FAILED));
            }
        });
        (result.is_ok() && applied).then(|| Goto::new(Route::Login.path(), LocationState::with_message(REGISTERED)))
    }
}
