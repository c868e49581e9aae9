//! Signed-in user's card and booking history.

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;

use std::sync::Arc;

use super::lifecycle::ViewCell;
use crate::net::RentalApi;
use crate::net::types::{Booking, User};
use crate::routing::LocationState;
use crate::state::{AuthContext, MissingProvider, Scope, use_api, use_auth};

const LOAD_FAILED: &str = "Could not load your bookings.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub user: Option<User>,
    pub bookings: Vec<Booking>,
    pub loading: bool,
    pub error: Option<String>,
    /// Confirmation handed over by the booking form.
    pub flash: Option<String>,
}

pub struct ProfilePage {
    auth: AuthContext,
    api: Arc<dyn RentalApi>,
    cell: ViewCell<ProfileState>,
}

impl ProfilePage {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the auth context or API.
    pub fn new(scope: &Scope, location: &LocationState) -> Result<Self, MissingProvider> {
        let auth = use_auth(scope)?;
        let initial = ProfileState { user: auth.user(), flash: location.message.clone(), ..ProfileState::default() };
        Ok(Self { auth, api: use_api(scope)?, cell: ViewCell::new(initial) })
    }

    #[must_use]
    pub fn state(&self) -> ProfileState {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    /// Fetch the booking history. The server scopes `/bookings` to the
    /// caller's token.
    pub async fn load(&self) {
        let user = self.auth.user();
        self.cell.update(|s| {
            s.user = user;
            s.loading = true;
            s.error = None;
        });
        let result = self.api.list_bookings().await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(bookings) => s.bookings = bookings,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch bookings");
                    s.error = Some(e.user_message(LOAD_FAILED));
                }
            }
        });
    }
}
