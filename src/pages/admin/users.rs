//! Account management table: role toggle and delete.

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

use std::sync::Arc;

use super::TableState;
use crate::net::RentalApi;
use crate::net::types::{ManagedUser, Role};
use crate::pages::lifecycle::ViewCell;
use crate::state::{MissingProvider, Scope, use_api};
use crate::util::matches_any;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SetRole { id: String, name: String, role: Role },
    Delete { id: String },
}

impl UserAction {
    /// Question put to the admin before the action runs.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            Self::SetRole { name, role, .. } => format!("Change {name}'s role to {role}?"),
            Self::Delete { .. } => "Permanently delete this user? This action cannot be undone.".to_owned(),
        }
    }
}

pub type UserTable = TableState<ManagedUser, UserAction>;

/// Rows whose name or email contains the search term.
#[must_use]
pub fn visible(state: &UserTable) -> Vec<&ManagedUser> {
    state.rows.iter().filter(|u| matches_any(&state.search, [Some(u.name.as_str()), Some(u.email.as_str())])).collect()
}

pub struct ManageUsers {
    api: Arc<dyn RentalApi>,
    cell: ViewCell<UserTable>,
}

impl ManageUsers {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, cell: ViewCell::new(UserTable::default()) })
    }

    #[must_use]
    pub fn state(&self) -> UserTable {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    pub async fn load(&self) {
        self.cell.update(UserTable::begin_load);
        let result = self.api.list_users().await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(rows) => s.rows = rows,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch users");
                    s.error = Some(e.user_message("Could not load users."));
                }
            }
        });
    }

    pub fn set_search(&self, term: &str) {
        self.cell.update(|s| s.search = term.to_owned());
    }

    /// Ask to flip row `id` between admin and customer. Returns false if no
    /// such row.
    pub fn request_role_toggle(&self, id: &str) -> bool {
        let mut found = false;
        self.cell.update(|s| {
            let Some(user) = s.rows.iter().find(|u| u.id == id) else {
                return;
            };
            let action = UserAction::SetRole { id: user.id.clone(), name: user.name.clone(), role: user.role.toggled() };
            s.confirm.request(action);
            found = true;
        });
        found
    }

    pub fn request_delete(&self, id: &str) {
        self.cell.update(|s| s.confirm.request(UserAction::Delete { id: id.to_owned() }));
    }

    pub fn cancel(&self) {
        self.cell.update(|s| s.confirm.cancel());
    }

    /// Run the pending action, then refetch.
    pub async fn confirm(&self) -> bool {
        let mut pending = None;
        self.cell.update(|s| pending = s.confirm.confirm());
        let Some(action) = pending else {
            return false;
        };

        let result = match &action {
            UserAction::SetRole { id, role, .. } => self.api.update_user_role(id, *role).await,
            UserAction::Delete { id } => self.api.delete_user(id).await,
        };
        match result {
            Ok(()) => {
                tracing::info!(?action, "user updated");
                self.load().await;
                true
            }
            Err(e) => {
                tracing::warn!(?action, error = %e, "user action failed");
                self.cell.update(|s| s.error = Some(e.user_message("Could not update the user.")));
                false
            }
        }
    }
}
