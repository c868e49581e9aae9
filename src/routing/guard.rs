//! Per-navigation access check for protected routes.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use crate::net::types::Role;
use crate::state::auth::AuthState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Auth state is not known yet; show a loading placeholder, decide later.
    Pending,
    Render,
    /// Send the visitor to sign in, then back to `return_to`.
    RedirectToLogin { return_to: String },
    /// Signed in but without the required role.
    RedirectToHome,
}

/// Decide what a protected route shows. Pure; holds no state.
#[must_use]
pub fn guard(state: &AuthState, required_role: Option<Role>, requested_path: &str) -> GuardOutcome {
    if state.is_loading {
        return GuardOutcome::Pending;
    }
    let Some(user) = &state.user else {
        return GuardOutcome::RedirectToLogin { return_to: requested_path.to_owned() };
    };
    match required_role {
        Some(role) if user.role != role => GuardOutcome::RedirectToHome,
        _ => GuardOutcome::Render,
    }
}
