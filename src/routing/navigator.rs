//! Path → route → guard → outcome.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod tests;

use super::guard::{GuardOutcome, guard};
use super::{Access, Route};
use crate::state::auth::AuthState;

/// State carried along with a navigation: the path a redirect interrupted
/// and a one-shot flash message for the destination view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationState {
    pub from: Option<String>,
    pub message: Option<String>,
}

impl LocationState {
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self { from: None, message: Some(message.into()) }
    }

    #[must_use]
    pub fn from_path(path: impl Into<String>) -> Self {
        Self { from: Some(path.into()), message: None }
    }
}

/// Where a view asks to go after an action succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goto {
    pub path: String,
    pub state: LocationState,
}

impl Goto {
    #[must_use]
    pub fn new(path: impl Into<String>, state: LocationState) -> Self {
        Self { path: path.into(), state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Auth is still hydrating; show a placeholder for `route`.
    Pending(Route),
    Render { route: Route, state: LocationState },
    Redirect { to: Route, state: LocationState },
}

impl Navigation {
    /// The route whose view is on screen once this navigation settles.
    #[must_use]
    pub fn route(&self) -> &Route {
        match self {
            Self::Pending(route) | Self::Render { route, .. } | Self::Redirect { to: route, .. } => route,
        }
    }

    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }
}

/// Resolve a requested path against the current auth state.
///
/// Public routes render unconditionally. Protected routes go through
/// [`guard`]; a redirect to sign-in carries the requested path, query and
/// fragment included, as `from`.
#[must_use]
pub fn resolve(auth: &AuthState, path: &str, state: LocationState) -> Navigation {
    settle(auth, Route::parse(path), path, state)
}

/// Resolve a route the caller already knows, guarding it by its own access
/// rule. A parameter that would not survive a round trip through its path
/// (an id containing `/`) still gets the protected route's guard instead of
/// falling through to the public not-found view.
#[must_use]
pub fn resolve_route(auth: &AuthState, route: Route, state: LocationState) -> Navigation {
    let path = route.path();
    settle(auth, route, &path, state)
}

fn settle(auth: &AuthState, route: Route, requested_path: &str, state: LocationState) -> Navigation {
    let required_role = match route.access() {
        Access::Public => return Navigation::Render { route, state },
        Access::Authenticated => None,
        Access::Role(role) => Some(role),
    };

    let outcome = guard(auth, required_role, requested_path);
    tracing::debug!(path = requested_path, ?outcome, "route guard");
    match outcome {
        GuardOutcome::Pending => Navigation::Pending(route),
        GuardOutcome::Render => Navigation::Render { route, state },
        GuardOutcome::RedirectToLogin { return_to } => {
            Navigation::Redirect { to: Route::Login, state: LocationState::from_path(return_to) }
        }
        GuardOutcome::RedirectToHome => Navigation::Redirect { to: Route::Home, state: LocationState::default() },
    }
}
