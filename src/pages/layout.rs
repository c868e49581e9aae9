//! Site navigation shared by every page.

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;

use crate::net::types::Role;
use crate::routing::Route;
use crate::state::auth::AuthState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// Main navigation for the current visitor. Account-dependent links appear
/// only once hydration has settled on a signed-in user.
#[must_use]
pub fn nav_links(auth: &AuthState) -> Vec<NavLink> {
    let mut links = vec![
        NavLink { label: "Home", route: Route::Home },
        NavLink { label: "Fleet", route: Route::Vehicles },
    ];
    if auth.is_loading {
        return links;
    }
    if let Some(user) = &auth.user {
        links.push(NavLink { label: "Dashboard", route: Route::Profile });
        if user.role == Role::Admin {
            links.push(NavLink { label: "Admin", route: Route::Admin });
        }
    }
    links
}

/// Sign-in and sign-up entries, shown to anonymous visitors only.
#[must_use]
pub fn account_links(auth: &AuthState) -> Vec<NavLink> {
    if auth.is_loading || auth.is_authenticated() {
        return Vec::new();
    }
    vec![
        NavLink { label: "Login", route: Route::Login },
        NavLink { label: "Sign Up", route: Route::Register },
    ]
}
