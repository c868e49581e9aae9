//! Route table, per-navigation guard, and navigation resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! Front ends hand a requested path to [`navigator::resolve`]; it maps the
//! path to a [`Route`], consults the guard for protected routes, and returns
//! either the view to render or where to go instead.

pub mod guard;
pub mod navigator;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use crate::net::types::Role;

pub use guard::{GuardOutcome, guard};
pub use navigator::{Goto, LocationState, Navigation, resolve, resolve_route};

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Vehicles,
    VehicleDetails(String),
    Book(String),
    Profile,
    Admin,
    NotFound,
}

impl Route {
    /// Map a location path (query string and trailing slash ignored) to a
    /// route. Unknown paths map to [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["vehicles"] => Self::Vehicles,
            ["vehicles", id] => Self::VehicleDetails((*id).to_owned()),
            ["book", id] => Self::Book((*id).to_owned()),
            ["profile"] => Self::Profile,
            ["admin"] => Self::Admin,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Vehicles => "/vehicles".to_owned(),
            Self::VehicleDetails(id) => format!("/vehicles/{id}"),
            Self::Book(id) => format!("/book/{id}"),
            Self::Profile => "/profile".to_owned(),
            Self::Admin => "/admin".to_owned(),
            Self::NotFound => "/404".to_owned(),
        }
    }

    #[must_use]
    pub fn access(&self) -> Access {
        match self {
            Self::Book(_) | Self::Profile => Access::Authenticated,
            Self::Admin => Access::Role(Role::Admin),
            Self::Home | Self::Login | Self::Register | Self::Vehicles | Self::VehicleDetails(_) | Self::NotFound => {
                Access::Public
            }
        }
    }
}
