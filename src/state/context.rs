//! Context scopes for passing shared handles to views.
//!
//! A [`Scope`] is a type-keyed map with an optional parent, so a child scope
//! sees everything its ancestors provide and can shadow it. Views pull the
//! [`AuthContext`] and the API handle from here instead of from globals.

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::auth::AuthContext;
use crate::net::RentalApi;

/// A context was read outside the scope that provides it. This is a wiring
/// bug in the front end, not something a user can recover from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{context} read outside of a scope that provides it")]
pub struct MissingProvider {
    pub context: &'static str,
}

type Entries = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

#[derive(Clone, Default)]
pub struct Scope {
    entries: Arc<RwLock<Entries>>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// New empty scope that falls back to `self` for lookups.
    #[must_use]
    pub fn child(&self) -> Self {
        Self { entries: Arc::default(), parent: Some(Box::new(self.clone())) }
    }

    pub fn provide<T: Clone + Send + Sync + 'static>(&self, value: T) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), Arc::new(value));
    }

    #[must_use]
    pub fn use_context<T: Clone + Send + Sync + 'static>(&self) -> Option<T> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned();
        found.or_else(|| self.parent.as_ref().and_then(|parent| parent.use_context::<T>()))
    }

    /// # Errors
    ///
    /// Returns [`MissingProvider`] naming `T` if no enclosing scope provides it.
    pub fn try_context<T: Clone + Send + Sync + 'static>(&self) -> Result<T, MissingProvider> {
        self.use_context::<T>().ok_or(MissingProvider { context: type_name::<T>() })
    }

    /// # Panics
    ///
    /// Panics if no enclosing scope provides `T`.
    #[must_use]
    pub fn expect_context<T: Clone + Send + Sync + 'static>(&self) -> T {
        match self.try_context::<T>() {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

/// The auth context of the enclosing scope.
///
/// # Errors
///
/// Returns [`MissingProvider`] when called outside an auth provider.
pub fn use_auth(scope: &Scope) -> Result<AuthContext, MissingProvider> {
    scope
        .use_context::<AuthContext>()
        .ok_or(MissingProvider { context: "auth context" })
}

/// The API handle of the enclosing scope.
///
/// # Errors
///
/// Returns [`MissingProvider`] when no API client was provided.
pub fn use_api(scope: &Scope) -> Result<Arc<dyn RentalApi>, MissingProvider> {
    scope
        .use_context::<Arc<dyn RentalApi>>()
        .ok_or(MissingProvider { context: "api client" })
}
