//! View state shared between a view-model and the requests it starts.
//!
//! A [`ViewCell`] pairs the view's state with a mount flag. Requests started
//! by a view write back through [`ViewCell::update`], which drops the write
//! once the view has been unmounted. Requests are never cancelled; their
//! late answers are just ignored.

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
pub struct ViewCell<S> {
    state: Arc<Mutex<S>>,
    mounted: Arc<AtomicBool>,
}

impl<S> Clone for ViewCell<S> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state), mounted: Arc::clone(&self.mounted) }
    }
}

impl<S: Clone> ViewCell<S> {
    /// A mounted cell holding `initial`.
    pub fn new(initial: S) -> Self {
        Self { state: Arc::new(Mutex::new(initial)), mounted: Arc::new(AtomicBool::new(true)) }
    }

    #[must_use]
    pub fn snapshot(&self) -> S {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Apply `f` if the view is still mounted. Returns whether it ran.
    pub fn update(&self, f: impl FnOnce(&mut S)) -> bool {
        if !self.is_mounted() {
            tracing::debug!("dropping state update for unmounted view");
            return false;
        }
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner));
        true
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Stop accepting updates. In-flight requests keep running.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}
