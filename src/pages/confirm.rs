//! Two-step contract for destructive actions: request, then confirm or
//! cancel.

#[cfg(test)]
#[path = "confirm_test.rs"]
mod tests;

/// Holds at most one action awaiting confirmation. A new request replaces
/// the pending one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmGate<A> {
    pending: Option<A>,
}

impl<A> Default for ConfirmGate<A> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<A> ConfirmGate<A> {
    pub fn request(&mut self, action: A) {
        self.pending = Some(action);
    }

    #[must_use]
    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    /// Take the pending action for execution.
    pub fn confirm(&mut self) -> Option<A> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
