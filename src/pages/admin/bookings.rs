//! Booking management table: mark active bookings returned or cancelled.

#[cfg(test)]
#[path = "bookings_test.rs"]
mod tests;

use std::sync::Arc;

use super::TableState;
use crate::net::RentalApi;
use crate::net::types::{Booking, BookingStatus};
use crate::pages::lifecycle::ViewCell;
use crate::state::{MissingProvider, Scope, use_api};
use crate::util::matches_any;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusChangeError {
    #[error("booking not found")]
    UnknownBooking,
    #[error("only active bookings can change status")]
    NotActive,
    #[error("bookings can only be marked returned or cancelled")]
    InvalidTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatus {
    pub id: String,
    pub status: BookingStatus,
}

impl SetStatus {
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Update booking status to {}?", self.status)
    }
}

pub type BookingTable = TableState<Booking, SetStatus>;

/// Rows whose customer or vehicle name contains the search term. Rows
/// missing both only show for a blank search.
#[must_use]
pub fn visible(state: &BookingTable) -> Vec<&Booking> {
    state
        .rows
        .iter()
        .filter(|b| {
            matches_any(
                &state.search,
                [b.customer.as_ref().map(|c| c.name.as_str()), b.vehicle.as_ref().map(|v| v.vehicle_name.as_str())],
            )
        })
        .collect()
}

pub struct ManageBookings {
    api: Arc<dyn RentalApi>,
    cell: ViewCell<BookingTable>,
}

impl ManageBookings {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, cell: ViewCell::new(BookingTable::default()) })
    }

    #[must_use]
    pub fn state(&self) -> BookingTable {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    pub async fn load(&self) {
        self.cell.update(BookingTable::begin_load);
        let result = self.api.list_bookings().await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(rows) => s.rows = rows,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch bookings");
                    s.error = Some(e.user_message("Could not load bookings."));
                }
            }
        });
    }

    pub fn set_search(&self, term: &str) {
        self.cell.update(|s| s.search = term.to_owned());
    }

    /// Ask to move active booking `id` to `status`.
    ///
    /// # Errors
    ///
    /// Rejects unknown rows, bookings that are no longer active, and targets
    /// other than `returned`/`cancelled`.
    pub fn request_status(&self, id: &str, status: BookingStatus) -> Result<(), StatusChangeError> {
        if !matches!(status, BookingStatus::Returned | BookingStatus::Cancelled) {
            return Err(StatusChangeError::InvalidTarget);
        }
        let mut outcome = Err(StatusChangeError::UnknownBooking);
        self.cell.update(|s| {
            outcome = match s.rows.iter().find(|b| b.id == id) {
                None => Err(StatusChangeError::UnknownBooking),
                Some(b) if b.status != BookingStatus::Active => Err(StatusChangeError::NotActive),
                Some(_) => {
                    s.confirm.request(SetStatus { id: id.to_owned(), status });
                    Ok(())
                }
            };
        });
        outcome
    }

    pub fn cancel(&self) {
        self.cell.update(|s| s.confirm.cancel());
    }

    /// Run the pending status change, then refetch.
    pub async fn confirm(&self) -> bool {
        let mut pending = None;
        self.cell.update(|s| pending = s.confirm.confirm());
        let Some(SetStatus { id, status }) = pending else {
            return false;
        };

        match self.api.update_booking_status(&id, status).await {
            Ok(()) => {
                tracing::info!(%id, %status, "booking status updated");
                self.load().await;
                true
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to update booking");
                self.cell.update(|s| s.error = Some(e.user_message("Could not update the booking.")));
                false
            }
        }
    }
}
