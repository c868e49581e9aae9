//! Booking form: vehicle summary, rental window, live estimate, submit.
//!
//! DESIGN
//! ======
//! The form keeps the raw input text and re-derives the draft and estimate
//! on every edit, so the figure on screen always matches the inputs. The
//! estimate only gates the submit button; the server prices the booking and
//! its rejection message is shown as sent.

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;

use std::sync::Arc;

use time::PrimitiveDateTime;

use super::lifecycle::ViewCell;
use crate::estimate::{Estimate, estimate, parse_local, to_rfc3339};
use crate::net::RentalApi;
use crate::net::types::{NewBooking, Vehicle};
use crate::routing::{Goto, LocationState, Route};
use crate::state::{AuthContext, MissingProvider, Scope, use_api, use_auth};

pub const BOOKING_FAILED: &str = "Booking failed. Please try again.";
pub const BOOKED: &str = "Booking confirmed successfully!";

/// The part of a vehicle the booking form shows and prices with.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSummary {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub daily_rate: f64,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            name: vehicle.vehicle_name.clone(),
            kind: vehicle.kind.clone(),
            daily_rate: vehicle.daily_rent_price,
        }
    }
}

/// A booking being put together. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub vehicle: VehicleSummary,
    pub start_time: Option<PrimitiveDateTime>,
    pub end_time: Option<PrimitiveDateTime>,
}

impl BookingDraft {
    #[must_use]
    pub fn estimate(&self) -> Estimate {
        estimate(self.start_time, self.end_time, self.vehicle.daily_rate)
    }

    /// Request body for `customer_id`, or `None` while the window is not
    /// bookable.
    #[must_use]
    pub fn to_request(&self, customer_id: &str) -> Option<NewBooking> {
        if !self.estimate().can_submit() {
            return None;
        }
        let start = to_rfc3339(self.start_time?).ok()?;
        let end = to_rfc3339(self.end_time?).ok()?;
        Some(NewBooking {
            customer_id: customer_id.to_owned(),
            vehicle_id: self.vehicle.id.clone(),
            rent_start_date: start,
            rent_end_date: end,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingState {
    pub vehicle: Option<VehicleSummary>,
    /// Raw `YYYY-MM-DDTHH:MM` input values.
    pub start_input: String,
    pub end_input: String,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl BookingState {
    #[must_use]
    pub fn draft(&self) -> Option<BookingDraft> {
        Some(BookingDraft {
            vehicle: self.vehicle.clone()?,
            start_time: parse_local(&self.start_input),
            end_time: parse_local(&self.end_input),
        })
    }

    #[must_use]
    pub fn estimate(&self) -> Estimate {
        self.draft().map_or(Estimate::ZERO, |d| d.estimate())
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.estimate().can_submit()
    }
}

pub struct BookingPage {
    auth: AuthContext,
    api: Arc<dyn RentalApi>,
    vehicle_id: String,
    cell: ViewCell<BookingState>,
}

impl BookingPage {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the auth context or API.
    pub fn new(scope: &Scope, vehicle_id: &str) -> Result<Self, MissingProvider> {
        Ok(Self {
            auth: use_auth(scope)?,
            api: use_api(scope)?,
            vehicle_id: vehicle_id.to_owned(),
            cell: ViewCell::new(BookingState::default()),
        })
    }

    #[must_use]
    pub fn state(&self) -> BookingState {
        self.cell.snapshot()
    }

    /// Leaving the page discards the draft.
    pub fn unmount(&self) {
        self.cell.unmount();
    }

    pub async fn load(&self) {
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.api.get_vehicle(&self.vehicle_id).await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(vehicle) => s.vehicle = Some(VehicleSummary::from(&vehicle)),
                Err(e) => {
                    tracing::warn!(id = %self.vehicle_id, error = %e, "failed to load vehicle for booking");
                    s.vehicle = None;
                }
            }
        });
    }

    pub fn set_start(&self, input: &str) {
        self.cell.update(|s| s.start_input = input.to_owned());
    }

    pub fn set_end(&self, input: &str) {
        self.cell.update(|s| s.end_input = input.to_owned());
    }

    /// Place the booking for the signed-in user. On success the draft is
    /// dropped and the caller is sent to the profile with a confirmation.
    /// Does nothing while submission is disabled.
    pub async fn submit(&self) -> Option<Goto> {
        let user = self.auth.user()?;
        let mut request = None;
        self.cell.update(|s| {
            if !s.can_submit() {
                return;
            }
            request = s.draft().and_then(|d| d.to_request(&user.id));
            if request.is_some() {
                s.submitting = true;
                s.error = None;
            }
        });
        let request = request?;

        let result = self.api.create_booking(&request).await;
        let applied = self.cell.update(|s| {
            s.submitting = false;
            match &result {
                Ok(()) => {
                    s.start_input.clear();
                    s.end_input.clear();
                }
                Err(e) => s.error = Some(e.user_message(BOOKING_FAILED)),
            }
        });
        match result {
            Ok(()) => {
                tracing::info!(vehicle_id = %request.vehicle_id, "booking placed");
                applied.then(|| Goto::new(Route::Profile.path(), LocationState::with_message(BOOKED)))
            }
            Err(e) => {
                tracing::debug!(error = %e, "booking rejected");
                None
            }
        }
    }
}
