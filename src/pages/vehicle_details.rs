//! Single vehicle view.

#[cfg(test)]
#[path = "vehicle_details_test.rs"]
mod tests;

use std::sync::Arc;

use super::lifecycle::ViewCell;
use crate::net::RentalApi;
use crate::net::types::Vehicle;
use crate::routing::{Goto, LocationState, Route};
use crate::state::{MissingProvider, Scope, use_api};

pub const NOT_FOUND: &str = "Vehicle not found";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleDetailsState {
    pub vehicle: Option<Vehicle>,
    pub loading: bool,
    pub error: Option<String>,
}

impl VehicleDetailsState {
    /// Renting is offered only for an available vehicle.
    #[must_use]
    pub fn can_book(&self) -> bool {
        self.vehicle.as_ref().is_some_and(Vehicle::is_available)
    }
}

pub struct VehicleDetailsPage {
    api: Arc<dyn RentalApi>,
    id: String,
    cell: ViewCell<VehicleDetailsState>,
}

impl VehicleDetailsPage {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope, id: &str) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, id: id.to_owned(), cell: ViewCell::new(VehicleDetailsState::default()) })
    }

    #[must_use]
    pub fn state(&self) -> VehicleDetailsState {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    pub async fn load(&self) {
        self.cell.update(|s| {
            s.loading = true;
            s.error = None;
        });
        let result = self.api.get_vehicle(&self.id).await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(vehicle) => s.vehicle = Some(vehicle),
                Err(e) => {
                    tracing::warn!(id = %self.id, error = %e, "failed to fetch vehicle");
                    s.vehicle = None;
                    s.error = Some(NOT_FOUND.to_owned());
                }
            }
        });
    }

    /// The booking form for this vehicle, if it can be booked.
    #[must_use]
    pub fn book(&self) -> Option<Goto> {
        let state = self.state();
        let vehicle = state.vehicle.as_ref().filter(|v| v.is_available())?;
        Some(Goto::new(Route::Book(vehicle.id.clone()).path(), LocationState::default()))
    }

    #[must_use]
    pub fn back(&self) -> Goto {
        Goto::new(Route::Vehicles.path(), LocationState::default())
    }
}
