//! Fleet listing with client-side search and type filter.

#[cfg(test)]
#[path = "vehicles_test.rs"]
mod tests;

use std::sync::Arc;

use super::lifecycle::ViewCell;
use crate::net::RentalApi;
use crate::net::types::Vehicle;
use crate::state::{MissingProvider, Scope, use_api};
use crate::util::contains_ci;

/// Type filter value that matches every vehicle.
pub const ALL_TYPES: &str = "all";
const LOAD_FAILED: &str = "Could not load vehicles.";

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleListState {
    pub vehicles: Vec<Vehicle>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub kind: String,
}

impl Default for VehicleListState {
    fn default() -> Self {
        Self { vehicles: Vec::new(), loading: false, error: None, search: String::new(), kind: ALL_TYPES.to_owned() }
    }
}

impl VehicleListState {
    /// Distinct non-empty vehicle types, in the order first seen.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for vehicle in &self.vehicles {
            if !vehicle.kind.is_empty() && !types.contains(&vehicle.kind) {
                types.push(vehicle.kind.clone());
            }
        }
        types
    }

    /// Vehicles whose name contains the search term and whose type matches
    /// the selected one.
    #[must_use]
    pub fn visible(&self) -> Vec<&Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| contains_ci(&v.vehicle_name, &self.search))
            .filter(|v| self.kind == ALL_TYPES || v.kind == self.kind)
            .collect()
    }
}

pub struct VehicleListPage {
    api: Arc<dyn RentalApi>,
    cell: ViewCell<VehicleListState>,
}

impl VehicleListPage {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, cell: ViewCell::new(VehicleListState::default()) })
    }

    #[must_use]
    pub fn state(&self) -> VehicleListState {
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
        let result = self.api.list_vehicles().await;
        self.cell.update(|s| {
            s.loading = false;
            match result {
                Ok(vehicles) => s.vehicles = vehicles,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch vehicles");
                    s.error = Some(e.user_message(LOAD_FAILED));
                }
            }
        });
    }

    pub fn set_search(&self, term: &str) {
        self.cell.update(|s| s.search = term.to_owned());
    }

    /// Select a vehicle type; [`ALL_TYPES`] clears the type filter.
    pub fn set_kind(&self, kind: &str) {
        self.cell.update(|s| s.kind = kind.to_owned());
    }

    pub fn clear_filters(&self) {
        self.cell.update(|s| {
            s.search.clear();
            ALL_TYPES.clone_into(&mut s.kind);
        });
    }
}
