//! Fleet management table with create/edit form and delete.

#[cfg(test)]
#[path = "vehicles_test.rs"]
mod tests;

use std::sync::Arc;

use super::TableState;
use crate::net::RentalApi;
use crate::net::types::{Vehicle, VehicleForm};
use crate::pages::lifecycle::ViewCell;
use crate::state::{MissingProvider, Scope, use_api};
use crate::util::matches_any;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this vehicle?";

/// Vehicle id awaiting deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteVehicle(pub String);

/// Open create/edit form. `editing` is `None` when creating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleEditor {
    pub editing: Option<String>,
    pub form: VehicleForm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleAdminState {
    pub table: TableState<Vehicle, DeleteVehicle>,
    pub editor: Option<VehicleEditor>,
    pub saving: bool,
}

impl VehicleAdminState {
    /// Rows whose name or registration contains the search term.
    #[must_use]
    pub fn visible(&self) -> Vec<&Vehicle> {
        self.table
            .rows
            .iter()
            .filter(|v| matches_any(&self.table.search, [Some(v.vehicle_name.as_str()), Some(v.registration_number.as_str())]))
            .collect()
    }
}

pub struct ManageVehicles {
    api: Arc<dyn RentalApi>,
    cell: ViewCell<VehicleAdminState>,
}

impl ManageVehicles {
    /// # Errors
    ///
    /// Returns [`MissingProvider`] if `scope` lacks the API.
    pub fn new(scope: &Scope) -> Result<Self, MissingProvider> {
        Ok(Self { api: use_api(scope)?, cell: ViewCell::new(VehicleAdminState::default()) })
    }

    #[must_use]
    pub fn state(&self) -> VehicleAdminState {
        self.cell.snapshot()
    }

    pub fn unmount(&self) {
        self.cell.unmount();
    }

    pub async fn load(&self) {
        self.cell.update(|s| s.table.begin_load());
        let result = self.api.list_vehicles().await;
        self.cell.update(|s| {
            s.table.loading = false;
            match result {
                Ok(rows) => s.table.rows = rows,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to fetch vehicles");
                    s.table.error = Some(e.user_message("Could not load vehicles."));
                }
            }
        });
    }

    pub fn set_search(&self, term: &str) {
        self.cell.update(|s| s.table.search = term.to_owned());
    }

    /// Open a blank form (type `car`, status `available`).
    pub fn open_create(&self) {
        self.cell.update(|s| s.editor = Some(VehicleEditor::default()));
    }

    /// Open the form prefilled from row `id`. Returns false if no such row.
    pub fn open_edit(&self, id: &str) -> bool {
        let mut found = false;
        self.cell.update(|s| {
            if let Some(vehicle) = s.table.rows.iter().find(|v| v.id == id) {
                s.editor = Some(VehicleEditor { editing: Some(id.to_owned()), form: VehicleForm::from(vehicle) });
                found = true;
            }
        });
        found
    }

    pub fn edit(&self, f: impl FnOnce(&mut VehicleForm)) {
        self.cell.update(|s| {
            if let Some(editor) = s.editor.as_mut() {
                f(&mut editor.form);
            }
        });
    }

    pub fn close_editor(&self) {
        self.cell.update(|s| s.editor = None);
    }

    /// Create or update from the open form, then refetch. The form stays
    /// open with an inline error when validation or the request fails.
    pub async fn save(&self) -> bool {
        let Some(editor) = self.state().editor else {
            return false;
        };
        if let Some(problem) = editor.form.validate() {
            self.cell.update(|s| s.table.error = Some(problem.to_owned()));
            return false;
        }

        self.cell.update(|s| {
            s.saving = true;
            s.table.error = None;
        });
        let result = match &editor.editing {
            Some(id) => self.api.update_vehicle(id, &editor.form).await,
            None => self.api.create_vehicle(&editor.form).await,
        };
        self.cell.update(|s| {
            s.saving = false;
            match &result {
                Ok(()) => s.editor = None,
                Err(e) => s.table.error = Some(e.user_message("Could not save the vehicle.")),
            }
        });

        match result {
            Ok(()) => {
                tracing::info!(editing = ?editor.editing, "vehicle saved");
                self.load().await;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save vehicle");
                false
            }
        }
    }

    pub fn request_delete(&self, id: &str) {
        self.cell.update(|s| s.table.confirm.request(DeleteVehicle(id.to_owned())));
    }

    pub fn cancel(&self) {
        self.cell.update(|s| s.table.confirm.cancel());
    }

    /// Run the pending delete, then refetch.
    pub async fn confirm(&self) -> bool {
        let mut pending = None;
        self.cell.update(|s| pending = s.table.confirm.confirm());
        let Some(DeleteVehicle(id)) = pending else {
            return false;
        };

        match self.api.delete_vehicle(&id).await {
            Ok(()) => {
                tracing::info!(%id, "vehicle deleted");
                self.load().await;
                true
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "failed to delete vehicle");
                self.cell.update(|s| s.table.error = Some(e.user_message("Could not delete the vehicle.")));
                false
            }
        }
    }
}
