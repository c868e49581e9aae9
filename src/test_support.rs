//! Shared fixtures for unit tests: an in-memory [`MockApi`] and builders for
//! wire records.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::net::types::{
    Booking, BookingCustomer, BookingStatus, BookingVehicle, DashboardStats, ManagedUser, NewBooking, Role,
    SignInData, SignUpRequest, User, Vehicle, VehicleForm,
};
use crate::net::{ApiError, RentalApi};
use crate::state::{AuthContext, Scope, SessionStore};
use crate::storage::MemoryStorage;

// =============================================================================
// MockApi
// =============================================================================

#[derive(Default)]
pub(crate) struct MockApi {
    pub vehicles: Mutex<Vec<Vehicle>>,
    pub bookings: Mutex<Vec<Booking>>,
    pub users: Mutex<Vec<ManagedUser>>,
    pub stats: Mutex<DashboardStats>,
    pub accounts: Mutex<Vec<(String, String, SignInData)>>,
    pub created_bookings: Mutex<Vec<NewBooking>>,
    pub signups: Mutex<Vec<SignUpRequest>>,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
}

impl MockApi {
    /// Make every later call to `op` fail with the given status and message.
    pub fn fail(&self, op: &'static str, status: u16, message: Option<&str>) {
        self.failures.lock().unwrap().insert(op, (status, message.map(ToOwned::to_owned)));
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn add_account(&self, email: &str, password: &str, token: &str, user: User) {
        self.accounts.lock().unwrap().push((
            email.to_owned(),
            password.to_owned(),
            SignInData { token: token.to_owned(), user },
        ));
    }

    fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().get(op) {
            Some((status, message)) => Err(ApiError::Status { status: *status, message: message.clone() }),
            None => Ok(()),
        }
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status { status: 404, message: Some(format!("{what} not found")) }
    }
}

#[async_trait]
impl RentalApi for MockApi {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInData, ApiError> {
        self.enter("sign_in")?;
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, data)| data.clone())
            .ok_or(ApiError::Status { status: 401, message: Some("Invalid email or password".into()) })
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError> {
        self.enter("sign_up")?;
        self.signups.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.enter("list_vehicles")?;
        Ok(self.vehicles.lock().unwrap().clone())
    }

    async fn get_vehicle(&self, id: &str) -> Result<Vehicle, ApiError> {
        self.enter("get_vehicle")?;
        self.vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Vehicle"))
    }

    async fn create_vehicle(&self, form: &VehicleForm) -> Result<(), ApiError> {
        self.enter("create_vehicle")?;
        let mut vehicles = self.vehicles.lock().unwrap();
        let id = format!("v-{}", vehicles.len() + 1);
        vehicles.push(vehicle_from_form(id, form));
        Ok(())
    }

    async fn update_vehicle(&self, id: &str, form: &VehicleForm) -> Result<(), ApiError> {
        self.enter("update_vehicle")?;
        let mut vehicles = self.vehicles.lock().unwrap();
        let slot = vehicles.iter_mut().find(|v| v.id == id).ok_or_else(|| Self::not_found("Vehicle"))?;
        *slot = vehicle_from_form(id.to_owned(), form);
        Ok(())
    }

    async fn delete_vehicle(&self, id: &str) -> Result<(), ApiError> {
        self.enter("delete_vehicle")?;
        self.vehicles.lock().unwrap().retain(|v| v.id != id);
        Ok(())
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<(), ApiError> {
        self.enter("create_booking")?;
        self.created_bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.enter("list_bookings")?;
        Ok(self.bookings.lock().unwrap().clone())
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<(), ApiError> {
        self.enter("update_booking_status")?;
        let mut bookings = self.bookings.lock().unwrap();
        let slot = bookings.iter_mut().find(|b| b.id == id).ok_or_else(|| Self::not_found("Booking"))?;
        slot.status = status;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<ManagedUser>, ApiError> {
        self.enter("list_users")?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn update_user_role(&self, id: &str, role: Role) -> Result<(), ApiError> {
        self.enter("update_user_role")?;
        let mut users = self.users.lock().unwrap();
        let slot = users.iter_mut().find(|u| u.id == id).ok_or_else(|| Self::not_found("User"))?;
        slot.role = role;
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.enter("delete_user")?;
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.enter("dashboard_stats")?;
        Ok(self.stats.lock().unwrap().clone())
    }
}

fn vehicle_from_form(id: String, form: &VehicleForm) -> Vehicle {
    Vehicle {
        id,
        vehicle_name: form.vehicle_name.clone(),
        kind: form.kind.clone(),
        registration_number: form.registration_number.clone(),
        daily_rent_price: form.daily_rent_price.parse().unwrap_or(0.0),
        availability_status: form.availability_status.clone(),
    }
}

// =============================================================================
// builders
// =============================================================================

pub(crate) fn user(id: &str, role: Role) -> User {
    User { id: id.to_owned(), name: format!("User {id}"), email: format!("{id}@example.com"), role }
}

pub(crate) fn vehicle(id: &str, name: &str, kind: &str, price: f64, status: &str) -> Vehicle {
    Vehicle {
        id: id.to_owned(),
        vehicle_name: name.to_owned(),
        kind: kind.to_owned(),
        registration_number: format!("REG-{id}"),
        daily_rent_price: price,
        availability_status: status.to_owned(),
    }
}

pub(crate) fn booking(id: &str, customer: Option<&str>, vehicle: Option<&str>, status: BookingStatus) -> Booking {
    Booking {
        id: id.to_owned(),
        customer: customer.map(|name| BookingCustomer { name: name.to_owned(), email: String::new() }),
        vehicle: vehicle
            .map(|name| BookingVehicle { vehicle_name: name.to_owned(), registration_number: String::new() }),
        rent_start_date: "2024-03-01T10:00:00Z".to_owned(),
        rent_end_date: "2024-03-03T10:00:00Z".to_owned(),
        total_price: 100.0,
        status,
    }
}

pub(crate) fn managed_user(id: &str, name: &str, email: &str, role: Role) -> ManagedUser {
    ManagedUser {
        id: id.to_owned(),
        name: name.to_owned(),
        email: email.to_owned(),
        phone: None,
        role,
        created_at: Some("2024-01-15T08:00:00Z".to_owned()),
    }
}

/// A scope providing a fresh auth context over memory storage and `api`.
pub(crate) fn scope_with(api: Arc<MockApi>) -> (Scope, AuthContext) {
    let auth = AuthContext::new(SessionStore::new(Arc::new(MemoryStorage::new())));
    let scope = Scope::new();
    scope.provide(auth.clone());
    let api: Arc<dyn RentalApi> = api;
    scope.provide(api);
    (scope, auth)
}
