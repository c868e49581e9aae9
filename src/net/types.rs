//! Wire types for the rental REST API.
//!
//! The backend is loose about scalar encodings: ids and prices arrive either
//! as JSON numbers or as strings, and list payloads may be `null`. The
//! deserializers here normalize those shapes so views never see them.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

// =============================================================================
// SCALAR NORMALIZATION
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.to_string()),
        NumberOrString::String(s) => Ok(s),
    }
}

fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrString::Number(n)) => n.as_f64().ok_or_else(|| de::Error::custom("amount out of range")),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(0.0),
        Some(NumberOrString::String(s)) => s.trim().parse::<f64>().map_err(de::Error::custom),
    }
}

fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0),
        Some(NumberOrString::Number(n)) => n.as_u64().ok_or_else(|| de::Error::custom("count must be a non-negative integer")),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(0),
        Some(NumberOrString::String(s)) => s.trim().parse::<u64>().map_err(de::Error::custom),
    }
}

// =============================================================================
// ENVELOPES
// =============================================================================

/// Every successful read is wrapped as `{ "data": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

// =============================================================================
// USERS
// =============================================================================

/// Coarse authorization tag attached to every account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }

    /// The role an admin toggle switches to.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Admin => Self::Customer,
            Self::Customer => Self::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in account as returned by `POST /auth/signin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// An account row on the admin user table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManagedUser {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
}

// =============================================================================
// AUTH PAYLOADS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `data` of a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInData {
    pub token: String,
    pub user: User,
}

/// Account creation payload. The server issues no token for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
}

// =============================================================================
// VEHICLES
// =============================================================================

pub const AVAILABLE: &str = "available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub vehicle_name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub registration_number: String,
    #[serde(deserialize_with = "de_amount")]
    pub daily_rent_price: f64,
    #[serde(default)]
    pub availability_status: String,
}

impl Vehicle {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.availability_status == AVAILABLE
    }
}

/// Admin create/update form. Values are kept as typed text, like the
/// inputs they come from, and sent to the server unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleForm {
    pub vehicle_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub registration_number: String,
    pub daily_rent_price: String,
    pub availability_status: String,
}

impl Default for VehicleForm {
    fn default() -> Self {
        Self {
            vehicle_name: String::new(),
            kind: "car".to_owned(),
            registration_number: String::new(),
            daily_rent_price: String::new(),
            availability_status: AVAILABLE.to_owned(),
        }
    }
}

impl From<&Vehicle> for VehicleForm {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_name: vehicle.vehicle_name.clone(),
            kind: vehicle.kind.clone(),
            registration_number: vehicle.registration_number.clone(),
            daily_rent_price: vehicle.daily_rent_price.to_string(),
            availability_status: vehicle.availability_status.clone(),
        }
    }
}

impl VehicleForm {
    /// Returns the first problem that would make the server reject the form.
    #[must_use]
    pub fn validate(&self) -> Option<&'static str> {
        if self.vehicle_name.trim().is_empty() {
            return Some("Vehicle name is required.");
        }
        if self.registration_number.trim().is_empty() {
            return Some("Registration number is required.");
        }
        match self.daily_rent_price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => None,
            _ => Some("Daily rent price must be a non-negative number."),
        }
    }
}

// =============================================================================
// BOOKINGS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Returned,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingCustomer {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookingVehicle {
    pub vehicle_name: String,
    #[serde(default)]
    pub registration_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Booking {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub customer: Option<BookingCustomer>,
    #[serde(default)]
    pub vehicle: Option<BookingVehicle>,
    pub rent_start_date: String,
    pub rent_end_date: String,
    #[serde(deserialize_with = "de_amount")]
    pub total_price: f64,
    pub status: BookingStatus,
}

/// Payload for `POST /bookings`. Dates are RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBooking {
    pub customer_id: String,
    pub vehicle_id: String,
    pub rent_start_date: String,
    pub rent_end_date: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecentActivity {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub customer_name: String,
    pub vehicle_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "de_count")]
    pub total_users: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub active_vehicles: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub total_bookings: u64,
    #[serde(default, deserialize_with = "de_amount")]
    pub total_revenue: f64,
    #[serde(default)]
    pub recent_activities: Option<Vec<RecentActivity>>,
}
