//! REST client for the rental API.
//!
//! ARCHITECTURE
//! ============
//! [`RentalApi`] is the seam every view talks through; [`ApiClient`] is the
//! reqwest implementation. Each outbound request passes through
//! [`ApiClient::authorize`], which reads the bearer token from the session
//! store at send time, so a login or logout takes effect on the very next
//! request without rebuilding the client.
//!
//! A `401` is logged and returned to the caller. Whether it also signs the
//! user out is the configured [`UnauthorizedPolicy`].

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, extract_message};
use super::types::{
    Booking, BookingStatus, DashboardStats, Envelope, ManagedUser, NewBooking, Role, RoleUpdate, SignInData,
    SignInRequest, SignUpRequest, StatusUpdate, Vehicle, VehicleForm,
};
use crate::config::{ClientConfig, UnauthorizedPolicy, normalize_base_url};
use crate::state::auth::AuthContext;
use crate::state::session::SessionStore;

/// Operations the client consumes from the rental API.
#[async_trait]
pub trait RentalApi: Send + Sync {
    /// `POST /auth/signin`
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInData, ApiError>;
    /// `POST /auth/signup`
    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError>;

    /// `GET /vehicles`
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApiError>;
    /// `GET /vehicles/:id`
    async fn get_vehicle(&self, id: &str) -> Result<Vehicle, ApiError>;
    /// `POST /vehicles`
    async fn create_vehicle(&self, form: &VehicleForm) -> Result<(), ApiError>;
    /// `PUT /vehicles/:id`
    async fn update_vehicle(&self, id: &str, form: &VehicleForm) -> Result<(), ApiError>;
    /// `DELETE /vehicles/:id`
    async fn delete_vehicle(&self, id: &str) -> Result<(), ApiError>;

    /// `POST /bookings`
    async fn create_booking(&self, booking: &NewBooking) -> Result<(), ApiError>;
    /// `GET /bookings`. Scoped by the server to the caller unless admin.
    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError>;
    /// `PUT /bookings/:id`
    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<(), ApiError>;

    /// `GET /users`
    async fn list_users(&self) -> Result<Vec<ManagedUser>, ApiError>;
    /// `PUT /users/:id`
    async fn update_user_role(&self, id: &str, role: Role) -> Result<(), ApiError>;
    /// `DELETE /users/:id`
    async fn delete_user(&self, id: &str) -> Result<(), ApiError>;

    /// `GET /dashboard/stats`
    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    on_unauthorized: UnauthorizedPolicy,
    auth: Option<AuthContext>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: normalize_base_url(&config.api_url),
            session,
            on_unauthorized: config.on_unauthorized,
            auth: None,
        })
    }

    /// Attach the auth context used by [`UnauthorizedPolicy::Logout`].
    #[must_use]
    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = Some(auth);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Outbound interceptor: attach `Authorization: Bearer <token>` when a
    /// token is stored.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<String, ApiError> {
        tracing::debug!(%method, %path, "api request");
        let request = self.authorize(self.http.request(method.clone(), self.url(path)));
        let request = match body {
            Some(json) => request.json(&json),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            self.observe_unauthorized(&method, path);
        }
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), message: extract_message(&text) });
        }
        Ok(text)
    }

    fn observe_unauthorized(&self, method: &Method, path: &str) {
        tracing::warn!(%method, %path, "api answered 401");
        if self.on_unauthorized == UnauthorizedPolicy::Logout {
            if let Some(auth) = &self.auth {
                auth.logout();
            }
        }
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(Method::GET, path, None).await?;
        decode_data(&text)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let text = self.send(Method::GET, path, None).await?;
        decode_list(&text)
    }

    async fn ack<B: Serialize + Sync>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), ApiError> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.send(method, path, body).await.map(|_| ())
    }
}

pub(crate) fn decode_data<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_str::<Envelope<T>>(text)?.data)
}

/// List payloads may carry `"data": null` or omit it; both mean empty.
pub(crate) fn decode_list<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ApiError> {
    Ok(serde_json::from_str::<Envelope<Option<Vec<T>>>>(text)?.data.unwrap_or_default())
}

const NO_BODY: Option<&()> = None;

#[async_trait]
impl RentalApi for ApiClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<SignInData, ApiError> {
        let body = serde_json::to_value(SignInRequest { email, password })?;
        let text = self.send(Method::POST, "/auth/signin", Some(body)).await?;
        decode_data(&text)
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError> {
        self.ack(Method::POST, "/auth/signup", Some(request)).await
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.get_list("/vehicles").await
    }

    async fn get_vehicle(&self, id: &str) -> Result<Vehicle, ApiError> {
        self.get_data(&format!("/vehicles/{id}")).await
    }

    async fn create_vehicle(&self, form: &VehicleForm) -> Result<(), ApiError> {
        self.ack(Method::POST, "/vehicles", Some(form)).await
    }

    async fn update_vehicle(&self, id: &str, form: &VehicleForm) -> Result<(), ApiError> {
        self.ack(Method::PUT, &format!("/vehicles/{id}"), Some(form)).await
    }

    async fn delete_vehicle(&self, id: &str) -> Result<(), ApiError> {
        self.ack(Method::DELETE, &format!("/vehicles/{id}"), NO_BODY).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<(), ApiError> {
        self.ack(Method::POST, "/bookings", Some(booking)).await
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get_list("/bookings").await
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> Result<(), ApiError> {
        self.ack(Method::PUT, &format!("/bookings/{id}"), Some(&StatusUpdate { status })).await
    }

    async fn list_users(&self) -> Result<Vec<ManagedUser>, ApiError> {
        self.get_list("/users").await
    }

    async fn update_user_role(&self, id: &str, role: Role) -> Result<(), ApiError> {
        self.ack(Method::PUT, &format!("/users/{id}"), Some(&RoleUpdate { role })).await
    }

    async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        self.ack(Method::DELETE, &format!("/users/{id}"), NO_BODY).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_data("/dashboard/stats").await
    }
}
