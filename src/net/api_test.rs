use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use serde_json::{Value, json};

use super::*;
use crate::config::ClientConfig;
use crate::net::types::User;
use crate::state::auth::AuthPhase;
use crate::storage::MemoryStorage;

// =============================================================================
// fake API server
// =============================================================================

#[derive(Clone, Default)]
struct Seen {
    auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Seen {
    fn record(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        self.auth_headers.lock().unwrap().push(value);
    }
}

async fn vehicles(State(seen): State<Seen>, headers: HeaderMap) -> Json<Value> {
    seen.record(&headers);
    Json(json!({
        "success": true,
        "data": [
            { "id": 1, "vehicle_name": "Civic", "type": "car", "registration_number": "ABC-1",
              "daily_rent_price": "45.00", "availability_status": "available" }
        ]
    }))
}

async fn vehicle(State(seen): State<Seen>, headers: HeaderMap, Path(id): Path<String>) -> impl IntoResponse {
    seen.record(&headers);
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({ "success": false, "message": "Vehicle not found" })))
            .into_response();
    }
    Json(json!({ "data": { "id": id, "vehicle_name": "Civic", "daily_rent_price": 45 } })).into_response()
}

async fn bookings_list() -> Json<Value> {
    Json(json!({ "success": true, "data": null }))
}

async fn bookings_create(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    seen.record(&headers);
    seen.bodies.lock().unwrap().push(body);
    (StatusCode::CREATED, Json(json!({ "success": true })))
}

async fn signin(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "secret" {
        Json(json!({ "data": { "token": "tok-1", "user": {
            "id": "u-1", "name": "Ada", "email": body["email"], "role": "customer" } } }))
        .into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid email or password" }))).into_response()
    }
}

async fn user_update(Path(_id): Path<String>) -> impl IntoResponse {
    (StatusCode::UNAUTHORIZED, "expired")
}

async fn spawn_server(seen: Seen) -> String {
    let app = Router::new()
        .route("/api/v1/vehicles", get(vehicles))
        .route("/api/v1/vehicles/{id}", get(vehicle))
        .route("/api/v1/bookings", get(bookings_list).post(bookings_create))
        .route("/api/v1/auth/signin", post(signin))
        .route("/api/v1/users/{id}", put(user_update))
        .with_state(seen);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1/")
}

fn client(base_url: &str, policy: UnauthorizedPolicy) -> (AuthContext, ApiClient) {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    let auth = AuthContext::new(session.clone());
    let mut config = ClientConfig::default().with_api_url(base_url);
    config.on_unauthorized = policy;
    let api = ApiClient::new(&config, session).unwrap().with_auth(auth.clone());
    (auth, api)
}

fn customer() -> User {
    User { id: "u-1".into(), name: "Ada".into(), email: "ada@example.com".into(), role: Role::Customer }
}

// =============================================================================
// interceptor
// =============================================================================

#[test]
fn authorize_without_token_adds_no_header() {
    let (_, api) = client("http://127.0.0.1:1/api/v1", UnauthorizedPolicy::Observe);
    let request = api.authorize(api.http.get(api.url("/vehicles"))).build().unwrap();
    assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    assert_eq!(request.url().as_str(), "http://127.0.0.1:1/api/v1/vehicles");
}

#[test]
fn authorize_reads_token_at_send_time() {
    let (auth, api) = client("http://127.0.0.1:1/api/v1", UnauthorizedPolicy::Observe);
    auth.login("tok-42".into(), customer()).unwrap();

    let request = api.authorize(api.http.get(api.url("/bookings"))).build().unwrap();
    assert_eq!(request.headers()[reqwest::header::AUTHORIZATION], "Bearer tok-42");

    auth.logout();
    let request = api.authorize(api.http.get(api.url("/bookings"))).build().unwrap();
    assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
}

// =============================================================================
// decoding
// =============================================================================

#[test]
fn decode_list_null_and_missing_are_empty() {
    assert!(decode_list::<Vehicle>(r#"{"data":null}"#).unwrap().is_empty());
    assert!(decode_list::<Vehicle>(r#"{"success":true}"#).unwrap().is_empty());
}

#[test]
fn decode_data_requires_envelope() {
    assert!(decode_data::<Vehicle>(r#"{"id":"1","vehicle_name":"x","daily_rent_price":1}"#).is_err());
}

// =============================================================================
// round trips against a local server
// =============================================================================

#[tokio::test]
async fn list_vehicles_sends_bearer_when_signed_in() {
    let seen = Seen::default();
    let base = spawn_server(seen.clone()).await;
    let (auth, api) = client(&base, UnauthorizedPolicy::Observe);

    let anonymous = api.list_vehicles().await.unwrap();
    assert_eq!(anonymous.len(), 1);
    assert_eq!(anonymous[0].id, "1");

    auth.login("tok-7".into(), customer()).unwrap();
    api.list_vehicles().await.unwrap();

    let headers = seen.auth_headers.lock().unwrap().clone();
    assert_eq!(headers, vec![None, Some("Bearer tok-7".to_owned())]);
}

#[tokio::test]
async fn get_vehicle_not_found_carries_server_message() {
    let base = spawn_server(Seen::default()).await;
    let (_, api) = client(&base, UnauthorizedPolicy::Observe);

    let err = api.get_vehicle("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message("fallback"), "Vehicle not found");

    let found = api.get_vehicle("abc").await.unwrap();
    assert_eq!(found.id, "abc");
}

#[tokio::test]
async fn list_bookings_null_data_is_empty() {
    let base = spawn_server(Seen::default()).await;
    let (_, api) = client(&base, UnauthorizedPolicy::Observe);
    assert!(api.list_bookings().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_booking_posts_payload() {
    let seen = Seen::default();
    let base = spawn_server(seen.clone()).await;
    let (auth, api) = client(&base, UnauthorizedPolicy::Observe);
    auth.login("tok".into(), customer()).unwrap();

    let booking = NewBooking {
        customer_id: "u-1".into(),
        vehicle_id: "v-1".into(),
        rent_start_date: "2024-01-01T10:00:00Z".into(),
        rent_end_date: "2024-01-02T10:00:00Z".into(),
    };
    api.create_booking(&booking).await.unwrap();

    let bodies = seen.bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["vehicle_id"], "v-1");
    assert_eq!(bodies[0]["rent_end_date"], "2024-01-02T10:00:00Z");
}

#[tokio::test]
async fn sign_in_success_and_failure() {
    let base = spawn_server(Seen::default()).await;
    let (_, api) = client(&base, UnauthorizedPolicy::Observe);

    let data = api.sign_in("ada@example.com", "secret").await.unwrap();
    assert_eq!(data.token, "tok-1");
    assert_eq!(data.user.email, "ada@example.com");

    let err = api.sign_in("ada@example.com", "wrong").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("Invalid credentials."), "Invalid email or password");
}

// =============================================================================
// 401 policy
// =============================================================================

#[tokio::test]
async fn unauthorized_observe_keeps_session() {
    let base = spawn_server(Seen::default()).await;
    let (auth, api) = client(&base, UnauthorizedPolicy::Observe);
    auth.hydrate().await;
    auth.login("stale".into(), customer()).unwrap();

    let err = api.update_user_role("u-2", Role::Admin).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("Update failed."), "Update failed.");
    assert_eq!(auth.phase(), AuthPhase::Authenticated(customer()));
}

#[tokio::test]
async fn unauthorized_logout_policy_signs_out() {
    let base = spawn_server(Seen::default()).await;
    let (auth, api) = client(&base, UnauthorizedPolicy::Logout);
    auth.hydrate().await;
    auth.login("stale".into(), customer()).unwrap();

    assert!(api.update_user_role("u-2", Role::Admin).await.is_err());
    assert_eq!(auth.phase(), AuthPhase::Anonymous);
    assert_eq!(auth.session().token(), None);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let (_, api) = client("http://127.0.0.1:1/api/v1", UnauthorizedPolicy::Observe);
    let err = api.list_vehicles().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.user_message("Could not load vehicles."), "Could not load vehicles.");
}
