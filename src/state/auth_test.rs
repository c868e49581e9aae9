use super::*;
use crate::state::session::{TOKEN_KEY, USER_KEY};
use crate::storage::{MemoryStorage, Storage};

fn user(role: Role) -> User {
    User { id: "u-1".into(), name: "Ada".into(), email: "ada@example.com".into(), role }
}

fn context() -> (Arc<MemoryStorage>, AuthContext) {
    let storage = Arc::new(MemoryStorage::new());
    let auth = AuthContext::new(SessionStore::new(storage.clone()));
    (storage, auth)
}

// =============================================================================
// AuthState
// =============================================================================

#[test]
fn new_context_is_hydrating() {
    let (_, auth) = context();
    let state = auth.state();
    assert!(state.is_loading);
    assert!(state.user.is_none());
    assert_eq!(auth.phase(), AuthPhase::Hydrating);
}

#[test]
fn phase_derivation() {
    let anon = AuthState { user: None, is_loading: false };
    assert_eq!(anon.phase(), AuthPhase::Anonymous);

    let signed_in = AuthState { user: Some(user(Role::Admin)), is_loading: false };
    assert_eq!(signed_in.phase(), AuthPhase::Authenticated(user(Role::Admin)));
    assert_eq!(signed_in.role(), Some(Role::Admin));
}

// =============================================================================
// hydrate
// =============================================================================

#[tokio::test]
async fn hydrate_empty_storage_is_anonymous() {
    let (_, auth) = context();
    auth.hydrate().await;
    assert_eq!(auth.phase(), AuthPhase::Anonymous);
    assert!(!auth.state().is_loading);
}

#[tokio::test]
async fn hydrate_restores_stored_user() {
    let (storage, auth) = context();
    storage.set(TOKEN_KEY, "tok").unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&user(Role::Customer)).unwrap()).unwrap();

    auth.hydrate().await;
    assert_eq!(auth.phase(), AuthPhase::Authenticated(user(Role::Customer)));
}

#[tokio::test]
async fn hydrate_corrupt_storage_finishes_anonymous() {
    let (storage, auth) = context();
    storage.set(TOKEN_KEY, "tok").unwrap();
    storage.set(USER_KEY, "][").unwrap();

    auth.hydrate().await;
    assert_eq!(auth.phase(), AuthPhase::Anonymous);
    assert_eq!(storage.get(TOKEN_KEY), None);
}

#[tokio::test]
async fn loading_clears_once_and_never_returns() {
    let (storage, auth) = context();
    storage.set(TOKEN_KEY, "tok").unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&user(Role::Customer)).unwrap()).unwrap();
    let mut rx = auth.subscribe();

    auth.hydrate().await;
    assert!(rx.has_changed().unwrap());
    assert!(!rx.borrow_and_update().is_loading);

    auth.hydrate().await;
    assert!(!rx.has_changed().unwrap(), "second hydrate must not emit");

    auth.logout();
    assert!(!auth.state().is_loading);
    auth.login("tok-2".into(), user(Role::Admin)).unwrap();
    assert!(!auth.state().is_loading);
    auth.hydrate().await;
    assert_eq!(auth.state().user, Some(user(Role::Admin)));
}

#[tokio::test]
async fn login_before_hydrate_survives_hydration() {
    let (_, auth) = context();
    auth.login("tok".into(), user(Role::Admin)).unwrap();
    assert!(auth.state().is_loading);

    auth.hydrate().await;
    assert_eq!(auth.phase(), AuthPhase::Authenticated(user(Role::Admin)));
}

// =============================================================================
// login / logout
// =============================================================================

#[tokio::test]
async fn login_persists_and_authenticates() {
    let (storage, auth) = context();
    auth.hydrate().await;

    auth.login("tok-9".into(), user(Role::Customer)).unwrap();
    assert_eq!(auth.user(), Some(user(Role::Customer)));
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok-9"));
    assert_eq!(auth.session().read().map(|s| s.user), Some(user(Role::Customer)));
}

#[tokio::test]
async fn login_overwrites_previous_user() {
    let (_, auth) = context();
    auth.hydrate().await;
    auth.login("a".into(), user(Role::Customer)).unwrap();
    let other = User { id: "u-2".into(), name: "Bo".into(), email: "bo@example.com".into(), role: Role::Admin };
    auth.login("b".into(), other.clone()).unwrap();
    assert_eq!(auth.user(), Some(other));
    assert_eq!(auth.session().token().as_deref(), Some("b"));
}

#[tokio::test]
async fn logout_twice_is_anonymous_without_error() {
    let (storage, auth) = context();
    auth.hydrate().await;
    auth.login("tok".into(), user(Role::Customer)).unwrap();

    auth.logout();
    assert_eq!(auth.phase(), AuthPhase::Anonymous);
    auth.logout();
    assert_eq!(auth.phase(), AuthPhase::Anonymous);
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(USER_KEY), None);
}

#[tokio::test]
async fn logout_when_anonymous_does_not_notify() {
    let (_, auth) = context();
    auth.hydrate().await;
    let mut rx = auth.subscribe();
    rx.borrow_and_update();

    auth.logout();
    assert!(!rx.has_changed().unwrap());
}

// =============================================================================
// interrupted hydration
// =============================================================================

struct SlowStorage {
    inner: MemoryStorage,
    delay: std::time::Duration,
}

impl Storage for SlowStorage {
    fn get(&self, key: &str) -> Option<String> {
        std::thread::sleep(self.delay);
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn dropped_hydrate_still_finishes() {
    let storage = Arc::new(SlowStorage { inner: MemoryStorage::new(), delay: std::time::Duration::from_millis(200) });
    storage.set(TOKEN_KEY, "tok").unwrap();
    storage.set(USER_KEY, &serde_json::to_string(&user(Role::Customer)).unwrap()).unwrap();
    let auth = AuthContext::new(SessionStore::new(storage));

    let first = tokio::time::timeout(std::time::Duration::from_millis(10), auth.hydrate()).await;
    assert!(first.is_err());
    assert!(auth.state().is_loading);

    auth.hydrate().await;
    assert!(!auth.state().is_loading);
    assert_eq!(auth.phase(), AuthPhase::Authenticated(user(Role::Customer)));
}

#[tokio::test]
async fn concurrent_hydrate_callers_both_see_result() {
    let storage = Arc::new(SlowStorage { inner: MemoryStorage::new(), delay: std::time::Duration::from_millis(50) });
    let auth = AuthContext::new(SessionStore::new(storage));

    tokio::join!(auth.hydrate(), auth.hydrate());
    assert_eq!(auth.phase(), AuthPhase::Anonymous);
}
