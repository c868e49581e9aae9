use super::*;
use crate::test_support::user;

fn signed_in(role: Role) -> AuthState {
    AuthState { user: Some(user("u-1", role)), is_loading: false }
}

#[test]
fn loading_is_pending_even_with_user() {
    let state = AuthState::hydrating();
    assert_eq!(guard(&state, None, "/profile"), GuardOutcome::Pending);

    let state = AuthState { user: Some(user("u-1", Role::Customer)), is_loading: true };
    assert_eq!(guard(&state, Some(Role::Admin), "/admin"), GuardOutcome::Pending);
}

#[test]
fn anonymous_redirects_to_login_with_return_path() {
    let state = AuthState { user: None, is_loading: false };
    assert_eq!(
        guard(&state, None, "/book/42"),
        GuardOutcome::RedirectToLogin { return_to: "/book/42".into() }
    );
    assert_eq!(
        guard(&state, Some(Role::Admin), "/admin"),
        GuardOutcome::RedirectToLogin { return_to: "/admin".into() }
    );
}

#[test]
fn wrong_role_redirects_home() {
    assert_eq!(guard(&signed_in(Role::Customer), Some(Role::Admin), "/admin"), GuardOutcome::RedirectToHome);
}

#[test]
fn matching_role_renders() {
    assert_eq!(guard(&signed_in(Role::Admin), Some(Role::Admin), "/admin"), GuardOutcome::Render);
}

#[test]
fn no_required_role_renders_any_user() {
    assert_eq!(guard(&signed_in(Role::Customer), None, "/profile"), GuardOutcome::Render);
    assert_eq!(guard(&signed_in(Role::Admin), None, "/profile"), GuardOutcome::Render);
}
