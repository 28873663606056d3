use super::*;

// =============================================================================
// SessionState
// =============================================================================

#[test]
fn signed_out_is_initial_shape() {
    let state = SessionState::signed_out();
    assert!(!state.authenticated);
    assert!(state.user.is_none());
    assert!(!state.pending);
    assert!(state.last_error.is_none());
}

#[test]
fn signed_out_matches_default() {
    assert_eq!(SessionState::signed_out(), SessionState::default());
}

#[test]
fn signed_in_carries_user() {
    let state = SessionState::signed_in(SessionUser::new("demo"));
    assert!(state.authenticated);
    assert_eq!(state.username(), Some("demo"));
    assert!(!state.pending);
    assert!(state.last_error.is_none());
}

#[test]
fn signed_out_is_consistent() {
    assert!(SessionState::signed_out().is_consistent());
}

#[test]
fn signed_in_is_consistent() {
    assert!(SessionState::signed_in(SessionUser::new("demo")).is_consistent());
}

#[test]
fn authenticated_without_user_is_inconsistent() {
    let state = SessionState { authenticated: true, user: None, pending: false, last_error: None };
    assert!(!state.is_consistent());
}

#[test]
fn user_without_authenticated_is_inconsistent() {
    let state = SessionState {
        authenticated: false,
        user: Some(SessionUser::new("demo")),
        pending: false,
        last_error: None,
    };
    assert!(!state.is_consistent());
}

#[test]
fn username_absent_when_signed_out() {
    assert_eq!(SessionState::signed_out().username(), None);
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serialize_round_trip() {
    let user = SessionUser::new("demo");
    let json = serde_json::to_string(&user).unwrap();
    let restored: SessionUser = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, user);
}

#[test]
fn session_user_json_shape() {
    let json = serde_json::to_string(&SessionUser::new("demo")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["username"], "demo");
}
