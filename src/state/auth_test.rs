use super::*;

fn session(is_admin: bool) -> Session {
    serde_json::from_value(serde_json::json!({
        "id": 3,
        "username": "carol",
        "isAdmin": is_admin,
        "tokenBalance": 42.5
    }))
    .unwrap()
}

#[test]
fn default_is_loading_and_signed_out() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(!state.is_signed_in());
    assert_eq!(state.user_id(), None);
    assert!((state.token_balance() - 0.0).abs() < f64::EPSILON);
}

#[test]
fn restored_session_exposes_identity() {
    let state = AuthState::restored(Some(session(false)));
    assert!(!state.loading);
    assert!(state.is_signed_in());
    assert!(!state.is_admin());
    assert_eq!(state.user_id(), Some(3));
    assert!((state.token_balance() - 42.5).abs() < f64::EPSILON);
}

#[test]
fn admin_flag_comes_from_session() {
    assert!(AuthState::restored(Some(session(true))).is_admin());
    assert!(!AuthState::restored(None).is_admin());
}
