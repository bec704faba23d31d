use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::testing::{Harness, TestApi, harness, harness_at, user_json};
use crate::transport::Method;

type TestStore = SessionStore<crate::testing::ScriptedTransport, crate::MemoryStore, crate::testing::RecordingNavigator>;

fn store_for(api: &TestApi) -> TestStore {
    SessionStore::new(api.clone())
}

fn jwt_for(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{header}.{body}.sig")
}

fn signed_in(h: &Harness) -> TestStore {
    h.transport.ok(Method::Post, "/users/signin", json!({"token": "tok-1", "user": user_json(7, "alice")}));
    let sessions = store_for(&h.api);
    block_on(sessions.sign_in("alice@example.com", "pw")).expect("sign in");
    sessions
}

#[test]
fn sign_in_sets_token_and_session_and_persists_both() {
    let h = harness_at("/signin");
    let sessions = signed_in(&h);

    let current = sessions.current().expect("session");
    assert_eq!(current.username, "alice");
    assert_eq!(sessions.token().as_deref(), Some("tok-1"));
    let persisted: Session = serde_json::from_str(&h.store.get(SESSION_KEY).expect("persisted")).expect("json");
    assert_eq!(persisted, current);
}

#[test]
fn restore_after_reload_returns_signed_in_session() {
    let h = harness();
    let before = signed_in(&h).current().expect("session");

    let reloaded = store_for(&h.api);
    assert_eq!(reloaded.current(), None);
    assert_eq!(reloaded.restore(), Some(before.clone()));
    assert_eq!(reloaded.current(), Some(before));
}

#[test]
fn subsequent_requests_carry_the_new_token() {
    let h = harness();
    let sessions = signed_in(&h);
    h.transport.ok(Method::Get, "/users/7", user_json(7, "alice"));

    block_on(sessions.api().user(7)).expect("user");

    let last = h.transport.sent().pop().expect("request");
    assert_eq!(last.header("Authorization"), Some("Bearer tok-1"));
}

#[test]
fn failed_sign_in_leaves_prior_state_untouched() {
    let h = harness();
    let sessions = signed_in(&h);
    let before = sessions.current();
    h.transport.status(Method::Post, "/users/signin", 400, r#"{"message":"Invalid email or password"}"#);

    let err = block_on(sessions.sign_in("alice@example.com", "wrong")).expect_err("should fail");

    assert_eq!(
        err,
        SessionError::Api(ApiError::Status { status: 400, message: "Invalid email or password".to_owned() })
    );
    assert_eq!(sessions.current(), before);
    assert_eq!(sessions.token().as_deref(), Some("tok-1"));
}

#[test]
fn sign_in_with_empty_token_is_rejected() {
    let h = harness();
    h.transport.ok(Method::Post, "/users/signin", json!({"token": "", "user": user_json(1, "x")}));
    let sessions = store_for(&h.api);

    assert_eq!(block_on(sessions.sign_in("x@example.com", "pw")), Err(SessionError::EmptyToken));
    assert_eq!(sessions.current(), None);
    assert!(h.store.is_empty());
}

#[test]
fn sign_out_clears_memory_and_persistence() {
    let h = harness();
    let sessions = signed_in(&h);

    sessions.sign_out();

    assert_eq!(sessions.current(), None);
    assert_eq!(sessions.token(), None);
    assert_eq!(h.store.get(TOKEN_KEY), None);
    assert_eq!(h.store.get(SESSION_KEY), None);
}

#[test]
fn restore_without_token_ignores_persisted_session() {
    let h = harness();
    h.store.set(SESSION_KEY, &user_json(1, "ghost").to_string());
    let sessions = store_for(&h.api);

    assert_eq!(sessions.restore(), None);
    assert_eq!(h.store.get(SESSION_KEY), None);
}

#[test]
fn restore_with_unreadable_session_clears_both_entries() {
    let h = harness();
    h.store.set(TOKEN_KEY, "tok");
    h.store.set(SESSION_KEY, "{not json");
    let sessions = store_for(&h.api);

    assert_eq!(sessions.restore(), None);
    assert!(h.store.is_empty());
}

#[test]
fn session_disappears_once_401_clears_the_token() {
    let h = harness_at("/positions");
    let sessions = signed_in(&h);
    h.transport.status(Method::Get, "/orders/user/7", 401, "");

    let _ = block_on(sessions.api().user_orders(7));

    assert_eq!(sessions.current(), None);
    assert_eq!(h.navigator.redirects(), vec!["/signin".to_owned()]);
}

#[test]
fn update_user_replaces_session_with_server_record() {
    let h = harness();
    let sessions = signed_in(&h);
    let mut updated = user_json(7, "alice2");
    updated["bio"] = json!("hello");
    h.transport.ok(Method::Put, "/users/7", updated);

    let update = ProfileUpdate { username: Some("alice2".to_owned()), bio: Some("hello".to_owned()), ..Default::default() };
    let session = block_on(sessions.update_user(&update)).expect("update");

    assert_eq!(session.username, "alice2");
    assert_eq!(session.bio.as_deref(), Some("hello"));
    let persisted: Session = serde_json::from_str(&h.store.get(SESSION_KEY).expect("persisted")).expect("json");
    assert_eq!(persisted, session);
    assert_eq!(sessions.token().as_deref(), Some("tok-1"));
}

#[test]
fn update_user_requires_session() {
    let h = harness();
    let sessions = store_for(&h.api);
    let err = block_on(sessions.update_user(&ProfileUpdate::default())).expect_err("not signed in");
    assert_eq!(err, SessionError::NotSignedIn);
    assert!(h.transport.sent().is_empty());
}

#[test]
fn refresh_picks_up_new_balance() {
    let h = harness();
    let sessions = signed_in(&h);
    let mut fresh = user_json(7, "alice");
    fresh["tokenBalance"] = json!(35.5);
    h.transport.ok(Method::Get, "/users/7", fresh);

    let session = block_on(sessions.refresh()).expect("refresh");

    assert_eq!(session.token_balance, 35.5);
    assert_eq!(sessions.current().map(|s| s.token_balance), Some(35.5));
}

#[test]
fn adopt_token_sets_pair_after_fetching_user_by_id() {
    let h = harness_at("/oauth/callback");
    let token = jwt_for(&json!({"sub": "carol", "userId": 12}));
    h.transport.ok(Method::Get, "/users/12", user_json(12, "carol"));
    let sessions = store_for(&h.api);

    let session = block_on(sessions.adopt_token(&token)).expect("adopt");

    assert_eq!(session.username, "carol");
    assert_eq!(sessions.token(), Some(token.clone()));
    assert_eq!(sessions.current(), Some(session));
    assert_eq!(h.transport.sent()[0].header("Authorization"), Some(format!("Bearer {token}").as_str()));
}

#[test]
fn adopt_token_falls_back_to_username_lookup() {
    let h = harness();
    let token = jwt_for(&json!({"sub": "dave"}));
    h.transport.ok(Method::Get, "/users/username/dave", user_json(3, "dave"));
    let sessions = store_for(&h.api);

    let session = block_on(sessions.adopt_token(&token)).expect("adopt");

    assert_eq!(session.user_id, 3);
}

#[test]
fn adopt_token_with_undecodable_token_changes_nothing() {
    let h = harness();
    let sessions = signed_in(&h);
    let before = (sessions.current(), sessions.token());

    let err = block_on(sessions.adopt_token("garbage")).expect_err("invalid");

    assert!(matches!(err, SessionError::InvalidToken(_)));
    assert_eq!((sessions.current(), sessions.token()), before);
}

#[test]
fn adopt_token_with_failed_fetch_changes_nothing() {
    let h = harness_at("/oauth/callback");
    let sessions = signed_in(&h);
    let before = (sessions.current(), sessions.token());
    let token = jwt_for(&json!({"sub": "eve", "userId": 99}));
    h.transport.status(Method::Get, "/users/99", 401, "");

    let err = block_on(sessions.adopt_token(&token)).expect_err("rejected");

    assert_eq!(err, SessionError::Api(ApiError::Unauthorized));
    assert_eq!((sessions.current(), sessions.token()), before);
    assert!(h.navigator.redirects().is_empty());
}

#[test]
fn adopt_token_on_fresh_store_failure_leaves_nothing_persisted() {
    let h = harness();
    let token = jwt_for(&json!({"sub": "eve"}));
    h.transport.respond(Method::Get, "/users/username/eve", Err(ApiError::Network("offline".to_owned())));
    let sessions = store_for(&h.api);

    assert!(block_on(sessions.adopt_token(&token)).is_err());
    assert_eq!(sessions.token(), None);
    assert_eq!(sessions.current(), None);
    assert!(h.store.is_empty());
}

#[test]
fn sign_up_posts_trimmed_fields_without_signing_in() {
    let h = harness();
    h.transport.ok(
        Method::Post,
        "/users/signup",
        json!({"id": 5, "username": "newbie", "tokenBalance": 50.0, "message": "User created"}),
    );
    let sessions = store_for(&h.api);

    let resp = block_on(sessions.sign_up(" newbie ", " n@example.com ", "pw")).expect("signup");

    assert_eq!(resp.token_balance, 50.0);
    assert_eq!(sessions.current(), None);
    let crate::transport::RequestBody::Json(body) = &h.transport.sent()[0].body else {
        panic!("expected json body");
    };
    assert_eq!(body, &json!({"username": "newbie", "email": "n@example.com", "password": "pw"}));
}
