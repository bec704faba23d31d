use futures::executor::block_on;
use serde_json::json;

use super::*;
use crate::storage::{SESSION_KEY, TOKEN_KEY};
use crate::testing::{BASE, harness, harness_at, user_json};
use crate::transport::RequestBody;
use crate::types::{MarketOutcome, OrderSide};

#[test]
fn is_auth_route_matches_signin_and_signup_only() {
    assert!(is_auth_route("/signin"));
    assert!(is_auth_route("/signup/"));
    assert!(is_auth_route("/signin?next=/wallet"));
    assert!(!is_auth_route("/"));
    assert!(!is_auth_route("/profile"));
    assert!(!is_auth_route("/signin-help"));
}

#[test]
fn resolve_media_url_rewrites_upload_paths() {
    let config = ApiConfig::new("http://localhost:8080/api");
    assert_eq!(
        resolve_media_url(&config, "/uploads/profiles/a.png"),
        "http://localhost:8080/api/files/serve/uploads/profiles/a.png"
    );
    assert_eq!(resolve_media_url(&config, "https://cdn/x.png"), "https://cdn/x.png");
    assert_eq!(resolve_media_url(&config, "avatar.png"), "avatar.png");
    assert_eq!(resolve_media_url(&config, ""), "");
}

#[test]
fn error_message_prefers_message_then_error_then_raw_body() {
    assert_eq!(error_message(r#"{"message":"Insufficient balance"}"#), "Insufficient balance");
    assert_eq!(error_message(r#"{"error":"Wallet address not found"}"#), "Wallet address not found");
    assert_eq!(error_message("  plain text  "), "plain text");
}

#[test]
fn requests_carry_stored_token_as_bearer() {
    let h = harness();
    h.store.set(TOKEN_KEY, "tok-1");
    h.transport.ok(Method::Get, "/users/7", user_json(7, "alice"));

    let user = block_on(h.api.user(7)).expect("user");

    assert_eq!(user.username, "alice");
    let sent = h.transport.sent();
    assert_eq!(sent[0].url, format!("{BASE}/users/7"));
    assert_eq!(sent[0].header("authorization"), Some("Bearer tok-1"));
}

#[test]
fn requests_without_token_have_no_authorization_header() {
    let h = harness();
    h.transport.ok(Method::Get, "/markets/active", json!([]));

    let markets = block_on(h.api.active_markets()).expect("markets");

    assert!(markets.is_empty());
    assert_eq!(h.transport.sent()[0].header("Authorization"), None);
}

#[test]
fn unauthorized_clears_credentials_and_redirects_to_signin() {
    let h = harness_at("/positions");
    h.store.set(TOKEN_KEY, "expired");
    h.store.set(SESSION_KEY, &user_json(1, "a").to_string());
    h.transport.status(Method::Get, "/orders/user/1", 401, "");

    let err = block_on(h.api.user_orders(1)).expect_err("401");

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(h.store.get(TOKEN_KEY), None);
    assert_eq!(h.store.get(SESSION_KEY), None);
    assert_eq!(h.navigator.redirects(), vec![SIGN_IN_PATH.to_owned()]);
}

#[test]
fn unauthorized_on_auth_views_does_not_navigate() {
    for path in [SIGN_IN_PATH, SIGN_UP_PATH] {
        let h = harness_at(path);
        h.store.set(TOKEN_KEY, "expired");
        h.transport.status(Method::Get, "/markets/active", 401, "");

        let err = block_on(h.api.active_markets()).expect_err("401");

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(h.store.get(TOKEN_KEY), None);
        assert!(h.navigator.redirects().is_empty());
    }
}

#[test]
fn other_error_statuses_pass_through_without_clearing() {
    let h = harness_at("/wallet");
    h.store.set(TOKEN_KEY, "tok");
    h.transport.status(Method::Get, "/users/2/deposit-address", 403, "");
    h.transport.status(Method::Post, "/orders", 400, r#"{"message":"Market is not active"}"#);

    let forbidden = block_on(h.api.deposit_address(2)).expect_err("403");
    assert_eq!(forbidden, ApiError::Status { status: 403, message: String::new() });

    let order = PlaceOrderRequest {
        user_id: 2,
        wallet_address: "w".to_owned(),
        market_id: 9,
        side: OrderSide::No,
        stake_amount: 5.0,
    };
    let rejected = block_on(h.api.place_order(&order)).expect_err("400");
    assert_eq!(rejected.user_message(), "Market is not active");

    assert_eq!(h.store.get(TOKEN_KEY).as_deref(), Some("tok"));
    assert!(h.navigator.redirects().is_empty());
}

#[test]
fn transport_failures_surface_unchanged() {
    let h = harness();
    h.transport.respond(Method::Get, "/health", Err(ApiError::Timeout));
    assert_eq!(block_on(h.api.health()), Err(ApiError::Timeout));
}

#[test]
fn explicit_token_401_leaves_stored_credentials() {
    let h = harness_at("/oauth/callback");
    h.store.set(TOKEN_KEY, "current");
    h.transport.status(Method::Get, "/users/username/mallory", 401, "");

    let err = block_on(h.api.user_with_token("candidate", None, "mallory")).expect_err("401");

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(h.store.get(TOKEN_KEY).as_deref(), Some("current"));
    assert!(h.navigator.redirects().is_empty());
    assert_eq!(h.transport.sent()[0].header("Authorization"), Some("Bearer candidate"));
}

#[test]
fn withdraw_sends_query_parameters() {
    let h = harness();
    h.transport.ok(
        Method::Post,
        "/users/3/withdraw",
        json!({"success": "true", "message": "Transfer successful", "transaction": "sig", "newBalance": "40.0"}),
    );

    let resp = block_on(h.api.withdraw(3, "Phantom111", 10.0)).expect("withdraw");

    assert!(resp.success);
    let sent = &h.transport.sent()[0];
    assert_eq!(
        sent.query,
        vec![("phantomWallet".to_owned(), "Phantom111".to_owned()), ("amount".to_owned(), "10".to_owned())]
    );
    assert_eq!(sent.body, RequestBody::Empty);
}

#[test]
fn upload_file_sends_file_and_folder_parts() {
    let h = harness();
    h.transport.ok(Method::Post, "/files/upload", json!({"success": "true", "fileUrl": "/uploads/profiles/me.png"}));

    let resp = block_on(h.api.upload_file("me.png", "image/png", vec![1, 2, 3], PROFILE_UPLOAD_FOLDER))
        .expect("upload");

    assert_eq!(resp.file_url.as_deref(), Some("/uploads/profiles/me.png"));
    let RequestBody::Multipart(parts) = &h.transport.sent()[0].body else {
        panic!("expected multipart body");
    };
    assert_eq!(parts.len(), 2);
    assert!(matches!(&parts[0], FormPart::File { name, bytes, .. } if name == "file" && bytes == &vec![1, 2, 3]));
    assert!(matches!(&parts[1], FormPart::Text { name, value } if name == "folder" && value == "profiles"));
}

#[test]
fn settle_market_posts_outcome_and_tolerates_empty_body() {
    let h = harness();
    h.transport.status(Method::Post, "/settlement/settle", 200, "");

    let value = block_on(h.api.settle_market(SettleMarketRequest { market_id: 4, outcome: MarketOutcome::Void }))
        .expect("settle");

    assert_eq!(value, serde_json::Value::Null);
    assert_eq!(
        h.transport.sent()[0].body,
        RequestBody::Json(json!({"marketId": 4, "outcome": "VOID"}))
    );
}

#[test]
fn malformed_success_body_is_decode_error() {
    let h = harness();
    h.transport.status(Method::Get, "/markets", 200, "<html>");
    assert!(matches!(block_on(h.api.markets()), Err(ApiError::Decode(_))));
}

#[test]
fn sign_in_is_anonymous_and_exempt_from_interception() {
    let h = harness_at("/markets");
    h.store.set(TOKEN_KEY, "current");
    h.transport.status(Method::Post, "/users/signin", 401, r#"{"message":"Invalid email or password"}"#);

    let err = block_on(h.api.sign_in("a@b.c", "nope")).expect_err("401");

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(h.transport.sent()[0].header("Authorization"), None);
    assert_eq!(h.store.get(TOKEN_KEY).as_deref(), Some("current"));
    assert!(h.navigator.redirects().is_empty());
}

#[test]
fn list_users_and_orders_read_the_collections() {
    let h = harness();
    h.store.set(TOKEN_KEY, "admin-tok");
    h.transport.ok(Method::Get, "/users", json!([user_json(1, "alice"), user_json(2, "bob")]));
    h.transport.ok(
        Method::Get,
        "/orders",
        json!([{
            "id": 9, "userId": 2, "marketId": 4, "side": "NO", "stakeAmount": 5.0,
            "odds": 2.5, "potentialPayout": 12.5, "status": "OPEN"
        }]),
    );

    let users = block_on(h.api.list_users()).expect("users");
    let orders = block_on(h.api.orders()).expect("orders");

    assert_eq!(users.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(), ["alice", "bob"]);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, OrderSide::No);
    assert_eq!(h.transport.count(Method::Get, "/users"), 1);
    assert!(h.transport.sent().iter().all(|r| r.header("authorization") == Some("Bearer admin-tok")));
}

#[test]
fn claim_reward_posts_type_and_amount() {
    let h = harness();
    h.transport.ok(
        Method::Post,
        "/lll/rewards/claim",
        json!({"transactionSignature": "sig", "rewardAmount": 5.0, "rewardType": "STAKING", "status": "SUCCESS"}),
    );
    let request =
        ClaimRewardRequest { wallet_address: "W1".to_owned(), amount: 5.0, reward_type: "STAKING".to_owned() };

    let reward = block_on(h.api.claim_reward(&request)).expect("claim");

    assert_eq!(reward.reward_amount, Some(5.0));
    assert_eq!(
        h.transport.sent()[0].body,
        RequestBody::Json(json!({"walletAddress": "W1", "amount": 5.0, "rewardType": "STAKING"}))
    );
}
