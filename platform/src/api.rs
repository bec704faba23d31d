//! REST client with bearer-token injection and global 401 handling.
//!
//! Requests pick up the persisted token as an `Authorization: Bearer` header;
//! sign-in and sign-up go out without one. A 401 response to a credentialed
//! request clears both credential entries and sends the user
//! to the sign-in view, unless they are already on sign-in or sign-up. All
//! other failures pass through to the caller unchanged.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here panics; every endpoint returns `Result<_, ApiError>` so views
//! can render an inline message and leave the action retryable.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::storage::{self, KeyValueStore};
use crate::transport::{FormPart, HttpRequest, HttpResponse, Method, Transport};
use crate::types::{
    AuthResponse, ClaimRewardRequest, CreateMarketRequest, DepositAddress, DepositCheck, Market, Order,
    PlaceOrderRequest, ProfileUpdate, RewardResponse, Session, SettleMarketRequest, SignInRequest, SignupRequest,
    SignupResponse, StakeRequest, StakingInfo, StakingResponse, TokenBalance, UploadResponse, WithdrawResponse,
};

/// Route of the sign-in view.
pub const SIGN_IN_PATH: &str = "/signin";

/// Route of the sign-up view.
pub const SIGN_UP_PATH: &str = "/signup";

/// Folder used for profile image uploads.
pub const PROFILE_UPLOAD_FOLDER: &str = "profiles";

/// Where the user currently is, and how to move them.
pub trait Navigator {
    fn current_path(&self) -> String;
    fn redirect(&self, path: &str);
}

/// Whether `path` is the sign-in or sign-up view.
#[must_use]
pub fn is_auth_route(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    trimmed == SIGN_IN_PATH || trimmed == SIGN_UP_PATH
}

/// Map a stored profile-picture path to a loadable URL.
///
/// Uploaded files come back as `/uploads/<folder>/<name>` and are served from
/// `{base}/files/serve/uploads/...`. Absolute URLs pass through.
#[must_use]
pub fn resolve_media_url(config: &ApiConfig, path: &str) -> String {
    if path.is_empty() || path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    match path.strip_prefix("/uploads/") {
        Some(rest) => format!("{}/files/serve/uploads/{rest}", config.base_url()),
        None => path.to_owned(),
    }
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                return text.to_owned();
            }
        }
    }
    trimmed.to_owned()
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    let body = body.trim();
    let body = if body.is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

/// Which credential a request carries.
#[derive(Clone, Copy)]
enum Auth<'a> {
    /// The persisted token; a 401 triggers the global sign-out.
    Stored,
    /// No credential; used by sign-in and sign-up so a rejected attempt
    /// leaves the current session alone.
    Anonymous,
    /// A candidate token not yet adopted; a 401 is reported only.
    Bearer(&'a str),
}

struct Inner<T, S, N> {
    config: ApiConfig,
    transport: T,
    store: S,
    navigator: N,
}

/// Shared API client. Clones share transport, store and navigator.
pub struct ApiClient<T, S, N> {
    inner: Rc<Inner<T, S, N>>,
}

impl<T, S, N> Clone for ApiClient<T, S, N> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T, S, N> ApiClient<T, S, N>
where
    T: Transport,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(config: ApiConfig, transport: T, store: S, navigator: N) -> Self {
        Self { inner: Rc::new(Inner { config, transport, store, navigator }) }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &S {
        &self.inner.store
    }

    pub fn navigator(&self) -> &N {
        &self.inner.navigator
    }

    /// The persisted bearer token, if any.
    pub fn token(&self) -> Option<String> {
        storage::load_token(&self.inner.store)
    }

    fn request(&self, method: Method, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.inner.config.url(path))
    }

    async fn execute(&self, mut request: HttpRequest, auth: Auth<'_>) -> Result<HttpResponse, ApiError> {
        let token = match auth {
            Auth::Stored => self.token(),
            Auth::Anonymous => None,
            Auth::Bearer(token) => Some(token.to_owned()),
        };
        if let Some(token) = token {
            request.set_header("Authorization", format!("Bearer {token}"));
        }

        let method = request.method;
        let url = request.url.clone();
        log::debug!("{} {url}", method.as_str());
        let response = self.inner.transport.send(request).await.inspect_err(|e| {
            log::warn!("{} {url} failed: {e}", method.as_str());
        })?;

        if response.status == 401 {
            if matches!(auth, Auth::Stored) {
                self.handle_unauthorized();
            }
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            return Err(ApiError::Status { status: response.status, message: error_message(&response.body) });
        }
        Ok(response)
    }

    /// Clear credentials and move to sign-in unless already on an auth view.
    fn handle_unauthorized(&self) {
        storage::clear_credentials(&self.inner.store);
        let path = self.inner.navigator.current_path();
        if is_auth_route(&path) {
            log::info!("401 on {path}; credentials cleared, staying put");
        } else {
            log::warn!("401 on {path}; credentials cleared, redirecting to {SIGN_IN_PATH}");
            self.inner.navigator.redirect(SIGN_IN_PATH);
        }
    }

    async fn fetch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        let response = self.execute(request, Auth::Stored).await?;
        decode(&response.body)
    }

    async fn post_anonymous<R: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<R, ApiError> {
        let response = self.execute(self.request(Method::Post, path).json(body), Auth::Anonymous).await?;
        decode(&response.body)
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.fetch(self.request(Method::Get, path)).await
    }

    async fn post<R: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<R, ApiError> {
        self.fetch(self.request(Method::Post, path).json(body)).await
    }

    async fn put<R: DeserializeOwned>(&self, path: &str, body: Option<serde_json::Value>) -> Result<R, ApiError> {
        let mut request = self.request(Method::Put, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.fetch(request).await
    }

    // ---- health ----------------------------------------------------------

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/health").await
    }

    // ---- users -----------------------------------------------------------

    /// `POST /users/signin`. Sent without credentials and exempt from the
    /// global 401 handling.
    ///
    /// # Errors
    ///
    /// Rejected credentials surface as `Status` (or `Unauthorized`).
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = SignInRequest { email: email.to_owned(), password: password.to_owned() };
        self.post_anonymous("/users/signin", serde_json::to_value(body)?).await
    }

    /// `POST /users/signup`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn sign_up(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.post_anonymous("/users/signup", serde_json::to_value(request)?).await
    }

    /// `GET /users`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn list_users(&self) -> Result<Vec<Session>, ApiError> {
        self.get("/users").await
    }

    /// `GET /users/{id}`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn user(&self, user_id: i64) -> Result<Session, ApiError> {
        self.get(&format!("/users/{user_id}")).await
    }

    /// Fetch a user record with an explicit, not-yet-adopted token.
    ///
    /// Looks the user up by id when known, else by username. A 401 here is
    /// returned without clearing stored credentials.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn user_with_token(
        &self,
        token: &str,
        user_id: Option<i64>,
        username: &str,
    ) -> Result<Session, ApiError> {
        let path = match user_id {
            Some(id) => format!("/users/{id}"),
            None => format!("/users/username/{username}"),
        };
        let response = self.execute(self.request(Method::Get, &path), Auth::Bearer(token)).await?;
        decode(&response.body)
    }

    /// `PUT /users/{id}` with a partial profile.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn update_user(&self, user_id: i64, update: &ProfileUpdate) -> Result<Session, ApiError> {
        self.put(&format!("/users/{user_id}"), Some(serde_json::to_value(update)?)).await
    }

    /// `POST /users/{id}/withdraw?phantomWallet=..&amount=..`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure; the server reports business failures
    /// (bad address, insufficient balance) as 400 with a message.
    pub async fn withdraw(&self, user_id: i64, destination: &str, amount: f64) -> Result<WithdrawResponse, ApiError> {
        let request = self
            .request(Method::Post, &format!("/users/{user_id}/withdraw"))
            .query("phantomWallet", destination)
            .query("amount", amount);
        self.fetch(request).await
    }

    /// `GET /users/{id}/deposit-address`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn deposit_address(&self, user_id: i64) -> Result<DepositAddress, ApiError> {
        self.get(&format!("/users/{user_id}/deposit-address")).await
    }

    /// `POST /users/{id}/check-deposit`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn check_deposit(&self, user_id: i64) -> Result<DepositCheck, ApiError> {
        self.fetch(self.request(Method::Post, &format!("/users/{user_id}/check-deposit"))).await
    }

    // ---- markets ---------------------------------------------------------

    /// `GET /markets`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn markets(&self) -> Result<Vec<Market>, ApiError> {
        self.get("/markets").await
    }

    /// `GET /markets/active`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn active_markets(&self) -> Result<Vec<Market>, ApiError> {
        self.get("/markets/active").await
    }

    /// `GET /markets/{id}`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn market(&self, market_id: i64) -> Result<Market, ApiError> {
        self.get(&format!("/markets/{market_id}")).await
    }

    /// `POST /markets`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn create_market(&self, request: &CreateMarketRequest) -> Result<Market, ApiError> {
        self.post("/markets", serde_json::to_value(request)?).await
    }

    /// `PUT /markets/{id}/close`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn close_market(&self, market_id: i64) -> Result<Market, ApiError> {
        self.put(&format!("/markets/{market_id}/close"), None).await
    }

    /// `POST /settlement/settle`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn settle_market(&self, request: SettleMarketRequest) -> Result<serde_json::Value, ApiError> {
        self.post("/settlement/settle", serde_json::to_value(request)?).await
    }

    // ---- orders ----------------------------------------------------------

    /// `GET /orders`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/orders").await
    }

    /// `GET /orders/user/{id}`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn user_orders(&self, user_id: i64) -> Result<Vec<Order>, ApiError> {
        self.get(&format!("/orders/user/{user_id}")).await
    }

    /// `GET /orders/user/{id}/open`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn user_open_orders(&self, user_id: i64) -> Result<Vec<Order>, ApiError> {
        self.get(&format!("/orders/user/{user_id}/open")).await
    }

    /// `POST /orders`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<Order, ApiError> {
        self.post("/orders", serde_json::to_value(request)?).await
    }

    // ---- files -----------------------------------------------------------

    /// `POST /files/upload` as multipart with `file` and `folder` parts.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        folder: &str,
    ) -> Result<UploadResponse, ApiError> {
        let parts = vec![
            FormPart::File {
                name: "file".to_owned(),
                file_name: file_name.to_owned(),
                content_type: content_type.to_owned(),
                bytes,
            },
            FormPart::Text { name: "folder".to_owned(), value: folder.to_owned() },
        ];
        self.fetch(self.request(Method::Post, "/files/upload").multipart(parts)).await
    }

    // ---- mock token ledger ----------------------------------------------

    /// `GET /lll/balance/{address}`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn token_balance(&self, address: &str) -> Result<TokenBalance, ApiError> {
        self.get(&format!("/lll/balance/{address}")).await
    }

    /// `GET /lll/staking/{address}`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn staking_info(&self, address: &str) -> Result<StakingInfo, ApiError> {
        self.get(&format!("/lll/staking/{address}")).await
    }

    /// `POST /lll/stake`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn stake(&self, address: &str, amount: f64) -> Result<StakingResponse, ApiError> {
        let body = StakeRequest { wallet_address: address.to_owned(), amount };
        self.post("/lll/stake", serde_json::to_value(body)?).await
    }

    /// `POST /lll/unstake`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn unstake(&self, address: &str, amount: f64) -> Result<StakingResponse, ApiError> {
        let body = StakeRequest { wallet_address: address.to_owned(), amount };
        self.post("/lll/unstake", serde_json::to_value(body)?).await
    }

    /// `POST /lll/rewards/claim`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure.
    pub async fn claim_reward(&self, request: &ClaimRewardRequest) -> Result<RewardResponse, ApiError> {
        self.post("/lll/rewards/claim", serde_json::to_value(request)?).await
    }

    /// `POST /lll/rewards/daily-login`.
    ///
    /// # Errors
    ///
    /// Any transport or status failure, including "already claimed today".
    pub async fn daily_login(&self, address: &str) -> Result<RewardResponse, ApiError> {
        self.post("/lll/rewards/daily-login", json!({ "walletAddress": address })).await
    }
}
