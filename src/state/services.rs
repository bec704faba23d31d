//! The `platform` objects behind the views.
//!
//! DESIGN
//! ======
//! `ApiClient`, `SessionStore` and `WalletContext` share `Rc` state and are
//! not `Send`, so they live in a thread-local `StoredValue` and are cloned
//! out per event handler. Clones share state.

use leptos::prelude::*;
use platform::{ApiClient, ApiConfig, ApiError, SessionError, SessionStore, WalletContext};

use crate::net::browser::{BrowserNavigator, BrowserStorage, FetchTransport, WebApi, WebSession, WebWallet};
use crate::state::auth::AuthState;

#[derive(Clone)]
pub struct Services {
    pub api: WebApi,
    pub sessions: WebSession,
    pub wallet: WebWallet,
}

impl Services {
    pub fn new(config: ApiConfig) -> Self {
        let transport = FetchTransport::new(config.timeout());
        let api = ApiClient::new(config, transport, BrowserStorage, BrowserNavigator);
        let sessions = SessionStore::new(api.clone());
        let wallet = WalletContext::new(api.clone());
        Self { api, sessions, wallet }
    }
}

pub type ServicesHandle = StoredValue<Services, LocalStorage>;

pub fn provide_services(services: Services) -> ServicesHandle {
    let handle = StoredValue::new_local(services);
    provide_context(handle);
    handle
}

/// Handle to the provided [`Services`]. Grab it while building the view and
/// call `get_value()` inside event handlers and tasks.
pub fn use_services() -> ServicesHandle {
    expect_context::<ServicesHandle>()
}

/// Re-read the session store into the auth signal.
pub fn sync_auth(services: &Services, auth: RwSignal<AuthState>) {
    auth.set(AuthState::restored(services.sessions.current()));
}

/// Inline message for a failed request. An authorization failure has already
/// cleared credentials, so the auth signal is resynced too.
pub fn api_failure(services: &Services, auth: RwSignal<AuthState>, err: &ApiError) -> String {
    if matches!(err, ApiError::Unauthorized) {
        sync_auth(services, auth);
    }
    err.user_message()
}

pub fn session_failure(services: &Services, auth: RwSignal<AuthState>, err: &SessionError) -> String {
    match err {
        SessionError::Api(api) => api_failure(services, auth, api),
        other => other.to_string(),
    }
}
