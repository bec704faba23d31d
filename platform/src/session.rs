//! Session store: the signed-in identity and its persisted copy.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is created once per page and handed to views as a context
//! object. All mutation goes through the named operations below; nothing else
//! writes the credential keys except the API client's 401 handler.
//!
//! INVARIANTS
//! ==========
//! - Token is the source of truth: without a persisted token there is no
//!   session, whatever the session key holds.
//! - Token and session are written together, token first, before the
//!   operation returns. A failed operation writes nothing.
//! - Restore trusts the cached session without asking the server; the next
//!   401 corrects it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{ApiClient, Navigator};
use crate::error::{ApiError, SessionError};
use crate::jwt;
use crate::storage::{self, KeyValueStore, SESSION_KEY, TOKEN_KEY};
use crate::transport::Transport;
use crate::types::{ProfileUpdate, Session, SignupRequest, SignupResponse};

/// Owner of the current [`Session`]. Clones share state.
pub struct SessionStore<T, S, N> {
    api: ApiClient<T, S, N>,
    current: Rc<RefCell<Option<Session>>>,
}

impl<T, S, N> Clone for SessionStore<T, S, N> {
    fn clone(&self) -> Self {
        Self { api: self.api.clone(), current: Rc::clone(&self.current) }
    }
}

impl<T, S, N> SessionStore<T, S, N>
where
    T: Transport,
    S: KeyValueStore,
    N: Navigator,
{
    /// New store with no identity; call [`Self::restore`] to load the cache.
    pub fn new(api: ApiClient<T, S, N>) -> Self {
        Self { api, current: Rc::new(RefCell::new(None)) }
    }

    pub fn api(&self) -> &ApiClient<T, S, N> {
        &self.api
    }

    /// Adopt the persisted session, if a token backs it.
    ///
    /// A session without a token (or a token without a readable session) is
    /// an inconsistent pair and both entries are cleared.
    pub fn restore(&self) -> Option<Session> {
        let store = self.api.store();
        let token = storage::load_token(store);
        let raw = store.get(SESSION_KEY);

        let restored = match (token, raw) {
            (Some(_), Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("discarding unreadable persisted session: {e}");
                    None
                }
            },
            (None, None) => None,
            _ => {
                log::debug!("persisted credentials incomplete; clearing");
                None
            }
        };

        if restored.is_none() {
            storage::clear_credentials(store);
        }
        self.current.replace(restored.clone());
        restored
    }

    /// The current session. `None` whenever no token is persisted.
    pub fn current(&self) -> Option<Session> {
        if self.api.token().is_none() {
            self.current.replace(None);
            return None;
        }
        self.current.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// The persisted bearer token.
    pub fn token(&self) -> Option<String> {
        self.api.token()
    }

    /// Authenticate with the server and persist the resulting pair.
    ///
    /// # Errors
    ///
    /// Server and transport failures, or [`SessionError::EmptyToken`]. Prior
    /// state is untouched on error.
    pub async fn sign_in(&self, identifier: &str, secret: &str) -> Result<Session, SessionError> {
        let response = self.api.sign_in(identifier.trim(), secret).await?;
        if response.token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let session = self.establish(&response.token, response.user)?;
        log::info!("signed in as {}", session.username);
        Ok(session)
    }

    /// Register a new account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Server and transport failures.
    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> Result<SignupResponse, SessionError> {
        let request = SignupRequest {
            username: username.trim().to_owned(),
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        Ok(self.api.sign_up(&request).await?)
    }

    /// Forget the identity locally. No server call.
    pub fn sign_out(&self) {
        storage::clear_credentials(self.api.store());
        self.current.replace(None);
        log::info!("signed out");
    }

    /// Send a partial profile and adopt the server-confirmed record.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotSignedIn`] without a session (including when the
    /// user signed out while the request was in flight), else server and
    /// transport failures.
    pub async fn update_user(&self, update: &ProfileUpdate) -> Result<Session, SessionError> {
        let current = self.current().ok_or(SessionError::NotSignedIn)?;
        let updated = self.api.update_user(current.user_id, update).await?;
        self.replace_session(updated)
    }

    /// Re-fetch the current user's record (e.g. after a balance change).
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_user`].
    pub async fn refresh(&self) -> Result<Session, SessionError> {
        let current = self.current().ok_or(SessionError::NotSignedIn)?;
        let fresh = self.api.user(current.user_id).await?;
        self.replace_session(fresh)
    }

    /// Adopt a token handed over out of band (OAuth redirect).
    ///
    /// Decodes the subject, fetches the full user record with the candidate
    /// token, and only then persists both.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidToken`] / [`SessionError::EmptyToken`] for a
    /// bad token, else server and transport failures. Nothing is written on
    /// error.
    pub async fn adopt_token(&self, token: &str) -> Result<Session, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let claims = jwt::decode_claims(token)?;
        let user = self.api.user_with_token(token, claims.user_id, &claims.sub).await?;
        let session = self.establish(token, user)?;
        log::info!("adopted token for {}", session.username);
        Ok(session)
    }

    fn establish(&self, token: &str, session: Session) -> Result<Session, SessionError> {
        let raw = serde_json::to_string(&session).map_err(ApiError::from)?;
        let store = self.api.store();
        store.set(TOKEN_KEY, token);
        store.set(SESSION_KEY, &raw);
        self.current.replace(Some(session.clone()));
        Ok(session)
    }

    fn replace_session(&self, session: Session) -> Result<Session, SessionError> {
        if self.api.token().is_none() {
            self.current.replace(None);
            return Err(SessionError::NotSignedIn);
        }
        let raw = serde_json::to_string(&session).map_err(ApiError::from)?;
        self.api.store().set(SESSION_KEY, &raw);
        self.current.replace(Some(session.clone()));
        Ok(session)
    }
}
