//! Client-side state orchestration for the LL&L Futures platform.
//!
//! This crate owns everything the web client and the CLI share: the wire
//! model, the bearer-token API client, the session store, the demo wallet
//! context and the backend readiness gate. It has no browser or runtime
//! dependency; hosts plug in their own [`Transport`], [`KeyValueStore`],
//! [`Navigator`] and [`Timer`].
//!
//! CONCURRENCY
//! ===========
//! All state is single-threaded (`Rc`/`RefCell`). Operations suspend only at
//! network calls, and whichever response settles last wins.

pub mod api;
pub mod config;
pub mod error;
pub mod jwt;
pub mod readiness;
pub mod session;
pub mod storage;
pub mod transport;
pub mod types;
pub mod validation;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, Navigator, SIGN_IN_PATH, SIGN_UP_PATH};
pub use config::ApiConfig;
pub use error::{ApiError, SessionError, ValidationError, WalletError};
pub use readiness::{GateHandle, GateOutcome, ReadinessGate, ReadinessPolicy, ReadinessState, Timer};
pub use session::SessionStore;
pub use storage::{KeyValueStore, MemoryStore, SESSION_KEY, TOKEN_KEY};
pub use transport::{FormPart, HttpRequest, HttpResponse, Method, RequestBody, Transport};
pub use validation::{MarketDraft, PositionFilter};
pub use wallet::{DEMO_WALLETS, STAKING_APY, WalletContext, WalletSnapshot, WalletState};
