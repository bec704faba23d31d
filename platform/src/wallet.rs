//! Demo wallet context: a connected pseudo-wallet address and its cached
//! token and staking balances.
//!
//! SYSTEM CONTEXT
//! ==============
//! Independent of the session. The snapshot is keyed by the connected
//! address, lives only in memory and is rebuilt by refetching whenever the
//! address changes or a refresh is requested.
//!
//! CONCURRENCY
//! ===========
//! Overlapping refreshes for the same address are all applied; the one that
//! settles last wins. A refresh that settles after the address changed is
//! dropped so a disconnected wallet never repopulates.
//!
//! ERROR HANDLING
//! ==============
//! Refresh never fails: errors are logged and the prior snapshot stays.
//! Actions (stake, unstake, daily reward) validate first and return
//! [`WalletError`].

#[cfg(test)]
#[path = "wallet_test.rs"]
mod wallet_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::api::{ApiClient, Navigator};
use crate::error::WalletError;
use crate::storage::KeyValueStore;
use crate::transport::Transport;
use crate::types::{RewardResponse, StakingInfo, StakingResponse, TokenBalance};
use crate::validation;

/// Addresses handed out when `connect` is called without one.
pub const DEMO_WALLETS: [&str; 4] = [
    "DemoWallet1ABC123456789",
    "DemoWallet2DEF987654321",
    "DemoWallet3GHI456789123",
    "DemoWallet4JKL789123456",
];

/// Annual staking yield.
pub const STAKING_APY: f64 = 0.10;

/// Balances for one address, merged from the balance and staking endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct WalletSnapshot {
    pub address: String,
    pub lll_balance: f64,
    pub staked_amount: f64,
    pub total_earned: f64,
}

impl WalletSnapshot {
    fn merge(address: &str, balance: &TokenBalance, staking: &StakingInfo) -> Self {
        Self {
            address: address.to_owned(),
            lll_balance: balance.lll_balance,
            staked_amount: staking.staked_amount,
            total_earned: staking.total_earned.max(balance.total_earned),
        }
    }

    #[must_use]
    pub fn estimated_annual_reward(&self) -> f64 {
        self.staked_amount * STAKING_APY
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalletState {
    pub connected: bool,
    pub address: Option<String>,
    pub snapshot: Option<WalletSnapshot>,
    /// A connect is waiting on its first refresh.
    pub loading: bool,
}

type Observer = Rc<dyn Fn(&WalletState)>;

/// Shared wallet state. Clones share state and observer.
pub struct WalletContext<T, S, N> {
    api: ApiClient<T, S, N>,
    state: Rc<RefCell<WalletState>>,
    next_demo: Rc<Cell<usize>>,
    /// Bumped by every `connect`; only the latest one clears `loading`.
    connects: Rc<Cell<u64>>,
    observer: Rc<RefCell<Option<Observer>>>,
}

impl<T, S, N> Clone for WalletContext<T, S, N> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: Rc::clone(&self.state),
            next_demo: Rc::clone(&self.next_demo),
            connects: Rc::clone(&self.connects),
            observer: Rc::clone(&self.observer),
        }
    }
}

impl<T, S, N> WalletContext<T, S, N>
where
    T: Transport,
    S: KeyValueStore,
    N: Navigator,
{
    pub fn new(api: ApiClient<T, S, N>) -> Self {
        Self {
            api,
            state: Rc::default(),
            next_demo: Rc::default(),
            connects: Rc::default(),
            observer: Rc::default(),
        }
    }

    /// Call `observer` after every state change.
    pub fn set_observer(&self, observer: impl Fn(&WalletState) + 'static) {
        self.observer.replace(Some(Rc::new(observer)));
    }

    pub fn state(&self) -> WalletState {
        self.state.borrow().clone()
    }

    pub fn address(&self) -> Option<String> {
        self.state.borrow().address.clone()
    }

    pub fn snapshot(&self) -> Option<WalletSnapshot> {
        self.state.borrow().snapshot.clone()
    }

    fn notify(&self) {
        let state = self.state();
        let observer = self.observer.borrow().clone();
        if let Some(observer) = observer {
            observer(&state);
        }
    }

    fn next_demo_address(&self) -> String {
        let index = self.next_demo.get();
        self.next_demo.set((index + 1) % DEMO_WALLETS.len());
        DEMO_WALLETS[index].to_owned()
    }

    /// Connect `address`, or the next demo wallet, and load its balances.
    ///
    /// Connecting to a different address drops the old snapshot at once.
    /// `loading` stays set until the most recent connect's refresh settles.
    /// Returns the connected address.
    pub async fn connect(&self, address: Option<&str>) -> String {
        let address = match address.map(str::trim) {
            Some(a) if !a.is_empty() => a.to_owned(),
            _ => self.next_demo_address(),
        };
        let seq = self.connects.get() + 1;
        self.connects.set(seq);
        {
            let mut state = self.state.borrow_mut();
            if state.address.as_deref() != Some(address.as_str()) {
                state.snapshot = None;
            }
            state.connected = true;
            state.address = Some(address.clone());
            state.loading = true;
        }
        log::info!("wallet connected: {address}");
        self.notify();

        self.refresh().await;

        let still_current = {
            let mut state = self.state.borrow_mut();
            let current = self.connects.get() == seq && state.address.as_deref() == Some(address.as_str());
            if current {
                state.loading = false;
            }
            current
        };
        if still_current {
            self.notify();
        }
        address
    }

    /// Forget the address and balances. Safe to call when disconnected.
    pub fn disconnect(&self) {
        let was_connected = {
            let mut state = self.state.borrow_mut();
            std::mem::take(&mut *state).connected
        };
        if was_connected {
            log::info!("wallet disconnected");
        }
        self.notify();
    }

    /// Refetch balances for the connected address. Never fails; no-op when
    /// disconnected.
    pub async fn refresh(&self) {
        let Some(address) = self.address() else {
            log::debug!("wallet refresh skipped: not connected");
            return;
        };

        let (balance, staking) =
            futures::join!(self.api.token_balance(&address), self.api.staking_info(&address));

        let (balance, staking) = match (balance, staking) {
            (Ok(balance), Ok(staking)) => (balance, staking),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("wallet refresh for {address} failed: {e}");
                return;
            }
        };

        {
            let mut state = self.state.borrow_mut();
            if state.address.as_deref() != Some(address.as_str()) {
                log::debug!("discarding wallet refresh for {address}: address changed");
                return;
            }
            state.snapshot = Some(WalletSnapshot::merge(&address, &balance, &staking));
        }
        self.notify();
    }

    fn connected_address(&self) -> Result<String, WalletError> {
        self.address().ok_or(WalletError::NotConnected)
    }

    /// Move `amount` from the wallet balance into staking.
    ///
    /// # Errors
    ///
    /// Not connected, failed validation, or the request failing.
    pub async fn stake(&self, amount: f64) -> Result<StakingResponse, WalletError> {
        let address = self.connected_address()?;
        let available = self.snapshot().map_or(0.0, |s| s.lll_balance);
        validation::check_stake(amount, available)?;
        let response = self.api.stake(&address, amount).await?;
        log::info!("staked {amount} LLL from {address}");
        self.refresh().await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Not connected, failed validation, or the request failing.
    pub async fn unstake(&self, amount: f64) -> Result<StakingResponse, WalletError> {
        let address = self.connected_address()?;
        let staked = self.snapshot().map_or(0.0, |s| s.staked_amount);
        validation::check_unstake(amount, staked)?;
        let response = self.api.unstake(&address, amount).await?;
        log::info!("unstaked {amount} LLL to {address}");
        self.refresh().await;
        Ok(response)
    }

    /// Claim the daily login reward for the connected wallet.
    ///
    /// # Errors
    ///
    /// Not connected or the request failing.
    pub async fn claim_daily_login(&self) -> Result<RewardResponse, WalletError> {
        let address = self.connected_address()?;
        let response = self.api.daily_login(&address).await?;
        self.refresh().await;
        Ok(response)
    }
}
