//! Stake/unstake form and balance summary for the connected wallet.

use leptos::prelude::*;
use platform::{STAKING_APY, WalletError, WalletState, validation};

use crate::state::services::use_services;
use crate::util::format;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Stake,
    Unstake,
}

fn wallet_message(err: &WalletError) -> String {
    match err {
        WalletError::Api(api) => api.user_message(),
        other => other.to_string(),
    }
}

#[component]
pub fn StakingPanel() -> impl IntoView {
    let wallet = expect_context::<RwSignal<WalletState>>();
    let services = use_services();
    let action = RwSignal::new(Action::Stake);
    let amount = RwSignal::new(String::new());
    let message = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let snapshot_value = move |pick: fn(&platform::WalletSnapshot) -> f64| {
        wallet.get().snapshot.as_ref().map_or(0.0, pick)
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let value = match validation::parse_amount(&amount.get()) {
            Ok(v) => v,
            Err(e) => {
                message.set(Some(e.to_string()));
                return;
            }
        };
        let which = action.get();
        busy.set(true);
        message.set(None);
        let services = services.get_value();
        leptos::task::spawn_local(async move {
            let result = match which {
                Action::Stake => services.wallet.stake(value).await,
                Action::Unstake => services.wallet.unstake(value).await,
            };
            match result {
                Ok(_) => {
                    let verb = if which == Action::Stake { "Staked" } else { "Unstaked" };
                    message.set(Some(format!("{verb} {}", format::lll(value))));
                    amount.set(String::new());
                }
                Err(e) => message.set(Some(wallet_message(&e))),
            }
            busy.set(false);
        });
    };

    let on_claim = move |_| {
        let services = services.get_value();
        leptos::task::spawn_local(async move {
            match services.wallet.claim_daily_login().await {
                Ok(reward) => message.set(Some(format!(
                    "Daily reward claimed: {}",
                    format::lll(reward.reward_amount.unwrap_or_default())
                ))),
                Err(e) => message.set(Some(wallet_message(&e))),
            }
        });
    };

    view! {
        <div class="staking-panel">
            <div class="staking-panel__stats">
                <div>"Wallet balance: " {move || format::lll(snapshot_value(|s| s.lll_balance))}</div>
                <div>"Staked: " {move || format::lll(snapshot_value(|s| s.staked_amount))}</div>
                <div>"Total earned: " {move || format::lll(snapshot_value(|s| s.total_earned))}</div>
                <div>"APY: " {format::percent(STAKING_APY)}</div>
                <div>
                    "Estimated annual reward: "
                    {move || format::lll(snapshot_value(platform::WalletSnapshot::estimated_annual_reward))}
                </div>
            </div>
            <div class="staking-panel__tabs">
                <button
                    class=move || if action.get() == Action::Stake { "tab active" } else { "tab" }
                    on:click=move |_| action.set(Action::Stake)
                >
                    "Stake"
                </button>
                <button
                    class=move || if action.get() == Action::Unstake { "tab active" } else { "tab" }
                    on:click=move |_| action.set(Action::Unstake)
                >
                    "Unstake"
                </button>
            </div>
            <form class="staking-panel__form" on:submit=on_submit>
                <input
                    type="number"
                    min="0"
                    step="0.01"
                    placeholder="Amount (LLL)"
                    prop:value=move || amount.get()
                    on:input=move |ev| amount.set(event_target_value(&ev))
                />
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    {move || match action.get() {
                        Action::Stake => "Stake",
                        Action::Unstake => "Unstake",
                    }}
                </button>
            </form>
            <button class="btn" on:click=on_claim>"Claim daily login reward"</button>
            <Show when=move || message.get().is_some()>
                <p class="staking-panel__message">{move || message.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
