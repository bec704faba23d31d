//! Demo wallet connection, staking and portfolio overview.

use leptos::prelude::*;
use platform::{DEMO_WALLETS, WalletState};

use crate::components::staking_panel::StakingPanel;
use crate::state::services::use_services;
use crate::util::format;

#[component]
pub fn StakingPage() -> impl IntoView {
    let wallet = expect_context::<RwSignal<WalletState>>();
    let services = use_services();

    let connect = move |address: Option<&'static str>| {
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            svc.wallet.connect(address).await;
        });
    };
    let on_refresh = move |_| {
        let svc = services.get_value();
        leptos::task::spawn_local(async move { svc.wallet.refresh().await });
    };

    view! {
        <div class="staking-page">
            <h1>"LLL Staking"</h1>
            <Show
                when=move || wallet.get().connected
                fallback=move || {
                    view! {
                        <section class="staking-page__connect">
                            <p>"Connect a demo wallet to stake LLL and earn rewards."</p>
                            <button class="btn btn--primary" on:click=move |_| connect(None)>"Connect Wallet"</button>
                            <ul class="staking-page__demo-list">
                                {DEMO_WALLETS
                                    .into_iter()
                                    .map(|addr| {
                                        view! {
                                            <li>
                                                <button class="btn btn--link" on:click=move |_| connect(Some(addr))>
                                                    {format::short_address(addr)}
                                                </button>
                                            </li>
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </ul>
                        </section>
                    }
                }
            >
                <section class="staking-page__portfolio">
                    <p>"Connected: " <code>{move || wallet.get().address.unwrap_or_default()}</code></p>
                    <Show when=move || wallet.get().loading>
                        <p>"Loading balances..."</p>
                    </Show>
                    <button class="btn" on:click=on_refresh>"Refresh"</button>
                </section>
                <StakingPanel/>
            </Show>
        </div>
    }
}
