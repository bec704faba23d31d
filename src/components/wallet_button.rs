//! Connect/disconnect control for the demo wallet.

use leptos::prelude::*;
use platform::WalletState;

use crate::state::services::use_services;
use crate::util::format;

#[component]
pub fn WalletButton() -> impl IntoView {
    let wallet = expect_context::<RwSignal<WalletState>>();

    let services = use_services();

    let on_connect = move |_| {
        let services = services.get_value();
        leptos::task::spawn_local(async move {
            services.wallet.connect(None).await;
        });
    };
    let on_disconnect = move |_| services.get_value().wallet.disconnect();

    view! {
        <Show
            when=move || wallet.get().connected
            fallback=move || {
                view! {
                    <button class="btn wallet-button" on:click=on_connect disabled=move || wallet.get().loading>
                        {move || if wallet.get().loading { "Connecting..." } else { "Connect Wallet" }}
                    </button>
                }
            }
        >
            <span class="wallet-button__address">
                {move || wallet.get().address.as_deref().map(format::short_address).unwrap_or_default()}
            </span>
            <button class="btn wallet-button" on:click=on_disconnect>"Disconnect"</button>
        </Show>
    }
}
