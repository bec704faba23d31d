//! Top navigation with account balance and sign-in controls.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::wallet_button::WalletButton;
use crate::state::auth::AuthState;
use crate::state::services::use_services;
use crate::util::format;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();

    let on_sign_out = move |_| {
        let services = services.get_value();
        services.sessions.sign_out();
        services.wallet.disconnect();
        auth.set(AuthState::restored(None));
    };

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar__brand">"LL&L Futures"</A>
            <div class="navbar__links">
                <A href="/markets">"Markets"</A>
                <Show when=move || auth.get().is_signed_in()>
                    <A href="/positions">"Positions"</A>
                    <A href="/wallet">"Wallet"</A>
                    <A href="/create">"Create"</A>
                </Show>
                <A href="/staking">"Staking"</A>
                <Show when=move || auth.get().is_admin()>
                    <A href="/admin">"Admin"</A>
                </Show>
            </div>
            <span class="navbar__spacer"></span>
            <WalletButton/>
            <Show
                when=move || auth.get().is_signed_in()
                fallback=|| {
                    view! {
                        <A href="/signin" attr:class="btn">"Sign In"</A>
                        <A href="/signup" attr:class="btn btn--primary">"Sign Up"</A>
                    }
                }
            >
                <span class="navbar__balance">{move || format::lll(auth.get().token_balance())}</span>
                <A href="/profile" attr:class="navbar__user">
                    {move || auth.get().session.map(|s| s.username).unwrap_or_default()}
                </A>
                <button class="btn" on:click=on_sign_out>"Sign Out"</button>
            </Show>
        </nav>
    }
}
