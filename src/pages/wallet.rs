//! Account wallet: token balance, deposit address, deposit check and
//! withdrawal to an external wallet.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use platform::validation;

use crate::state::auth::AuthState;
use crate::state::services::{api_failure, session_failure, sync_auth, use_services};
use crate::util::auth::install_unauth_redirect;
use crate::util::format;

#[component]
pub fn WalletPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    install_unauth_redirect(auth, use_navigate());

    let deposit_address = RwSignal::new(None::<String>);
    let message = RwSignal::new(None::<String>);
    let destination = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            return;
        };
        if deposit_address.get_untracked().is_some() {
            return;
        }
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.deposit_address(user_id).await {
                Ok(addr) => deposit_address.set(Some(addr.wallet_address)),
                Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
            }
        });
    });

    let refresh_balance = move || {
        let svc = services.get_value();
        async move {
            match svc.sessions.refresh().await {
                Ok(_) => sync_auth(&svc, auth),
                Err(e) => message.set(Some(session_failure(&svc, auth, &e))),
            }
        }
    };

    let on_check = move |_| {
        let Some(user_id) = auth.get_untracked().user_id() else {
            return;
        };
        busy.set(true);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.check_deposit(user_id).await {
                Ok(check) if check.has_deposit => {
                    message.set(Some(check.message.unwrap_or_else(|| "Deposit credited".to_owned())));
                    refresh_balance().await;
                }
                Ok(check) => message.set(Some(check.message.unwrap_or_else(|| "No new deposits found".to_owned()))),
                Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    let on_withdraw = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let state = auth.get_untracked();
        let Some(user_id) = state.user_id() else {
            return;
        };
        let dest = destination.get().trim().to_owned();
        let value = match validation::parse_amount(&amount.get())
            .and_then(|a| validation::check_withdrawal(a, state.token_balance(), &dest).map(|()| a))
        {
            Ok(v) => v,
            Err(e) => {
                message.set(Some(e.to_string()));
                return;
            }
        };
        busy.set(true);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.withdraw(user_id, &dest, value).await {
                Ok(resp) if resp.success => {
                    message.set(Some(resp.message.unwrap_or_else(|| format!("Withdrew {}", format::lll(value)))));
                    amount.set(String::new());
                    refresh_balance().await;
                }
                Ok(resp) => message.set(Some(resp.message.unwrap_or_else(|| "Withdrawal failed".to_owned()))),
                Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="wallet-page">
            <h1>"Wallet"</h1>
            <section class="wallet-page__balance">
                <h2>{move || format::lll(auth.get().token_balance())}</h2>
                <p>"Available for betting"</p>
            </section>
            <section class="wallet-page__deposit">
                <h3>"Deposit"</h3>
                <p>"Send LLL tokens to your deposit address:"</p>
                <code>{move || deposit_address.get().unwrap_or_else(|| "Loading...".to_owned())}</code>
                <button class="btn" on:click=on_check disabled=move || busy.get()>"Check for deposits"</button>
            </section>
            <section class="wallet-page__withdraw">
                <h3>"Withdraw"</h3>
                <form on:submit=on_withdraw>
                    <input
                        type="text"
                        placeholder="Destination wallet address"
                        prop:value=move || destination.get()
                        on:input=move |ev| destination.set(event_target_value(&ev))
                    />
                    <input
                        type="number"
                        min="0"
                        step="0.01"
                        placeholder="Amount (LLL)"
                        prop:value=move || amount.get()
                        on:input=move |ev| amount.set(event_target_value(&ev))
                    />
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>"Withdraw"</button>
                </form>
            </section>
            <Show when=move || message.get().is_some()>
                <p class="wallet-page__message">{move || message.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
