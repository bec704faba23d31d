//! Market summary card with an optional inline bet form.
//!
//! ERROR HANDLING
//! ==============
//! Bet input is validated against the signed-in balance before the order is
//! sent; validation and request failures render inline under the form.

use leptos::prelude::*;
use platform::types::{Market, OrderSide, PlaceOrderRequest};
use platform::validation;

use crate::state::auth::AuthState;
use crate::state::services::{api_failure, session_failure, sync_auth, use_services};
use crate::util::format;

#[component]
pub fn MarketCard(
    market: Market,
    #[prop(optional)] with_bet: bool,
    #[prop(optional)] on_placed: Option<Callback<()>>,
) -> impl IntoView {
    let share = format::yes_share(market.total_yes_stake, market.total_no_stake);
    let expires = format::date(&market.expiry_date).to_owned();

    view! {
        <div class="market-card">
            <h3 class="market-card__title">{market.title.clone()}</h3>
            {market.description.clone().map(|d| view! { <p class="market-card__description">{d}</p> })}
            <div class="market-card__odds">
                <span class="market-card__yes">"YES " {format::odds(market.yes_odds)}</span>
                <span class="market-card__no">"NO " {format::odds(market.no_odds)}</span>
            </div>
            <div class="market-card__meta">
                <span>"Volume: " {format::lll(market.total_volume)}</span>
                <span>"Expires: " {expires}</span>
                {share.map(|pct| view! { <span>{format!("{pct:.0}% YES")}</span> })}
            </div>
            {with_bet.then(|| view! { <BetForm market=market.clone() on_placed=on_placed/> })}
        </div>
    }
}

#[component]
fn BetForm(market: Market, on_placed: Option<Callback<()>>) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let side = RwSignal::new(OrderSide::Yes);
    let amount = RwSignal::new(String::new());
    let message = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let market_id = market.id;
    let yes_odds = market.yes_odds;
    let no_odds = market.no_odds;
    let odds = move || if side.get() == OrderSide::Yes { yes_odds } else { no_odds };
    let payout = move || {
        validation::parse_amount(&amount.get())
            .map(|a| format::lll(validation::potential_payout(a, odds())))
            .unwrap_or_default()
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let state = auth.get();
        let Some(session) = state.session else {
            message.set(Some("Please sign in to place bets".to_owned()));
            return;
        };
        let stake = match validation::parse_amount(&amount.get())
            .and_then(|a| validation::check_bet(a, session.token_balance).map(|()| a))
        {
            Ok(stake) => stake,
            Err(e) => {
                message.set(Some(e.to_string()));
                return;
            }
        };
        let request = PlaceOrderRequest {
            user_id: session.user_id,
            wallet_address: session.wallet_address.clone().unwrap_or_default(),
            market_id,
            side: side.get(),
            stake_amount: stake,
        };
        busy.set(true);
        message.set(None);
        let services = services.get_value();
        leptos::task::spawn_local(async move {
            match services.api.place_order(&request).await {
                Ok(order) => {
                    message.set(Some(format!(
                        "Bet placed! Potential payout: {}",
                        format::lll(order.potential_payout)
                    )));
                    amount.set(String::new());
                    match services.sessions.refresh().await {
                        Ok(_) => sync_auth(&services, auth),
                        Err(e) => log::warn!("balance refresh failed: {}", session_failure(&services, auth, &e)),
                    }
                    if let Some(cb) = on_placed {
                        cb.run(());
                    }
                }
                Err(e) => message.set(Some(api_failure(&services, auth, &e))),
            }
            busy.set(false);
        });
    };

    view! {
        <form class="bet-form" on:submit=on_submit>
            <div class="bet-form__sides">
                <button
                    type="button"
                    class=move || if side.get() == OrderSide::Yes { "btn btn--yes active" } else { "btn btn--yes" }
                    on:click=move |_| side.set(OrderSide::Yes)
                >
                    "YES"
                </button>
                <button
                    type="button"
                    class=move || if side.get() == OrderSide::No { "btn btn--no active" } else { "btn btn--no" }
                    on:click=move |_| side.set(OrderSide::No)
                >
                    "NO"
                </button>
            </div>
            <input
                class="bet-form__amount"
                type="number"
                min="0"
                step="0.01"
                placeholder="Amount (LLL)"
                prop:value=move || amount.get()
                on:input=move |ev| amount.set(event_target_value(&ev))
            />
            <Show when=move || !payout().is_empty()>
                <p class="bet-form__payout">"Potential payout: " {payout}</p>
            </Show>
            <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Placing..." } else { "Place Bet" }}
            </button>
            <Show when=move || message.get().is_some()>
                <p class="bet-form__message">{move || message.get().unwrap_or_default()}</p>
            </Show>
        </form>
    }
}
