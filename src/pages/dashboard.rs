//! Landing page: top active markets and, when signed in, open positions.

use leptos::prelude::*;
use leptos_router::components::A;
use platform::types::{Market, Order};

use crate::components::market_card::MarketCard;
use crate::state::auth::AuthState;
use crate::state::services::{api_failure, use_services};
use crate::util::format;

const FEATURED_MARKETS: usize = 3;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let markets = RwSignal::new(Vec::<Market>::new());
    let open_orders = RwSignal::new(Vec::<Order>::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(true);

    let svc = services.get_value();
    leptos::task::spawn_local(async move {
        match svc.api.active_markets().await {
            Ok(mut list) => {
                list.truncate(FEATURED_MARKETS);
                markets.set(list);
            }
            Err(e) => error.set(Some(api_failure(&svc, auth, &e))),
        }
        loading.set(false);
    });

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            open_orders.set(Vec::new());
            return;
        };
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.user_open_orders(user_id).await {
                Ok(orders) => open_orders.set(orders),
                Err(e) => log::warn!("open orders unavailable: {}", api_failure(&svc, auth, &e)),
            }
        });
    });

    let at_risk = move || open_orders.get().iter().map(|o| o.stake_amount).sum::<f64>();
    let potential = move || open_orders.get().iter().map(|o| o.potential_payout).sum::<f64>();

    view! {
        <div class="dashboard-page">
            <section class="dashboard-page__hero">
                <h1>"LL&L Futures"</h1>
                <p>"Bet on the future with LLL tokens."</p>
                <Show when=move || !auth.get().is_signed_in()>
                    <A href="/signup" attr:class="btn btn--primary">"Get started"</A>
                </Show>
            </section>
            <Show when=move || auth.get().is_signed_in()>
                <section class="dashboard-page__stats">
                    <div>"Balance: " {move || format::lll(auth.get().token_balance())}</div>
                    <div>"Open positions: " {move || open_orders.get().len()}</div>
                    <div>"At stake: " {move || format::lll(at_risk())}</div>
                    <div>"Potential payout: " {move || format::lll(potential())}</div>
                </section>
            </Show>
            <section class="dashboard-page__markets">
                <h2>"Trending markets"</h2>
                <Show when=move || error.get().is_some()>
                    <p class="error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <Show when=move || !loading.get() fallback=|| view! { <p>"Loading markets..."</p> }>
                    <div class="market-grid">
                        {move || {
                            markets
                                .get()
                                .into_iter()
                                .map(|m| view! { <MarketCard market=m/> })
                                .collect::<Vec<_>>()
                        }}
                    </div>
                </Show>
                <A href="/markets">"View all markets"</A>
            </section>
        </div>
    }
}
