//! Active markets with inline bet forms.

use leptos::prelude::*;
use platform::types::Market;

use crate::components::market_card::MarketCard;
use crate::state::auth::AuthState;
use crate::state::services::{ServicesHandle, api_failure, use_services};

fn load_markets(
    services: ServicesHandle,
    auth: RwSignal<AuthState>,
    markets: RwSignal<Vec<Market>>,
    error: RwSignal<Option<String>>,
    loading: RwSignal<bool>,
) {
    let services = services.get_value();
    leptos::task::spawn_local(async move {
        match services.api.active_markets().await {
            Ok(list) => {
                markets.set(list);
                error.set(None);
            }
            Err(e) => error.set(Some(api_failure(&services, auth, &e))),
        }
        loading.set(false);
    });
}

#[component]
pub fn MarketsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let markets = RwSignal::new(Vec::<Market>::new());
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(true);

    load_markets(services, auth, markets, error, loading);
    let on_placed = Callback::new(move |()| load_markets(services, auth, markets, error, loading));

    view! {
        <div class="markets-page">
            <h1>"Active Markets"</h1>
            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <p>"Loading markets..."</p> }>
                <Show
                    when=move || !markets.get().is_empty()
                    fallback=|| view! { <p>"No active markets right now."</p> }
                >
                    <div class="market-grid">
                        {move || {
                            markets
                                .get()
                                .into_iter()
                                .map(|m| view! { <MarketCard market=m with_bet=true on_placed=on_placed/> })
                                .collect::<Vec<_>>()
                        }}
                    </div>
                </Show>
            </Show>
        </div>
    }
}
