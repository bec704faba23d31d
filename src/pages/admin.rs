//! Admin settlement console: close and settle markets YES/NO/VOID.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;
use platform::types::{Market, MarketOutcome, MarketStatus, SettleMarketRequest};

use crate::state::auth::AuthState;
use crate::state::services::{ServicesHandle, api_failure, use_services};
use crate::util::auth::should_deny_admin;
use crate::util::format;

fn status_label(status: MarketStatus) -> &'static str {
    match status {
        MarketStatus::Active => "Active",
        MarketStatus::Closed => "Closed",
        MarketStatus::Settled => "Settled",
        MarketStatus::Cancelled => "Cancelled",
    }
}

fn reload(services: ServicesHandle, auth: RwSignal<AuthState>, markets: RwSignal<Vec<Market>>, message: RwSignal<Option<String>>) {
    let svc = services.get_value();
    leptos::task::spawn_local(async move {
        match svc.api.markets().await {
            Ok(list) => markets.set(list),
            Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
        }
    });
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let markets = RwSignal::new(Vec::<Market>::new());
    let message = RwSignal::new(None::<String>);

    Effect::new(move || {
        if auth.get().is_admin() {
            reload(services, auth, markets, message);
        }
    });

    let settle = move |market_id: i64, outcome: MarketOutcome| {
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.settle_market(SettleMarketRequest { market_id, outcome }).await {
                Ok(_) => {
                    message.set(Some(format!("Market #{market_id} settled {}", outcome.as_str())));
                    reload(services, auth, markets, message);
                }
                Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
            }
        });
    };
    let close = move |market_id: i64| {
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.close_market(market_id).await {
                Ok(_) => reload(services, auth, markets, message),
                Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
            }
        });
    };

    view! {
        <Show
            when=move || !should_deny_admin(&auth.get())
            fallback=|| view! { <div class="admin-page"><p>"Admin access required."</p></div> }
        >
            <div class="admin-page">
                <h1>"Settle Markets"</h1>
                <Show when=move || message.get().is_some()>
                    <p class="admin-page__message">{move || message.get().unwrap_or_default()}</p>
                </Show>
                <table class="admin-table">
                    <thead>
                        <tr>
                            <th>"Market"</th>
                            <th>"Status"</th>
                            <th>"Volume"</th>
                            <th>"Expires"</th>
                            <th>"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            markets
                                .get()
                                .into_iter()
                                .map(|m| {
                                    let id = m.id;
                                    let settleable = m.status.is_settleable();
                                    let active = m.status == MarketStatus::Active;
                                    view! {
                                        <tr>
                                            <td>{m.title.clone()}</td>
                                            <td>
                                                {status_label(m.status)}
                                                {m.outcome.map(|o| format!(" ({})", o.as_str()))}
                                            </td>
                                            <td>{format::lll(m.total_volume)}</td>
                                            <td>{format::date(&m.expiry_date).to_owned()}</td>
                                            <td>
                                                <Show when=move || active>
                                                    <button class="btn" on:click=move |_| close(id)>"Close"</button>
                                                </Show>
                                                <Show when=move || settleable>
                                                    <button class="btn btn--yes" on:click=move |_| settle(id, MarketOutcome::Yes)>"YES"</button>
                                                    <button class="btn btn--no" on:click=move |_| settle(id, MarketOutcome::No)>"NO"</button>
                                                    <button class="btn" on:click=move |_| settle(id, MarketOutcome::Void)>"VOID"</button>
                                                </Show>
                                            </td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </div>
        </Show>
    }
}
