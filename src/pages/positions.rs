//! The signed-in user's orders with an all/open/settled filter.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use platform::PositionFilter;
use platform::types::{Order, OrderStatus};

use crate::state::auth::AuthState;
use crate::state::services::{api_failure, use_services};
use crate::util::auth::install_unauth_redirect;
use crate::util::format;

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Open => "Open",
        OrderStatus::Settled => "Settled",
        OrderStatus::Cancelled => "Cancelled",
    }
}

#[component]
pub fn PositionsPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    install_unauth_redirect(auth, use_navigate());

    let orders = RwSignal::new(Vec::<Order>::new());
    let filter = RwSignal::new(PositionFilter::All);
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        let Some(user_id) = auth.get().user_id() else {
            return;
        };
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.user_orders(user_id).await {
                Ok(list) => orders.set(list),
                Err(e) => error.set(Some(api_failure(&svc, auth, &e))),
            }
        });
    });

    let visible = move || filter.get().apply(&orders.get());

    view! {
        <div class="positions-page">
            <h1>"My Positions"</h1>
            <div class="positions-page__tabs">
                {PositionFilter::ALL
                    .into_iter()
                    .map(|f| {
                        view! {
                            <button
                                class=move || if filter.get() == f { "tab active" } else { "tab" }
                                on:click=move |_| filter.set(f)
                            >
                                {f.label()}
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
            <Show when=move || error.get().is_some()>
                <p class="error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !visible().is_empty() fallback=|| view! { <p>"No positions yet."</p> }>
                <table class="positions-table">
                    <thead>
                        <tr>
                            <th>"Market"</th>
                            <th>"Side"</th>
                            <th>"Stake"</th>
                            <th>"Odds"</th>
                            <th>"Potential payout"</th>
                            <th>"Status"</th>
                            <th>"Settled"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            visible()
                                .into_iter()
                                .map(|o| {
                                    view! {
                                        <tr>
                                            <td>{o.market_title.clone().unwrap_or_else(|| format!("#{}", o.market_id))}</td>
                                            <td>{o.side.as_str()}</td>
                                            <td>{format::lll(o.stake_amount)}</td>
                                            <td>{format::odds(o.odds)}</td>
                                            <td>{format::lll(o.potential_payout)}</td>
                                            <td>{status_label(o.status)}</td>
                                            <td>{o.settled_amount.map(format::lll).unwrap_or_default()}</td>
                                        </tr>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}
