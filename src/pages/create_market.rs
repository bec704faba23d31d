//! Market creation form.

#[cfg(test)]
#[path = "create_market_test.rs"]
mod create_market_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use platform::validation::MarketDraft;

use crate::state::auth::AuthState;
use crate::state::services::{api_failure, use_services};
use crate::util::auth::install_unauth_redirect;

/// Parse an odds input, treating garbage as zero so validation rejects it.
fn parse_odds(input: &str) -> f64 {
    input.trim().parse().unwrap_or(0.0)
}

#[component]
pub fn CreateMarketPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let navigate = use_navigate();
    install_unauth_redirect(auth, navigate.clone());

    let defaults = MarketDraft::new();
    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let expiry = RwSignal::new(String::new());
    let yes_odds = RwSignal::new(defaults.yes_odds.to_string());
    let no_odds = RwSignal::new(defaults.no_odds.to_string());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let created = RwSignal::new(false);

    Effect::new(move || {
        if created.get() {
            navigate("/markets", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(creator_id) = auth.get_untracked().user_id() else {
            error.set(Some("Please sign in to create markets".to_owned()));
            return;
        };
        let draft = MarketDraft {
            title: title.get(),
            description: description.get(),
            expiry_date: expiry.get(),
            yes_odds: parse_odds(&yes_odds.get()),
            no_odds: parse_odds(&no_odds.get()),
        };
        let request = match draft.into_request(creator_id) {
            Ok(r) => r,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.api.create_market(&request).await {
                Ok(market) => {
                    log::info!("created market {}", market.id);
                    created.set(true);
                }
                Err(e) => error.set(Some(api_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    let field = move |label: &'static str, kind: &'static str, signal: RwSignal<String>| {
        view! {
            <label class="form__label">
                {label}
                <input
                    class="form__input"
                    type=kind
                    step="0.01"
                    prop:value=move || signal.get()
                    on:input=move |ev| signal.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <div class="create-market-page">
            <h1>"Create Market"</h1>
            <form class="form" on:submit=on_submit>
                {field("Title", "text", title)}
                <label class="form__label">
                    "Description"
                    <textarea
                        class="form__input"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                {field("Expiry date", "datetime-local", expiry)}
                {field("YES odds", "number", yes_odds)}
                {field("NO odds", "number", no_odds)}
                <Show when=move || error.get().is_some()>
                    <p class="error">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                    {move || if busy.get() { "Creating..." } else { "Create Market" }}
                </button>
            </form>
        </div>
    }
}
