//! Wake-up screen shown until the backend answers its health probe.
//!
//! SYSTEM CONTEXT
//! ==============
//! Free-tier hosting puts the API to sleep. The gate renders its children
//! only once a probe succeeds; until then it shows attempt progress, and
//! after five minutes a terminal error with a retry button.

use leptos::prelude::*;
use platform::{ReadinessGate, ReadinessState};

use crate::net::browser::BrowserTimer;
use crate::state::services::ServicesHandle;

#[component]
pub fn BackendGate(services: ServicesHandle, children: ChildrenFn) -> impl IntoView {
    let state = RwSignal::new(ReadinessState::default());

    let api = services.with_value(|s| s.api.clone());
    let probe = move || {
        let api = api.clone();
        async move { api.health().await.map(|_| ()) }
    };
    let (task, handle) = ReadinessGate::new(probe, BrowserTimer).schedule(move |s| state.set(s.clone()));
    leptos::task::spawn_local(async move {
        let outcome = task.await;
        log::debug!("readiness gate finished: {outcome:?}");
    });
    on_cleanup(move || handle.cancel());

    view! {
        <Show when=move || state.get().ready fallback=move || view! { <WakeScreen state=state/> }>
            {children()}
        </Show>
    }
}

#[component]
fn WakeScreen(state: RwSignal<ReadinessState>) -> impl IntoView {
    let width = move || format!("width: {:.0}%", state.get().progress() * 100.0);

    view! {
        <div class="backend-gate">
            <div class="backend-gate__card">
                <h1>"LL&L Futures"</h1>
                <Show
                    when=move || state.get().timed_out
                    fallback=move || {
                        view! {
                            <p class="backend-gate__status">"Waking up the backend..."</p>
                            <div class="backend-gate__bar">
                                <div class="backend-gate__fill" style=width></div>
                            </div>
                            <p class="backend-gate__attempts">
                                {move || format!("Attempt {}", state.get().attempt_count + 1)}
                            </p>
                            <Show when=move || state.get().show_still_trying()>
                                <p class="backend-gate__hint">
                                    "Still trying... free hosting can take a minute to start."
                                </p>
                            </Show>
                            <Show when=move || state.get().show_slow_warning()>
                                <p class="backend-gate__warning">
                                    "This is taking longer than usual. Last error: "
                                    {move || state.get().last_error.unwrap_or_default()}
                                </p>
                            </Show>
                        }
                    }
                >
                    <p class="backend-gate__error">{move || state.get().last_error.unwrap_or_default()}</p>
                    <button
                        class="btn btn--primary"
                        on:click=move |_| {
                            #[cfg(feature = "csr")]
                            {
                                if let Some(window) = web_sys::window() {
                                    let _ = window.location().reload();
                                }
                            }
                        }
                    >
                        "Retry"
                    </button>
                </Show>
            </div>
        </div>
    }
}
