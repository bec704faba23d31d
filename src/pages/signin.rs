//! Email/username + password sign-in.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use platform::validation;

use crate::state::auth::AuthState;
use crate::state::services::{session_failure, use_services};

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let navigate = use_navigate();
    let identifier = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    Effect::new(move || {
        if auth.get().is_signed_in() {
            navigate("/", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let id = identifier.get();
        let secret = password.get();
        if let Err(e) = validation::require(&[("Email", id.as_str()), ("Password", secret.as_str())]) {
            error.set(Some(e.to_string()));
            return;
        }
        busy.set(true);
        error.set(None);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.sessions.sign_in(&id, &secret).await {
                Ok(session) => auth.set(AuthState::restored(Some(session))),
                Err(e) => error.set(Some(session_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign In"</h1>
                <form class="form" on:submit=on_submit>
                    <input
                        class="form__input"
                        type="text"
                        placeholder="Email"
                        prop:value=move || identifier.get()
                        on:input=move |ev| identifier.set(event_target_value(&ev))
                    />
                    <input
                        class="form__input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || error.get().is_some()>
                        <p class="error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <p>"No account? " <A href="/signup">"Sign up"</A></p>
            </div>
        </div>
    }
}
