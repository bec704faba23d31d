//! Account registration. Success sends the user to sign in.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use platform::SIGN_IN_PATH;
use platform::validation;

use crate::state::auth::AuthState;
use crate::state::services::{session_failure, use_services};

#[component]
pub fn SignUpPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let navigate = use_navigate();
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let registered = RwSignal::new(false);

    Effect::new(move || {
        if registered.get() {
            navigate(SIGN_IN_PATH, NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (name, mail, secret) = (username.get(), email.get(), password.get());
        if let Err(e) = validation::require(&[("Username", name.as_str()), ("Email", mail.as_str()), ("Password", secret.as_str())]) {
            error.set(Some(e.to_string()));
            return;
        }
        if secret != confirm.get() {
            error.set(Some("Passwords do not match".to_owned()));
            return;
        }
        busy.set(true);
        error.set(None);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.sessions.sign_up(&name, &mail, &secret).await {
                Ok(account) => {
                    log::info!("registered {}", account.username);
                    registered.set(true);
                }
                Err(e) => error.set(Some(session_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    let input = move |kind: &'static str, placeholder: &'static str, signal: RwSignal<String>| {
        view! {
            <input
                class="form__input"
                type=kind
                placeholder=placeholder
                prop:value=move || signal.get()
                on:input=move |ev| signal.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign Up"</h1>
                <form class="form" on:submit=on_submit>
                    {input("text", "Username", username)}
                    {input("email", "Email", email)}
                    {input("password", "Password", password)}
                    {input("password", "Confirm password", confirm)}
                    <Show when=move || error.get().is_some()>
                        <p class="error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Sign Up" }}
                    </button>
                </form>
                <p>"Already registered? " <A href="/signin">"Sign in"</A></p>
            </div>
        </div>
    }
}
