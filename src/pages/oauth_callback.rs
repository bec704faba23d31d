//! Landing route for the OAuth redirect: adopts `?token=` and moves on to the
//! profile page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::state::auth::AuthState;
use crate::state::services::{session_failure, use_services};

#[component]
pub fn OAuthCallbackPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    let navigate = use_navigate();
    let query = use_query_map();
    let error = RwSignal::new(None::<String>);
    let adopted = RwSignal::new(false);

    Effect::new(move || {
        if adopted.get() {
            navigate("/profile", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let token = query.with_untracked(|q| q.get("token"));
    match token.filter(|t| !t.trim().is_empty()) {
        None => error.set(Some("No token received from the sign-in provider".to_owned())),
        Some(token) => {
            let svc = services.get_value();
            leptos::task::spawn_local(async move {
                match svc.sessions.adopt_token(&token).await {
                    Ok(session) => {
                        auth.set(AuthState::restored(Some(session)));
                        adopted.set(true);
                    }
                    Err(e) => error.set(Some(session_failure(&svc, auth, &e))),
                }
            });
        }
    }

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <Show when=move || error.get().is_some() fallback=|| view! { <p>"Completing sign-in..."</p> }>
                    <h1>"Sign-in failed"</h1>
                    <p class="error">{move || error.get().unwrap_or_default()}</p>
                    <A href="/signin">"Back to sign in"</A>
                </Show>
            </div>
        </div>
    }
}
