//! View and edit the signed-in profile, including the profile picture.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use platform::api::{PROFILE_UPLOAD_FOLDER, resolve_media_url};
use platform::ValidationError;
use platform::types::{ProfileUpdate, Session};
use platform::validation;

use crate::net::files;
use crate::state::auth::AuthState;
use crate::state::services::{api_failure, session_failure, use_services};
use crate::util::auth::install_unauth_redirect;
use crate::util::format;

/// `Some(trimmed)` when the field changed, so untouched fields are not sent.
fn changed(input: &str, current: Option<&str>) -> Option<String> {
    let input = input.trim();
    (input != current.unwrap_or_default().trim()).then(|| input.to_owned())
}

/// The edit to send for the form fields. The username cannot be cleared and
/// a blank email keeps the stored one; a blank bio clears it.
fn profile_update(username: &str, email: &str, bio: &str, current: &Session) -> Result<ProfileUpdate, ValidationError> {
    validation::require(&[("Username", username)])?;
    let email = if email.trim().is_empty() { None } else { changed(email, current.email.as_deref()) };
    Ok(ProfileUpdate {
        username: changed(username, Some(&current.username)),
        email,
        profile_picture: None,
        bio: changed(bio, current.bio.as_deref()),
    })
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let services = use_services();
    install_unauth_redirect(auth, use_navigate());

    let editing = RwSignal::new(false);
    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let bio = RwSignal::new(String::new());
    let message = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let on_edit = move |_| {
        if let Some(s) = auth.get_untracked().session {
            username.set(s.username);
            email.set(s.email.unwrap_or_default());
            bio.set(s.bio.unwrap_or_default());
            message.set(None);
            editing.set(true);
        }
    };

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = auth.get_untracked().session else {
            return;
        };
        let update = match profile_update(&username.get(), &email.get(), &bio.get(), &current) {
            Ok(update) => update,
            Err(e) => {
                message.set(Some(e.to_string()));
                return;
            }
        };
        busy.set(true);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            match svc.sessions.update_user(&update).await {
                Ok(session) => {
                    auth.set(AuthState::restored(Some(session)));
                    message.set(Some("Profile updated".to_owned()));
                    editing.set(false);
                }
                Err(e) => message.set(Some(session_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    let on_picture = move |ev: leptos::ev::Event| {
        if let Some((_, content_type, size)) = files::selected_file_meta(&ev) {
            if let Err(e) = validation::check_image(&content_type, size) {
                message.set(Some(e.to_string()));
                return;
            }
        }
        busy.set(true);
        let svc = services.get_value();
        leptos::task::spawn_local(async move {
            let picked = match files::read_selected_file(&ev).await {
                Ok(p) => p,
                Err(e) => {
                    message.set(Some(e));
                    busy.set(false);
                    return;
                }
            };
            match svc.api.upload_file(&picked.name, &picked.content_type, picked.bytes, PROFILE_UPLOAD_FOLDER).await {
                Ok(upload) if upload.success => {
                    let update = ProfileUpdate { profile_picture: upload.file_url, ..ProfileUpdate::default() };
                    match svc.sessions.update_user(&update).await {
                        Ok(session) => {
                            auth.set(AuthState::restored(Some(session)));
                            message.set(Some("Profile picture updated".to_owned()));
                        }
                        Err(e) => message.set(Some(session_failure(&svc, auth, &e))),
                    }
                }
                Ok(upload) => message.set(Some(upload.message.unwrap_or_else(|| "Upload failed".to_owned()))),
                Err(e) => message.set(Some(api_failure(&svc, auth, &e))),
            }
            busy.set(false);
        });
    };

    let picture = move || {
        let url = auth.get().session.and_then(|s| s.profile_picture)?;
        Some(services.with_value(|svc| resolve_media_url(svc.api.config(), &url)))
    };

    view! {
        <div class="profile-page">
            <Show when=move || auth.get().is_signed_in() fallback=|| view! { <p>"Loading..."</p> }>
                <section class="profile-page__header">
                    {move || picture().map(|src| view! { <img class="profile-page__avatar" src=src alt="Profile picture"/> })}
                    <label class="btn">
                        "Change picture"
                        <input type="file" accept="image/*" hidden=true on:change=on_picture disabled=move || busy.get()/>
                    </label>
                    <h1>{move || auth.get().session.map(|s| s.username).unwrap_or_default()}</h1>
                    <p>{move || auth.get().session.and_then(|s| s.email).unwrap_or_default()}</p>
                    <p>"Balance: " {move || format::lll(auth.get().token_balance())}</p>
                    <p>
                        "Member since "
                        {move || {
                            auth.get()
                                .session
                                .and_then(|s| s.created_at)
                                .map(|c| format::date(&c).to_owned())
                                .unwrap_or_default()
                        }}
                    </p>
                </section>
                <Show
                    when=move || editing.get()
                    fallback=move || {
                        view! {
                            <p class="profile-page__bio">
                                {move || auth.get().session.and_then(|s| s.bio).unwrap_or_else(|| "No bio yet.".to_owned())}
                            </p>
                            <button class="btn" on:click=on_edit>"Edit profile"</button>
                        }
                    }
                >
                    <form class="form" on:submit=on_save>
                        <input
                            class="form__input"
                            type="text"
                            prop:value=move || username.get()
                            on:input=move |ev| username.set(event_target_value(&ev))
                        />
                        <input
                            class="form__input"
                            type="email"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                        <textarea
                            class="form__input"
                            prop:value=move || bio.get()
                            on:input=move |ev| bio.set(event_target_value(&ev))
                        ></textarea>
                        <button class="btn btn--primary" type="submit" disabled=move || busy.get()>"Save"</button>
                        <button class="btn" type="button" on:click=move |_| editing.set(false)>"Cancel"</button>
                    </form>
                </Show>
                <Show when=move || message.get().is_some()>
                    <p class="profile-page__message">{move || message.get().unwrap_or_default()}</p>
                </Show>
            </Show>
        </div>
    }
}
