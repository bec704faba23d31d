//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components that need an identity apply identical redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use platform::SIGN_IN_PATH;

use crate::state::auth::AuthState;

/// Whether a guarded page should send the visitor to sign in.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.session.is_none()
}

/// Whether an admin-only page should refuse to render.
pub fn should_deny_admin(state: &AuthState) -> bool {
    !state.loading && !state.is_admin()
}

/// Redirect to sign-in whenever auth has loaded and no session is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate(SIGN_IN_PATH, NavigateOptions::default());
        }
    });
}
