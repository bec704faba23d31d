//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use platform::{ApiConfig, WalletState};

use crate::components::{backend_gate::BackendGate, navbar::Navbar};
use crate::pages::{
    admin::AdminPage, create_market::CreateMarketPage, dashboard::DashboardPage, markets::MarketsPage,
    oauth_callback::OAuthCallbackPage, positions::PositionsPage, profile::ProfilePage, signin::SignInPage,
    signup::SignUpPage, staking::StakingPage, wallet::WalletPage,
};
use crate::state::auth::AuthState;
use crate::state::services::{Services, ServicesHandle, provide_services};

/// Root application component.
///
/// Provides all shared state contexts and gates routing on backend readiness.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ApiConfig::from_build_env();
    log::info!("api base url: {}", config.base_url());
    let services = provide_services(Services::new(config));

    let auth = RwSignal::new(AuthState::default());
    let wallet = RwSignal::new(WalletState::default());
    provide_context(auth);
    provide_context(wallet);

    view! {
        <Title text="LL&L Futures"/>
        <BackendGate services=services>
            <SessionProvider services=services/>
            <Router>
                <Navbar/>
                <main class="page">
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("") view=DashboardPage/>
                        <Route path=StaticSegment("markets") view=MarketsPage/>
                        <Route path=StaticSegment("positions") view=PositionsPage/>
                        <Route path=StaticSegment("wallet") view=WalletPage/>
                        <Route path=StaticSegment("staking") view=StakingPage/>
                        <Route path=StaticSegment("create") view=CreateMarketPage/>
                        <Route path=StaticSegment("admin") view=AdminPage/>
                        <Route path=StaticSegment("signin") view=SignInPage/>
                        <Route path=StaticSegment("signup") view=SignUpPage/>
                        <Route path=StaticSegment("profile") view=ProfilePage/>
                        <Route path=(StaticSegment("oauth"), StaticSegment("callback")) view=OAuthCallbackPage/>
                    </Routes>
                </main>
            </Router>
        </BackendGate>
    }
}

/// Restores the persisted session and mirrors wallet changes into context
/// signals. Mounted only once the backend is ready.
#[component]
fn SessionProvider(services: ServicesHandle) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let wallet = expect_context::<RwSignal<WalletState>>();

    services.with_value(|svc| {
        auth.set(AuthState::restored(svc.sessions.restore()));
        svc.wallet.set_observer(move |state| wallet.set(state.clone()));
    });
}
