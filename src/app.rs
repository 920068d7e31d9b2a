//! Root application component with routing and context providers.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::net::auth::HttpAuthApi;
use crate::net::events::CredentialRejections;
use crate::net::papers::PapersApi;
use crate::net::pipeline::RequestPipeline;
use crate::net::transport::BrowserTransport;
use crate::pages::{home::AboutPage, home::HomePage, login::LoginPage};
use crate::routes::guard::NavigationGuard;
use crate::state::auth::AuthState;
use crate::state::notice::NoticeState;
use crate::state::session::{Session, SessionState};
use crate::util::gate::RouteGate;
use crate::util::navigator::BrowserNavigator;
use crate::util::notify::SignalNotifier;
use crate::util::storage::LocalStore;

pub type AppSession = Session<HttpAuthApi<BrowserTransport>>;

/// Long-lived services shared by pages. Not `Send`; provided through a
/// local `StoredValue`.
#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Rc<AppSession>,
    pub papers: Rc<PapersApi<BrowserTransport>>,
    pub guard: Rc<NavigationGuard>,
    pub navigator: Rc<BrowserNavigator>,
}

pub type AppContextStore = StoredValue<AppContext, LocalStorage>;

fn build_context(notices: RwSignal<NoticeState>, auth: RwSignal<AuthState>) -> AppContext {
    let config = ClientConfig::from_build_env();
    let state = Rc::new(SessionState::load(Rc::new(LocalStore), &config));
    let rejections = Rc::new(CredentialRejections::new());
    let pipeline = Rc::new(RequestPipeline::new(
        BrowserTransport::new(config.request_timeout_ms),
        config.clone(),
        state.clone(),
        Rc::new(SignalNotifier(notices)),
        rejections.clone(),
    ));
    let navigator = Rc::new(BrowserNavigator::new());
    let session = Rc::new(Session::new(
        state.clone(),
        HttpAuthApi::new(pipeline.clone()),
        navigator.clone(),
        &config,
    ));
    session.watch_rejections(&rejections);

    auth.set(state.snapshot());
    state.subscribe(move |snapshot| auth.set(snapshot.clone()));

    AppContext {
        guard: Rc::new(NavigationGuard::new(config.clone())),
        papers: Rc::new(PapersApi::new(pipeline)),
        config,
        session,
        navigator,
    }
}

/// Root application component.
///
/// Provides the session services, auth snapshot, and notices, and routes
/// every navigation through the guard.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::default());
    let notices = RwSignal::new(NoticeState::default());
    let ctx: AppContextStore = StoredValue::new_local(build_context(notices, auth));

    provide_context(auth);
    provide_context(notices);
    provide_context(ctx);

    view! {
        <Title text="Paper Citations"/>

        <Router>
            <NoticeStack/>
            <RouteGate>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("about") view=AboutPage/>
                </Routes>
            </RouteGate>
        </Router>
    }
}

/// Dismissable error notices raised by the request pipeline.
#[component]
fn NoticeStack() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeState>>();

    view! {
        <ul class="notice-stack">
            <For
                each=move || notices.get().notices
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <li class="notice notice--error">
                            <span>{notice.text}</span>
                            <button
                                class="notice__close"
                                on:click=move |_| notices.update(|s| s.dismiss(id))
                            >
                                "×"
                            </button>
                        </li>
                    }
                }
            />
        </ul>
    }
}
