//! Router glue for the navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every location change is resolved by [`NavigationGuard`] before the routed
//! view renders. Redirects replace the history entry so Back does not bounce
//! through the guard again.
//!
//! [`NavigationGuard`]: crate::routes::guard::NavigationGuard

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::app::AppContextStore;
use crate::routes::RouteTarget;
use crate::routes::guard::GuardDecision;

fn full_path(pathname: &str, search: &str) -> String {
    let query = search.trim_start_matches('?');
    if query.is_empty() { pathname.to_owned() } else { format!("{pathname}?{query}") }
}

/// Renders `children` only once the guard lets the current location through.
#[component]
pub fn RouteGate(children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<AppContextStore>();
    let navigate = use_navigate();
    let location = use_location();
    let allowed = RwSignal::new(false);
    let generation = Rc::new(Cell::new(0_u64));

    let bind_navigate = navigate.clone();
    ctx.with_value(|c| {
        c.navigator.bind(move |path| bind_navigate(path, NavigateOptions::default()));
    });

    Effect::new(move || {
        let target = RouteTarget::parse(&full_path(&location.pathname.get(), &location.search.get()));
        let this_generation = generation.get() + 1;
        generation.set(this_generation);
        allowed.set(false);

        let ctx = ctx.get_value();
        let navigate = navigate.clone();
        let generation = generation.clone();
        leptos::task::spawn_local(async move {
            let outcome = ctx.guard.resolve(&ctx.session, &target).await;
            // A newer navigation superseded this one.
            if generation.get() != this_generation {
                return;
            }
            match outcome.decision {
                GuardDecision::Proceed => allowed.set(true),
                GuardDecision::Redirect(to) => {
                    navigate(&to, NavigateOptions { replace: true, ..NavigateOptions::default() });
                }
            }
        });
    });

    view! {
        <Show when=move || allowed.get()>
            {children()}
        </Show>
    }
}
