//! Navigation guard evaluated before every route transition.
//!
//! DESIGN
//! ======
//! Each navigation walks a small state machine:
//!
//! ```text
//! unauthenticated ──────────────────────────────▶ redirect to login
//! awaiting-profile ──fetch ok──▶ authorized ────▶ proceed
//!                  └─fetch err─▶ denied ────────▶ clear + redirect to login
//! authorized ───────────────────────────────────▶ proceed
//! ```
//!
//! Public targets skip the machine, except that an authenticated visit to
//! the login view is bounced home. The profile fetch is awaited: the target
//! never renders before it completes or fails.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::{RouteTarget, login_redirect};
use crate::config::ClientConfig;
use crate::net::auth::AuthApi;
use crate::state::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Target is public; no auth check needed.
    Public,
    Unauthenticated,
    AwaitingProfile,
    Authorized,
    Denied,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

/// Final state and decision for one navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardOutcome {
    pub state: GuardState,
    pub decision: GuardDecision,
}

impl GuardOutcome {
    fn new(state: GuardState, decision: GuardDecision) -> Self {
        Self { state, decision }
    }
}

/// Initial state for a target, from what the session already knows.
#[must_use]
pub fn initial_state(target: &RouteTarget, authenticated: bool, profile_loaded: bool) -> GuardState {
    match (target.requires_auth, authenticated, profile_loaded) {
        (false, _, _) => GuardState::Public,
        (true, false, _) => GuardState::Unauthenticated,
        (true, true, false) => GuardState::AwaitingProfile,
        (true, true, true) => GuardState::Authorized,
    }
}

#[derive(Clone, Debug)]
pub struct NavigationGuard {
    config: ClientConfig,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Decide what happens to a navigation towards `target`.
    pub async fn resolve<A: AuthApi>(&self, session: &Session<A>, target: &RouteTarget) -> GuardOutcome {
        let state = initial_state(target, session.is_authenticated(), session.profile_loaded());
        log::debug!("guard {} -> {state:?}", target.full_path);

        let outcome = match state {
            GuardState::Public => {
                if target.path == self.config.login_path && session.is_authenticated() {
                    GuardOutcome::new(state, GuardDecision::Redirect(self.config.home_path.clone()))
                } else {
                    GuardOutcome::new(state, GuardDecision::Proceed)
                }
            }
            GuardState::Unauthenticated => GuardOutcome::new(state, self.to_login(target)),
            GuardState::AwaitingProfile => match session.fetch_profile().await {
                Ok(()) => GuardOutcome::new(GuardState::Authorized, GuardDecision::Proceed),
                Err(err) => {
                    log::warn!("profile unavailable for {}, signing out: {err}", target.full_path);
                    session.clear_user_data();
                    GuardOutcome::new(GuardState::Denied, self.to_login(target))
                }
            },
            GuardState::Authorized => GuardOutcome::new(state, GuardDecision::Proceed),
            GuardState::Denied => GuardOutcome::new(state, self.to_login(target)),
        };

        if outcome.decision == GuardDecision::Proceed {
            session.navigation_settled();
        }
        outcome
    }

    fn to_login(&self, target: &RouteTarget) -> GuardDecision {
        GuardDecision::Redirect(login_redirect(&self.config, &target.full_path))
    }
}
