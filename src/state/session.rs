//! Process-wide session container.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionState`] holds the credential and the profile (identity, roles,
//! permissions) and mirrors the credential to persistent storage. The
//! request pipeline reads it as a [`CredentialSource`]. [`Session`] layers the
//! login/register/logout/profile actions and the credential-rejection policy
//! on top, and is shared by `Rc` with the guard and the UI.
//!
//! INVARIANTS
//! ==========
//! - No credential means unauthenticated, whatever the profile says.
//! - Clearing the credential clears the profile with it.
//! - Storage holds the credential exactly when memory does. Nothing else
//!   is persisted.
//!
//! Everything runs on one event loop. `RefCell` borrows are never held
//! across an `.await`, so each setter is atomic with respect to other tasks.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::auth::AuthApi;
use crate::net::error::ApiError;
use crate::net::events::{CredentialRejected, CredentialRejections};
use crate::net::pipeline::CredentialSource;
use crate::net::types::UserInfo;
use crate::state::auth::AuthState;
use crate::util::navigator::Navigator;
use crate::util::storage::KeyValueStore;

type ChangeListener = Rc<dyn Fn(&AuthState)>;

pub struct SessionState {
    storage: Rc<dyn KeyValueStore>,
    storage_key: String,
    admin_role: String,
    credential: RefCell<Option<String>>,
    identity: RefCell<Option<UserInfo>>,
    roles: RefCell<BTreeSet<String>>,
    permissions: RefCell<BTreeSet<String>>,
    listeners: RefCell<Vec<ChangeListener>>,
}

impl SessionState {
    /// Restore the persisted credential; the profile starts empty.
    pub fn load(storage: Rc<dyn KeyValueStore>, config: &ClientConfig) -> Self {
        let credential = storage.get(&config.storage_key).filter(|t| !t.is_empty());
        if credential.is_some() {
            log::debug!("restored persisted credential");
        }
        Self {
            storage,
            storage_key: config.storage_key.clone(),
            admin_role: config.admin_role.clone(),
            credential: RefCell::new(credential),
            identity: RefCell::new(None),
            roles: RefCell::new(BTreeSet::new()),
            permissions: RefCell::new(BTreeSet::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Replace the credential and sync storage. An empty value clears it.
    pub fn set_credential(&self, value: Option<&str>) {
        let value = value.filter(|v| !v.is_empty());
        match value {
            Some(token) => self.storage.set(&self.storage_key, token),
            None => self.storage.remove(&self.storage_key),
        }
        *self.credential.borrow_mut() = value.map(str::to_owned);
        self.publish();
    }

    pub fn set_identity(&self, identity: Option<UserInfo>) {
        *self.identity.borrow_mut() = identity;
        self.publish();
    }

    pub fn set_roles(&self, roles: impl IntoIterator<Item = String>) {
        *self.roles.borrow_mut() = roles.into_iter().collect();
        self.publish();
    }

    pub fn set_permissions(&self, permissions: impl IntoIterator<Item = String>) {
        *self.permissions.borrow_mut() = permissions.into_iter().collect();
        self.publish();
    }

    /// In-memory credential only; see [`CredentialSource`] for the
    /// storage-backed read used on outbound requests.
    #[must_use]
    pub fn current_credential(&self) -> Option<String> {
        self.credential.borrow().clone()
    }

    #[must_use]
    pub fn identity(&self) -> Option<UserInfo> {
        self.identity.borrow().clone()
    }

    #[must_use]
    pub fn roles(&self) -> Vec<String> {
        self.roles.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn permissions(&self) -> Vec<String> {
        self.permissions.borrow().iter().cloned().collect()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credential.borrow().as_deref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(&self.admin_role)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.borrow().contains(role)
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.borrow().contains(permission)
    }

    /// Identity and at least one role are present.
    #[must_use]
    pub fn profile_loaded(&self) -> bool {
        self.identity.borrow().is_some() && !self.roles.borrow().is_empty()
    }

    /// Reset credential and profile. Returns whether anything was set.
    pub fn clear(&self) -> bool {
        let had_anything = self.credential.borrow().is_some()
            || self.identity.borrow().is_some()
            || !self.roles.borrow().is_empty()
            || !self.permissions.borrow().is_empty();
        self.storage.remove(&self.storage_key);
        if !had_anything {
            return false;
        }
        *self.credential.borrow_mut() = None;
        *self.identity.borrow_mut() = None;
        self.roles.borrow_mut().clear();
        self.permissions.borrow_mut().clear();
        self.publish();
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        AuthState {
            authenticated: self.is_authenticated(),
            user: self.identity(),
            roles: self.roles(),
            permissions: self.permissions(),
            is_admin: self.is_admin(),
        }
    }

    /// Receive a fresh snapshot after every mutation.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn publish(&self) {
        let listeners: Vec<ChangeListener> = self.listeners.borrow().clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

impl CredentialSource for SessionState {
    /// Falls back to storage when memory has nothing, covering requests
    /// issued before the container finished loading.
    fn credential(&self) -> Option<String> {
        self.current_credential()
            .or_else(|| self.storage.get(&self.storage_key))
            .filter(|t| !t.is_empty())
    }
}

/// Session actions and invalidation policy over a [`SessionState`].
pub struct Session<A> {
    state: Rc<SessionState>,
    api: A,
    navigator: Rc<dyn Navigator>,
    login_path: String,
    /// A login redirect was pushed and has not settled yet.
    redirect_pending: Cell<bool>,
}

impl<A: AuthApi> Session<A> {
    pub fn new(state: Rc<SessionState>, api: A, navigator: Rc<dyn Navigator>, config: &ClientConfig) -> Self {
        Self {
            state,
            api,
            navigator,
            login_path: config.login_path.clone(),
            redirect_pending: Cell::new(false),
        }
    }

    #[must_use]
    pub fn state(&self) -> &Rc<SessionState> {
        &self.state
    }

    /// Apply this session's invalidation policy to every 401 the pipeline
    /// reports. Holds only a weak reference to the session.
    pub fn watch_rejections(self: &Rc<Self>, rejections: &CredentialRejections)
    where
        A: 'static,
    {
        let session = Rc::downgrade(self);
        rejections.subscribe(move |event| {
            if let Some(session) = session.upgrade() {
                session.credential_rejected(event);
            }
        });
    }

    /// Authenticate, persist the issued credential, then load the profile.
    ///
    /// # Errors
    ///
    /// Propagates the login or profile failure. State is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let grant = self.api.login(username, password).await.inspect_err(|e| {
            log::warn!("login failed for {username}: {e}");
        })?;
        let previous = self.state.current_credential();
        self.state.set_credential(Some(&grant.token_value));
        self.redirect_pending.set(false);
        log::info!("signed in as {username}");

        if let Err(err) = self.fetch_profile().await {
            // A 401 during the fetch has already cleared the session.
            if self.state.current_credential().as_deref() == Some(grant.token_value.as_str()) {
                self.state.set_credential(previous.as_deref());
            }
            return Err(err);
        }
        Ok(())
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// # Errors
    ///
    /// Propagates the registration or login failure.
    pub async fn register(&self, username: &str, password: &str, nickname: Option<&str>) -> Result<(), ApiError> {
        let created = self.api.register(username, password, nickname).await.inspect_err(|e| {
            log::warn!("registration failed for {username}: {e}");
        })?;
        log::info!("registered user {} ({})", created.username, created.id);
        self.login(username, password).await
    }

    /// Replace identity, roles, and permissions from the server.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure; existing state is untouched.
    pub async fn fetch_profile(&self) -> Result<(), ApiError> {
        let user = self.api.current_user().await.inspect_err(|e| {
            log::warn!("profile fetch failed: {e}");
        })?;
        self.state.set_identity(Some(user.identity()));
        self.state.set_roles(user.roles);
        self.state.set_permissions(user.permissions);
        log::debug!("profile loaded for {}", user.username);
        Ok(())
    }

    /// Best-effort server revoke, then an unconditional local sign-out.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            log::warn!("credential revoke failed, clearing locally anyway: {err}");
        }
        self.state.clear();
        self.navigator.push(&self.login_path);
    }

    /// Reset everything locally without contacting the server.
    pub fn clear_user_data(&self) -> bool {
        self.state.clear()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.is_admin()
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.state.has_role(role)
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.state.has_permission(permission)
    }

    #[must_use]
    pub fn profile_loaded(&self) -> bool {
        self.state.profile_loaded()
    }

    /// Mark the end of a navigation so a later rejection may redirect again.
    pub fn navigation_settled(&self) {
        self.redirect_pending.set(false);
    }

    pub(crate) fn credential_rejected(&self, event: &CredentialRejected) {
        if self.clear_user_data() {
            log::info!("credential rejected by {}, session cleared", event.url);
        }
        self.redirect_to_login();
    }

    /// Push the login route unless it is shown or already being navigated to.
    fn redirect_to_login(&self) {
        if self.redirect_pending.get() {
            return;
        }
        if self.navigator.current_path() == self.login_path {
            return;
        }
        self.redirect_pending.set(true);
        self.navigator.push(&self.login_path);
    }
}
