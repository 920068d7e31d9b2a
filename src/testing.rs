//! Test doubles for the session core's collaborators.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::auth::AuthApi;
use crate::net::error::ApiError;
use crate::net::events::CredentialRejections;
use crate::net::pipeline::RequestPipeline;
use crate::net::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::net::types::{CurrentUser, LoginGrant, UserInfo};
use crate::state::session::{Session, SessionState};
use crate::util::navigator::Navigator;
use crate::util::notify::Notifier;
use crate::util::storage::{KeyValueStore, MemoryStore};

// =============================================================
// wire helpers
// =============================================================

pub fn envelope(code: i64, message: &str, data: serde_json::Value) -> String {
    serde_json::json!({ "code": code, "message": message, "data": data, "timestamp": 1_700_000_000_000_i64 })
        .to_string()
}

pub fn ok(data: serde_json::Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status: 200, body: envelope(200, "success", data) })
}

pub fn status(code: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status: code, body: String::new() })
}

pub fn current_user_json(roles: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "username": "ada",
        "nickname": "Ada",
        "avatar": null,
        "roles": roles,
        "permissions": ["paper:upload"],
    })
}

// =============================================================
// transport
// =============================================================

/// Replays scripted responses in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Rc<RefCell<VecDeque<Result<HttpResponse, TransportError>>>>,
    pub requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: Result<HttpResponse, TransportError>) -> &Self {
        self.responses.borrow_mut().push_back(response);
        self
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request recorded")
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::NoResponse("script exhausted".to_owned())))
    }
}

// =============================================================
// collaborators
// =============================================================

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}

/// Records pushes. With `follow` set, a push also moves the current path,
/// otherwise the navigation stays "in flight".
pub struct RecordingNavigator {
    pub current: RefCell<String>,
    pub pushes: RefCell<Vec<String>>,
    follow: bool,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self { current: RefCell::new(path.to_owned()), pushes: RefCell::new(Vec::new()), follow: true }
    }

    pub fn in_flight_at(path: &str) -> Self {
        Self { follow: false, ..Self::at(path) }
    }

    pub fn pushes(&self) -> Vec<String> {
        self.pushes.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, path: &str) {
        self.pushes.borrow_mut().push(path.to_owned());
        if self.follow {
            let bare = path.split(['?', '#']).next().unwrap_or(path);
            *self.current.borrow_mut() = bare.to_owned();
        }
    }

    fn current_path(&self) -> String {
        self.current.borrow().clone()
    }
}

/// Storage that counts writes and removals.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    pub sets: Cell<usize>,
    pub removes: Cell<usize>,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) {
        self.sets.set(self.sets.get() + 1);
        self.inner.set(key, value);
    }

    fn remove(&self, key: &str) {
        self.removes.set(self.removes.get() + 1);
        self.inner.remove(key);
    }
}

// =============================================================
// auth api
// =============================================================

/// Scripted [`AuthApi`] with per-operation call counters.
pub struct FakeAuthApi {
    pub login_result: RefCell<Result<LoginGrant, ApiError>>,
    pub register_result: RefCell<Result<UserInfo, ApiError>>,
    pub logout_result: RefCell<Result<(), ApiError>>,
    pub current_user_result: RefCell<Result<CurrentUser, ApiError>>,
    pub login_calls: Cell<usize>,
    pub register_calls: Cell<usize>,
    pub logout_calls: Cell<usize>,
    pub current_user_calls: Cell<usize>,
}

impl Default for FakeAuthApi {
    fn default() -> Self {
        Self {
            login_result: RefCell::new(Ok(grant("token-1"))),
            register_result: RefCell::new(Ok(UserInfo {
                id: 42,
                username: "ada".to_owned(),
                nickname: None,
                avatar: None,
            })),
            logout_result: RefCell::new(Ok(())),
            current_user_result: RefCell::new(Ok(current_user(&["user"]))),
            login_calls: Cell::new(0),
            register_calls: Cell::new(0),
            logout_calls: Cell::new(0),
            current_user_calls: Cell::new(0),
        }
    }
}

pub fn grant(token: &str) -> LoginGrant {
    LoginGrant { token_name: "satoken".to_owned(), token_value: token.to_owned() }
}

pub fn current_user(roles: &[&str]) -> CurrentUser {
    serde_json::from_value(current_user_json(roles)).expect("valid current user")
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl AuthApi for Rc<FakeAuthApi> {
    async fn login(&self, _username: &str, _password: &str) -> Result<LoginGrant, ApiError> {
        bump(&self.login_calls);
        self.login_result.borrow().clone()
    }

    async fn register(&self, _username: &str, _password: &str, _nickname: Option<&str>) -> Result<UserInfo, ApiError> {
        bump(&self.register_calls);
        self.register_result.borrow().clone()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        bump(&self.logout_calls);
        self.logout_result.borrow().clone()
    }

    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        bump(&self.current_user_calls);
        self.current_user_result.borrow().clone()
    }
}

// =============================================================
// fixtures
// =============================================================

pub struct SessionFixture {
    pub api: Rc<FakeAuthApi>,
    pub store: Rc<CountingStore>,
    pub navigator: Rc<RecordingNavigator>,
    pub session: Rc<Session<Rc<FakeAuthApi>>>,
}

impl SessionFixture {
    pub fn new(navigator: RecordingNavigator) -> Self {
        Self::with_store(CountingStore::default(), navigator)
    }

    pub fn with_store(store: CountingStore, navigator: RecordingNavigator) -> Self {
        let config = ClientConfig::default();
        let api = Rc::new(FakeAuthApi::default());
        let store = Rc::new(store);
        let navigator = Rc::new(navigator);
        let state = Rc::new(SessionState::load(store.clone(), &config));
        let session = Rc::new(Session::new(state, api.clone(), navigator.clone(), &config));
        Self { api, store, navigator, session }
    }

    pub fn stored_credential(&self) -> Option<String> {
        self.store.get(&ClientConfig::default().storage_key)
    }
}

/// Pipeline wired to a session state, for end-to-end flows.
pub struct PipelineFixture {
    pub store: Rc<MemoryStore>,
    pub transport: ScriptedTransport,
    pub notifier: Rc<RecordingNotifier>,
    pub state: Rc<SessionState>,
    pub pipeline: Rc<RequestPipeline<ScriptedTransport>>,
}

impl PipelineFixture {
    pub fn new() -> Self {
        let config = ClientConfig::default();
        let store = Rc::new(MemoryStore::new());
        let transport = ScriptedTransport::new();
        let notifier = Rc::new(RecordingNotifier::default());
        let state = Rc::new(SessionState::load(store.clone(), &config));
        let pipeline = Rc::new(RequestPipeline::new(
            transport.clone(),
            config,
            state.clone(),
            notifier.clone(),
            Rc::new(CredentialRejections::new()),
        ));
        Self { store, transport, notifier, state, pipeline }
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifier.messages.borrow().clone()
    }
}
