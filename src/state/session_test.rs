use super::*;

use futures::executor::block_on;
use serde_json::json;

use crate::net::auth::HttpAuthApi;
use crate::testing::{
    CountingStore, PipelineFixture, RecordingNavigator, SessionFixture, current_user,
    current_user_json, grant, ok, status,
};
use crate::util::storage::MemoryStore;

fn rejected() -> CredentialRejected {
    CredentialRejected { url: "/api/papers/list".to_owned(), had_credential: true }
}

fn signed_in(fx: &SessionFixture) {
    block_on(fx.session.login("ada", "pw")).unwrap();
}

// =============================================================================
// SessionState
// =============================================================================

#[test]
fn load_restores_persisted_credential_only() {
    let store = CountingStore::default();
    store.set("satoken", "persisted");
    let fx = SessionFixture::with_store(store, RecordingNavigator::at("/"));
    let state = fx.session.state();
    assert_eq!(state.current_credential().as_deref(), Some("persisted"));
    assert!(state.is_authenticated());
    assert!(state.identity().is_none());
    assert!(state.roles().is_empty());
    assert!(!state.profile_loaded());
}

#[test]
fn load_without_key_is_unauthenticated() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    assert!(!fx.session.is_authenticated());
}

#[test]
fn set_credential_mirrors_storage() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    let state = fx.session.state();
    state.set_credential(Some("abc"));
    assert_eq!(fx.stored_credential().as_deref(), Some("abc"));
    state.set_credential(None);
    assert_eq!(fx.stored_credential(), None);
    assert!(!state.is_authenticated());
}

#[test]
fn empty_credential_counts_as_cleared() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    fx.session.state().set_credential(Some(""));
    assert_eq!(fx.stored_credential(), None);
    assert!(!fx.session.is_authenticated());
}

#[test]
fn setters_replace_rather_than_merge() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    let state = fx.session.state();
    state.set_roles(vec!["a".to_owned(), "b".to_owned()]);
    state.set_roles(vec!["c".to_owned()]);
    assert_eq!(state.roles(), vec!["c".to_owned()]);
    state.set_permissions(vec!["x".to_owned()]);
    state.set_permissions(Vec::new());
    assert!(state.permissions().is_empty());
}

#[test]
fn membership_queries_and_admin_flag() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    let state = fx.session.state();
    state.set_roles(vec!["user".to_owned()]);
    state.set_permissions(vec!["paper:upload".to_owned()]);
    assert!(fx.session.has_role("user"));
    assert!(!fx.session.is_admin());
    assert!(fx.session.has_permission("paper:upload"));
    assert!(!fx.session.has_permission("paper:delete"));
    state.set_roles(vec!["admin".to_owned()]);
    assert!(fx.session.is_admin());
}

#[test]
fn subscribers_see_each_mutation() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    let seen = Rc::new(RefCell::new(Vec::<AuthState>::new()));
    let seen2 = seen.clone();
    fx.session.state().subscribe(move |s| seen2.borrow_mut().push(s.clone()));

    signed_in(&fx);
    let last = seen.borrow().last().cloned().unwrap();
    assert!(last.authenticated);
    assert_eq!(last.display_name(), Some("Ada"));
    assert_eq!(last.roles, vec!["user".to_owned()]);
}

// =============================================================================
// login / register / fetch_profile
// =============================================================================

#[test]
fn login_persists_server_credential_and_fetches_profile_once() {
    let fx = SessionFixture::new(RecordingNavigator::at("/login"));
    *fx.api.login_result.borrow_mut() = Ok(grant("server-token"));

    signed_in(&fx);
    assert_eq!(fx.stored_credential().as_deref(), Some("server-token"));
    assert_eq!(fx.api.current_user_calls.get(), 1);
    assert!(fx.session.profile_loaded());
    assert!(fx.session.has_permission("paper:upload"));
}

#[test]
fn login_failure_leaves_state_unchanged() {
    let fx = SessionFixture::new(RecordingNavigator::at("/login"));
    *fx.api.login_result.borrow_mut() = Err(ApiError::business(1002, "wrong password"));

    let err = block_on(fx.session.login("ada", "bad")).unwrap_err();
    assert_eq!(err.to_string(), "wrong password");
    assert!(!fx.session.is_authenticated());
    assert_eq!(fx.store.sets.get(), 0);
    assert_eq!(fx.api.current_user_calls.get(), 0);
}

#[test]
fn login_profile_failure_restores_previous_credential() {
    let fx = SessionFixture::new(RecordingNavigator::at("/login"));
    *fx.api.current_user_result.borrow_mut() = Err(ApiError::Server);

    let err = block_on(fx.session.login("ada", "pw")).unwrap_err();
    assert_eq!(err, ApiError::Server);
    assert!(!fx.session.is_authenticated());
    assert_eq!(fx.stored_credential(), None);
}

#[test]
fn register_then_auto_login() {
    let fx = SessionFixture::new(RecordingNavigator::at("/login"));
    block_on(fx.session.register("ada", "pw", Some("Ada"))).unwrap();
    assert_eq!(fx.api.register_calls.get(), 1);
    assert_eq!(fx.api.login_calls.get(), 1);
    assert!(fx.session.is_authenticated());
    assert!(fx.session.profile_loaded());
}

#[test]
fn register_failure_commits_nothing() {
    let fx = SessionFixture::new(RecordingNavigator::at("/login"));
    *fx.api.register_result.borrow_mut() = Err(ApiError::business(1001, "username taken"));

    let err = block_on(fx.session.register("ada", "pw", None)).unwrap_err();
    assert_eq!(err.code(), Some(1001));
    assert_eq!(fx.api.login_calls.get(), 0);
    assert!(!fx.session.is_authenticated());
    assert!(fx.session.state().identity().is_none());
}

#[test]
fn fetch_profile_replaces_profile() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    fx.session.state().set_roles(vec!["stale".to_owned()]);
    *fx.api.current_user_result.borrow_mut() = Ok(current_user(&["admin"]));

    block_on(fx.session.fetch_profile()).unwrap();
    assert_eq!(fx.session.state().roles(), vec!["admin".to_owned()]);
    assert!(fx.session.is_admin());
}

#[test]
fn fetch_profile_failure_keeps_existing_state() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    signed_in(&fx);
    *fx.api.current_user_result.borrow_mut() = Err(ApiError::Network { detail: "offline".to_owned() });

    assert!(block_on(fx.session.fetch_profile()).is_err());
    assert!(fx.session.is_authenticated());
    assert!(fx.session.profile_loaded());
}

// =============================================================================
// logout / clear_user_data
// =============================================================================

#[test]
fn logout_clears_everything_and_goes_to_login() {
    let fx = SessionFixture::new(RecordingNavigator::at("/about"));
    signed_in(&fx);

    block_on(fx.session.logout());
    assert_eq!(fx.api.logout_calls.get(), 1);
    assert!(!fx.session.is_authenticated());
    assert!(fx.session.state().identity().is_none());
    assert!(fx.session.state().roles().is_empty());
    assert!(fx.session.state().permissions().is_empty());
    assert_eq!(fx.stored_credential(), None);
    assert_eq!(fx.navigator.pushes(), vec!["/login".to_owned()]);
}

#[test]
fn logout_clears_even_when_revoke_fails() {
    for failure in [ApiError::Network { detail: "offline".to_owned() }, ApiError::business(500, "boom")] {
        let fx = SessionFixture::new(RecordingNavigator::at("/"));
        signed_in(&fx);
        *fx.api.logout_result.borrow_mut() = Err(failure);

        block_on(fx.session.logout());
        assert!(!fx.session.is_authenticated());
        assert!(fx.session.state().permissions().is_empty());
        assert_eq!(fx.navigator.pushes(), vec!["/login".to_owned()]);
    }
}

#[test]
fn clear_user_data_is_local_and_idempotent() {
    let fx = SessionFixture::new(RecordingNavigator::at("/"));
    signed_in(&fx);
    let calls_before = (fx.api.login_calls.get(), fx.api.current_user_calls.get());

    assert!(fx.session.clear_user_data());
    assert!(!fx.session.clear_user_data());

    assert_eq!(fx.api.logout_calls.get(), 0);
    assert_eq!((fx.api.login_calls.get(), fx.api.current_user_calls.get()), calls_before);
    assert!(!fx.session.is_authenticated());
    assert!(fx.session.state().identity().is_none());
    assert!(fx.session.state().roles().is_empty());
    assert!(fx.session.state().permissions().is_empty());
    assert!(fx.navigator.pushes().is_empty());
}

// =============================================================================
// credential rejection
// =============================================================================

#[test]
fn rejection_clears_and_redirects_to_login() {
    let fx = SessionFixture::new(RecordingNavigator::at("/about"));
    signed_in(&fx);
    fx.session.credential_rejected(&rejected());
    assert!(!fx.session.is_authenticated());
    assert_eq!(fx.navigator.pushes(), vec!["/login".to_owned()]);
}

#[test]
fn rejection_on_login_view_does_not_redirect() {
    let fx = SessionFixture::new(RecordingNavigator::at("/login"));
    fx.session.credential_rejected(&rejected());
    assert!(fx.navigator.pushes().is_empty());
}

#[test]
fn simultaneous_rejections_redirect_once_while_en_route() {
    let fx = SessionFixture::new(RecordingNavigator::in_flight_at("/about"));
    signed_in(&fx);

    fx.session.credential_rejected(&rejected());
    fx.session.credential_rejected(&rejected());
    assert_eq!(fx.navigator.pushes(), vec!["/login".to_owned()]);
    assert!(!fx.session.is_authenticated());
}

#[test]
fn successful_login_rearms_redirect() {
    let fx = SessionFixture::new(RecordingNavigator::in_flight_at("/about"));
    fx.session.credential_rejected(&rejected());
    signed_in(&fx);
    fx.session.credential_rejected(&rejected());
    assert_eq!(fx.navigator.pushes().len(), 2);
}

#[test]
fn watch_rejections_holds_session_weakly() {
    let fx = SessionFixture::new(RecordingNavigator::at("/about"));
    let hub = CredentialRejections::new();
    fx.session.watch_rejections(&hub);
    let weak = Rc::downgrade(&fx.session);
    drop(fx);
    assert!(weak.upgrade().is_none());
    hub.emit(&rejected());
}

#[test]
fn concurrent_401s_through_pipeline_clear_once_and_push_once() {
    let pfx = PipelineFixture::new();
    let navigator = Rc::new(RecordingNavigator::in_flight_at("/about"));
    let config = ClientConfig::default();
    let session = Rc::new(Session::new(
        pfx.state.clone(),
        HttpAuthApi::new(pfx.pipeline.clone()),
        navigator.clone(),
        &config,
    ));
    session.watch_rejections(pfx.pipeline.rejections());

    pfx.transport.push(ok(json!({"tokenName": "satoken", "tokenValue": "tok"})));
    pfx.transport.push(ok(current_user_json(&["user"])));
    block_on(session.login("ada", "pw")).unwrap();
    assert!(session.profile_loaded());

    pfx.transport.push(status(401));
    pfx.transport.push(status(401));
    let (a, b) = block_on(async {
        futures::join!(
            pfx.pipeline.get::<serde_json::Value>("/papers/list"),
            pfx.pipeline.get::<serde_json::Value>("/papers/1"),
        )
    });
    assert!(a.unwrap_err().is_unauthorized());
    assert!(b.unwrap_err().is_unauthorized());

    assert!(!session.is_authenticated());
    assert!(session.state().roles().is_empty());
    assert_eq!(pfx.store.get("satoken"), None);
    assert_eq!(navigator.pushes(), vec!["/login".to_owned()]);
    assert_eq!(pfx.notifications().len(), 2);
}

#[test]
fn rejection_during_login_profile_fetch_stays_cleared() {
    let pfx = PipelineFixture::new();
    let navigator = Rc::new(RecordingNavigator::at("/login"));
    let session = Rc::new(Session::new(
        pfx.state.clone(),
        HttpAuthApi::new(pfx.pipeline.clone()),
        navigator.clone(),
        &ClientConfig::default(),
    ));
    session.watch_rejections(pfx.pipeline.rejections());

    pfx.transport.push(ok(json!({"tokenName": "satoken", "tokenValue": "tok"})));
    pfx.transport.push(status(401));
    let err = block_on(session.login("ada", "pw")).unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
    assert!(navigator.pushes().is_empty());
}

#[test]
fn memory_store_backed_session_survives_reload() {
    let store: Rc<MemoryStore> = Rc::new(MemoryStore::new());
    let config = ClientConfig::default();
    let first = SessionState::load(store.clone(), &config);
    first.set_credential(Some("keep-me"));
    first.set_roles(vec!["user".to_owned()]);

    let reloaded = SessionState::load(store, &config);
    assert_eq!(reloaded.current_credential().as_deref(), Some("keep-me"));
    assert!(reloaded.roles().is_empty());
}

