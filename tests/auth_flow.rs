//! Authentication Flow Integration Tests
//!
//! End-to-end tests wiring the REST credential client, the profile
//! document store, the session state machine, and the route gate
//! together against mock HTTP services.

use std::sync::Arc;
use std::time::Duration;

use app_state::{NoticeKind, Session, SessionError, SessionPhase};
use app_ui::forms::SignUpForm;
use app_ui::navigation::{route_gate, NavTree};
use auth_client::test_utils::StubCredentialService;
use auth_client::{AuthClientConfig, Identity, RestAuthClient};
use profile_store::{MemoryProfileStore, ProfileStoreConfig, RestProfileStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rest_session(auth: &MockServer, docs: &MockServer) -> Session {
    let credentials = RestAuthClient::new(
        AuthClientConfig::new(auth.uri(), "test-key").with_timeout(Duration::from_secs(5)),
    )
    .unwrap();
    let profiles = RestProfileStore::new(
        ProfileStoreConfig::new(docs.uri()).with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    Session::new(Arc::new(credentials), Arc::new(profiles))
}

/// Full sign-up over HTTP: account creation, display-name update, the
/// profile document write, and the route gate flipping to the app shell.
#[tokio::test]
async fn test_sign_up_end_to_end() {
    let auth = MockServer::start().await;
    let docs = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .and(body_partial_json(json!({"email": "ana@test.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "idToken": "id-token-1",
            "refreshToken": "refresh-token-1",
            "email": "ana@test.com",
        })))
        .expect(1)
        .mount(&auth)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:update"))
        .and(body_partial_json(json!({"displayName": "Ana"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"localId": "u1"})))
        .expect(1)
        .mount(&auth)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/documents/users"))
        .and(body_partial_json(json!({
            "uid": "u1",
            "name": "Ana",
            "authProvider": "local",
            "email": "ana@test.com",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "users/u1"})))
        .expect(1)
        .mount(&docs)
        .await;

    let session = rest_session(&auth, &docs);
    let mut notices = session.notices();

    // The form passes validation before the network is touched.
    let form = SignUpForm {
        name: "Ana".to_string(),
        email: "ana@test.com".to_string(),
        password: "password123".to_string(),
    };
    form.validate().unwrap();

    let identity = session
        .sign_up(&form.name, &form.email, &form.password)
        .await
        .unwrap();

    assert_eq!(identity.uid, "u1");
    assert_eq!(identity.display_name, "Ana");
    assert_eq!(route_gate(&session.phase()), NavTree::App);
    assert_eq!(notices.try_recv().unwrap().kind, NoticeKind::Success);

    // Let the background document write reach the mock before it is
    // verified on drop.
    tokio::time::sleep(Duration::from_millis(50)).await;
}

/// Sign-in over HTTP, then sign-out with a failing revocation endpoint:
/// the route gate must still return to the auth subtree.
#[tokio::test]
async fn test_sign_in_then_forced_local_sign_out() {
    let auth = MockServer::start().await;
    let docs = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "u1",
            "idToken": "id-token-1",
            "refreshToken": "refresh-token-1",
            "email": "ana@test.com",
            "displayName": "Ana",
        })))
        .mount(&auth)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:revokeToken"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": {"code": 500, "message": "INTERNAL"}
        })))
        .mount(&auth)
        .await;

    let session = rest_session(&auth, &docs);

    let identity = session.sign_in("ana@test.com", "password123").await.unwrap();
    assert_eq!(identity.display_name, "Ana");
    assert_eq!(route_gate(&session.phase()), NavTree::App);

    // Remote revocation fails; the result is inspectable but the local
    // transition happens regardless.
    assert!(session.sign_out().await.is_err());
    assert_eq!(session.phase(), SessionPhase::SignedOut);
    assert_eq!(route_gate(&session.phase()), NavTree::Auth);
}

/// Failed sign-in over HTTP collapses into the generic failure and the
/// gate stays on the auth subtree.
#[tokio::test]
async fn test_failed_sign_in_stays_on_auth_tree() {
    let auth = MockServer::start().await;
    let docs = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "INVALID_PASSWORD"}
        })))
        .mount(&auth)
        .await;

    let session = rest_session(&auth, &docs);
    let mut notices = session.notices();

    let err = session.sign_in("ana@test.com", "wrong").await.unwrap_err();
    assert_eq!(err, SessionError::AuthenticationFailed);
    assert_eq!(route_gate(&session.phase()), NavTree::Auth);
    assert_eq!(notices.try_recv().unwrap().kind, NoticeKind::Failure);
}

/// The route gate shows the splash tree only while a sign-in attempt is
/// in flight.
#[tokio::test]
async fn test_route_gate_follows_phase_changes() {
    let stub = StubCredentialService::new().with_account(
        "user@test.com",
        "correct",
        Identity::new("u1", "User", "user@test.com"),
    );
    let session = Session::new(Arc::new(stub), Arc::new(MemoryProfileStore::new()));
    let mut rx = session.subscribe();

    assert_eq!(route_gate(&rx.borrow()), NavTree::Auth);

    let task = tokio::spawn({
        let session = session.clone();
        async move { session.sign_in("user@test.com", "correct").await }
    });

    rx.changed().await.unwrap();
    assert_eq!(route_gate(&rx.borrow()), NavTree::Splash);

    task.await.unwrap().unwrap();
    rx.changed().await.unwrap();
    assert_eq!(route_gate(&rx.borrow()), NavTree::App);
}

/// Whole-lifecycle walk with the in-memory doubles: sign up, sign out,
/// sign back in, and edit the profile.
#[tokio::test]
async fn test_account_lifecycle_with_stubs() {
    let stub = StubCredentialService::new();
    let store = Arc::new(MemoryProfileStore::new());
    let session = Session::new(Arc::new(stub), store.clone());

    let created = session
        .sign_up("Ana", "ana@test.com", "password123")
        .await
        .unwrap();
    assert_eq!(created.display_name, "Ana");

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.get(&created.uid).unwrap().name, "Ana");

    session.sign_out().await.unwrap();
    assert_eq!(session.phase(), SessionPhase::SignedOut);

    let returned = session.sign_in("ana@test.com", "password123").await.unwrap();
    assert_eq!(returned.uid, created.uid);
    assert_eq!(returned.display_name, "Ana");

    let updated = session
        .update_identity(&auth_client::IdentityPatch::display_name("Ana Maria"))
        .unwrap();
    assert_eq!(updated.display_name, "Ana Maria");
    assert_eq!(session.identity().unwrap().display_name, "Ana Maria");
}
