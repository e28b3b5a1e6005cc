//! Integration tests for the session lifecycle against the mock API.
//!
//! Every test drives a real `Store` over actual HTTP: login, registration,
//! token refresh, admin checks, and logout.

use electrostore_client::gateway::{LoginRequest, RegisterRequest};
use electrostore_client::{GatewayError, StatePersister, StoreError};
use electrostore_core::Role;

use electrostore_integration_tests::{
    MockApi, REFRESH_TOKEN, VALID_PASSWORD, VALID_USERNAME, persistent_store_for, store_for,
    temp_state_dir,
};

fn valid_credentials() -> LoginRequest {
    LoginRequest {
        username: VALID_USERNAME.to_owned(),
        password: VALID_PASSWORD.to_owned(),
    }
}

fn register_request(username: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password: "pa55word!".to_owned(),
        first_name: String::new(),
        last_name: String::new(),
        address: String::new(),
        phone_number: String::new(),
    }
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_success_populates_session() {
    let api = MockApi::spawn().await;
    let store = store_for(&api);

    store
        .login(valid_credentials())
        .await
        .expect("login should succeed");

    assert!(store.is_authenticated());
    assert!(!store.is_admin());

    let session = store.session();
    assert_eq!(session.role(), Some(Role::Customer));
    assert_eq!(session.refresh_token(), Some(REFRESH_TOKEN));
    assert!(session.access_token().is_some());

    let user = store.user().expect("profile should be stored");
    assert_eq!(user.username, VALID_USERNAME);
    assert_eq!(user.email, "minh@example.com");
}

#[tokio::test]
async fn test_login_rejection_leaves_state_untouched() {
    let api = MockApi::spawn().await;
    let dir = temp_state_dir();
    let store = persistent_store_for(&api, &dir);

    let err = store
        .login(LoginRequest {
            username: VALID_USERNAME.to_owned(),
            password: "wrong".to_owned(),
        })
        .await
        .expect_err("bad credentials should be rejected");

    match err {
        StoreError::Gateway(GatewayError::Rejected { status, detail }) => {
            assert_eq!(status, 401);
            assert!(
                detail.contains("No active account"),
                "server detail should be carried: {detail}"
            );
        }
        other => panic!("expected a gateway rejection, got: {other}"),
    }

    assert!(!store.is_authenticated());
    assert!(store.session().access_token().is_none());
    // Nothing was ever persisted
    assert!(
        StatePersister::new(&dir)
            .load()
            .expect("state dir readable")
            .is_none()
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_login_as_admin_sets_admin_role() {
    let api = MockApi::spawn_admin().await;
    let store = store_for(&api);

    store
        .login(valid_credentials())
        .await
        .expect("login should succeed");

    assert!(store.is_admin());
    assert_eq!(store.session().role(), Some(Role::Admin));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_does_not_authenticate() {
    let api = MockApi::spawn().await;
    let store = store_for(&api);

    store
        .register(register_request("newcomer"))
        .await
        .expect("registration should succeed");

    assert!(!store.is_authenticated());
    assert!(store.user().is_none());
    assert!(store.session().access_token().is_none());
}

#[tokio::test]
async fn test_register_conflict_carries_server_detail() {
    let api = MockApi::spawn().await;
    let store = store_for(&api);

    let err = store
        .register(register_request(VALID_USERNAME))
        .await
        .expect_err("taken username should be rejected");

    match err {
        StoreError::Gateway(GatewayError::Rejected { status, detail }) => {
            assert_eq!(status, 400);
            assert!(detail.contains("already exists"));
        }
        other => panic!("expected a gateway rejection, got: {other}"),
    }
}

// =============================================================================
// Token Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_updates_only_access_token() {
    let api = MockApi::spawn().await;
    let store = store_for(&api);

    store
        .login(valid_credentials())
        .await
        .expect("login should succeed");
    let before = store.session();

    store
        .refresh_access_token()
        .await
        .expect("refresh should succeed");
    let after = store.session();

    assert_ne!(
        before.access_token(),
        after.access_token(),
        "access token should change"
    );
    assert_eq!(before.refresh_token(), after.refresh_token());
    assert_eq!(before.role(), after.role());
    assert_eq!(
        before.user().map(|u| u.id),
        after.user().map(|u| u.id),
        "profile should be unchanged"
    );
}

#[tokio::test]
async fn test_refresh_without_token_is_noop() {
    let api = MockApi::spawn().await;
    let store = store_for(&api);

    store
        .refresh_access_token()
        .await
        .expect("refresh without a token should be a no-op");

    assert!(!store.is_authenticated());
    assert_eq!(api.tokens_issued(), 0, "no request should have been made");
}

#[tokio::test]
async fn test_invalid_refresh_token_cascades_into_logout() {
    let api = MockApi::spawn().await;
    let dir = temp_state_dir();

    // Seed a persisted session whose refresh token the server no longer accepts
    StatePersister::new(&dir)
        .save(&electrostore_client::persist::PersistedState {
            is_authenticated: true,
            access_token: Some("stale-access".to_owned()),
            refresh_token: Some("expired-refresh".to_owned()),
            ..Default::default()
        })
        .expect("seed persisted state");

    let store = persistent_store_for(&api, &dir);
    assert!(store.is_authenticated());

    // The failure is not surfaced; it becomes a logout
    store
        .refresh_access_token()
        .await
        .expect("refresh failure should not propagate");

    assert!(!store.is_authenticated());
    assert!(store.session().refresh_token().is_none());
    assert!(
        !StatePersister::new(&dir).path().exists(),
        "durable record should be deleted"
    );

    std::fs::remove_dir_all(&dir).ok();
}

// =============================================================================
// Admin Status
// =============================================================================

#[tokio::test]
async fn test_check_admin_status_records_admin() {
    let api = MockApi::spawn_admin().await;
    let store = store_for(&api);

    store
        .login(valid_credentials())
        .await
        .expect("login should succeed");
    store
        .check_admin_status()
        .await
        .expect("admin check should succeed");

    assert!(store.is_admin());
}

#[tokio::test]
async fn test_check_admin_status_fails_closed() {
    let api = MockApi::spawn_admin().await;
    let store = store_for(&api);

    // No login, so the profile fetch is rejected; privilege must fail closed
    store
        .check_admin_status()
        .await
        .expect("admin check should swallow the error");

    assert!(!store.is_admin());
    assert_eq!(store.session().role(), Some(Role::Customer));
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_clears_session_and_durable_record() {
    let api = MockApi::spawn().await;
    let dir = temp_state_dir();
    let store = persistent_store_for(&api, &dir);

    store
        .login(valid_credentials())
        .await
        .expect("login should succeed");
    assert!(StatePersister::new(&dir).path().exists());

    store.logout().expect("logout should succeed");

    let session = store.session();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert!(session.access_token().is_none());
    assert!(session.refresh_token().is_none());
    assert!(session.role().is_none());
    assert!(
        !StatePersister::new(&dir).path().exists(),
        "durable record should no longer contain prior tokens"
    );

    std::fs::remove_dir_all(&dir).ok();
}
