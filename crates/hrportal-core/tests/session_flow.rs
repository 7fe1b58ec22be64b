//! End-to-end login flow against file-backed storage, including a restart.

use chrono::{Duration, Utc};
use hrportal_core::auth::credentials::STATIC_CODE;
use hrportal_core::auth::Claims;
use hrportal_core::storage::TOKEN_KEY;
use hrportal_core::{
    resolve, AuthError, AuthState, DurableStorage, FileStorage, Navigation, Role, Route,
    SessionStore, StaticIdentityProvider,
};

fn open_store(dir: &std::path::Path) -> SessionStore<StaticIdentityProvider, FileStorage> {
    let storage = FileStorage::open(dir).expect("open storage");
    SessionStore::new(StaticIdentityProvider::default(), storage)
}

#[tokio::test]
async fn test_login_survives_restart_until_logout() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = open_store(dir.path());
    assert_eq!(store.initialize().unwrap(), AuthState::Anonymous);
    assert_eq!(
        resolve("/admin/reports", store.session()),
        Navigation::Redirect(Route::Login)
    );

    store.request_code("admin@test.com").await.unwrap();
    let home = store.verify_code(STATIC_CODE).await.unwrap();
    assert_eq!(home.path(), "/admin/dashboard");
    drop(store.shutdown());

    // Restart: the session comes back from disk without another code
    let mut store = open_store(dir.path());
    assert!(store.session().is_loading);
    assert_eq!(store.initialize().unwrap(), AuthState::Authenticated);
    assert_eq!(store.session().role(), Some(Role::Admin));
    assert!(matches!(
        resolve("/admin/reports", store.session()),
        Navigation::Render(Route::Section { role: Role::Admin, .. })
    ));
    assert_eq!(
        resolve("/employee/payslips", store.session()),
        Navigation::Redirect(Role::Admin.home())
    );

    store.logout().unwrap();
    drop(store);
    assert!(!dir.path().join("session.json").exists());

    let mut store = open_store(dir.path());
    assert_eq!(store.initialize().unwrap(), AuthState::Anonymous);
}

#[tokio::test]
async fn test_pending_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = open_store(dir.path());
    store.initialize().unwrap();
    store.request_code("employee@test.com").await.unwrap();
    drop(store);

    let mut store = open_store(dir.path());
    assert_eq!(store.initialize().unwrap(), AuthState::CodeRequested);
    assert!(matches!(
        store.verify_code("000000").await,
        Err(AuthError::InvalidCode)
    ));
    assert_eq!(
        store.verify_code(STATIC_CODE).await.unwrap(),
        Role::Employee.home()
    );
}

#[test]
fn test_expired_persisted_token_is_cleared_on_startup() {
    let dir = tempfile::tempdir().unwrap();
    let expired = Claims::new(
        "superadmin@test.com",
        "Super Admin",
        Role::SuperAdmin,
        Utc::now() - Duration::days(2),
        Duration::hours(8),
    )
    .unwrap()
    .encode(b"irrelevant")
    .unwrap();

    let mut storage = FileStorage::open(dir.path()).unwrap();
    storage.set(TOKEN_KEY, &expired).unwrap();
    drop(storage);

    let mut store = open_store(dir.path());
    assert_eq!(store.initialize().unwrap(), AuthState::Anonymous);
    assert!(store.session().last_error.is_some());
    assert_eq!(store.token(), None);

    let storage = store.shutdown();
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert!(!storage.path().exists());
}

#[test]
fn test_independent_stores_do_not_share_state() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let mut first = open_store(a.path());
    let mut second = open_store(b.path());
    first.initialize().unwrap();
    second.initialize().unwrap();

    runtime.block_on(async {
        first.request_code("admin@test.com").await.unwrap();
        first.verify_code(STATIC_CODE).await.unwrap();
    });

    assert_eq!(first.state(), AuthState::Authenticated);
    assert_eq!(second.state(), AuthState::Anonymous);
}
