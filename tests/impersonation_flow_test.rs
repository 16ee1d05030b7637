//! End-to-end impersonation flows against the in-memory collaborators.

use async_trait::async_trait;
use std::sync::Arc;
use tideway_impersonate::testing::{InMemoryGuards, InMemoryUserStore, RecordingDispatcher};
use tideway_impersonate::{
    ConfigBuilder, GuardConfig, GuardDriver, GuardRegistry, Identity, ImpersonateError, ImpersonateManager,
    ImpersonationEvent, ImpersonationRecord, ImpersonationState, InMemorySession, ProviderConfig,
    Result, Session,
};

// =============================================================================
// Setup
// =============================================================================

struct TestApp {
    manager: ImpersonateManager,
    session: InMemorySession,
    guards: Arc<InMemoryGuards>,
    events: Arc<RecordingDispatcher>,
}

async fn app() -> TestApp {
    let config = ConfigBuilder::new()
        .with_provider(ProviderConfig::model("users", "User"))
        .with_provider(ProviderConfig::model("admins", "Admin"))
        .with_guard(GuardConfig::session("web", "users"))
        .with_guard(GuardConfig::new("api", GuardDriver::Token, "users"))
        .with_guard(GuardConfig::session("admin", "admins"))
        .build()
        .unwrap();

    let session = InMemorySession::new();
    let guards = Arc::new(InMemoryGuards::from_config(&config.auth));
    let users = Arc::new(InMemoryUserStore::new());
    let events = Arc::new(RecordingDispatcher::new());

    users.add(Identity::new("Admin", "1")).await;
    users.add(Identity::new("User", "42")).await;
    users.add(Identity::new("User", "7")).await;

    let manager = ImpersonateManager::builder(config)
        .session(Arc::new(session.clone()))
        .guards(guards.clone())
        .users(users)
        .events(events.clone())
        .build()
        .unwrap();

    TestApp {
        manager,
        session,
        guards,
        events,
    }
}

// =============================================================================
// Flows
// =============================================================================

#[tokio::test]
async fn test_admin_impersonates_user_and_returns() {
    let app = app().await;
    let admin = Identity::new("Admin", "1");
    let user = Identity::new("User", "42");
    app.guards.login("admin", &admin).await.unwrap();

    app.manager.take(&admin, &user).await.unwrap();

    let stored = app.session.get("impersonated_by").await.unwrap().unwrap();
    let state: ImpersonationState = serde_json::from_str(&stored).unwrap();
    assert_eq!(
        state,
        ImpersonationState::Impersonating(ImpersonationRecord {
            key: "1".to_string(),
            from: "admin".to_string(),
            to: "web".to_string(),
        })
    );
    assert_eq!(app.guards.current("web").await, Some(user.clone()));

    app.manager.leave().await.unwrap();

    assert_eq!(app.guards.current("admin").await, Some(admin));
    assert_eq!(app.guards.current("web").await, None);
    assert!(!app.session.has("impersonated_by").await.unwrap());
}

#[tokio::test]
async fn test_same_guard_impersonation() {
    let app = app().await;
    let support = Identity::new("User", "7");
    let user = Identity::new("User", "42");
    app.guards.login("web", &support).await.unwrap();

    let record = app.manager.take(&support, &user).await.unwrap();
    assert_eq!(record.from, "web");
    assert_eq!(record.to, "web");
    assert_eq!(app.guards.current("web").await, Some(user));

    let restored = app.manager.leave().await.unwrap();
    assert_eq!(restored, support);
    assert_eq!(app.guards.current("web").await, Some(support));
}

#[tokio::test]
async fn test_leave_twice() {
    let app = app().await;
    let admin = Identity::new("Admin", "1");
    app.guards.login("admin", &admin).await.unwrap();

    app.manager
        .take(&admin, &Identity::new("User", "42"))
        .await
        .unwrap();
    app.manager.leave().await.unwrap();

    let second = app.manager.leave().await;
    assert!(matches!(second, Err(ImpersonateError::NotImpersonating)));
    assert_eq!(app.events.events().await.len(), 2);
}

#[tokio::test]
async fn test_leave_on_empty_session() {
    let app = app().await;
    assert!(app.manager.leave().await.is_err());
    assert!(app.session.is_empty().await);
}

#[tokio::test]
async fn test_clear_on_empty_session() {
    let app = app().await;
    app.manager.clear().await.unwrap();
    app.manager.clear().await.unwrap();
    assert!(!app.manager.is_impersonating().await.unwrap());
}

#[tokio::test]
async fn test_take_with_unconfigured_target_model() {
    let app = app().await;
    let admin = Identity::new("Admin", "1");
    app.guards.login("admin", &admin).await.unwrap();

    let result = app.manager.take(&admin, &Identity::new("Vendor", "3")).await;

    assert!(matches!(result, Err(ImpersonateError::Configuration(_))));
    assert!(!app.manager.is_impersonating().await.unwrap());
    assert_eq!(app.guards.current("admin").await, Some(admin));
}

#[tokio::test]
async fn test_leave_payload_when_target_already_logged_out() {
    let app = app().await;
    let admin = Identity::new("Admin", "1");
    app.guards.login("admin", &admin).await.unwrap();
    app.manager
        .take(&admin, &Identity::new("User", "42"))
        .await
        .unwrap();

    // Target logged out by something else mid-impersonation
    app.guards.guard("web").unwrap().quiet_logout().await.unwrap();

    app.manager.leave().await.unwrap();

    match app.events.events().await.last() {
        Some(ImpersonationEvent::LeaveImpersonation(event)) => {
            assert_eq!(event.impersonator, admin);
            assert_eq!(event.impersonated, None);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

// =============================================================================
// Session failures
// =============================================================================

struct BrokenSession;

#[async_trait]
impl Session for BrokenSession {
    async fn has(&self, _key: &str) -> Result<bool> {
        Err(ImpersonateError::session("store offline"))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(ImpersonateError::session("store offline"))
    }

    async fn put(&self, _key: &str, _value: String) -> Result<()> {
        Err(ImpersonateError::session("store offline"))
    }

    async fn forget(&self, _key: &str) -> Result<()> {
        Err(ImpersonateError::session("store offline"))
    }
}

#[tokio::test]
async fn test_session_failure_aborts_take_before_login_changes() {
    let app = app().await;
    let admin = Identity::new("Admin", "1");
    app.guards.login("admin", &admin).await.unwrap();

    let manager = app.manager.with_session(Arc::new(BrokenSession));
    let result = manager.take(&admin, &Identity::new("User", "42")).await;

    assert!(matches!(result, Err(ImpersonateError::Session(_))));
    assert_eq!(app.guards.current("admin").await, Some(admin));
    assert!(app.events.events().await.is_empty());
}

#[tokio::test]
async fn test_corrupt_record_is_reported() {
    let app = app().await;
    app.session
        .put("impersonated_by", "{\"key\":1}".to_string())
        .await
        .unwrap();

    assert!(app.manager.is_impersonating().await.unwrap());
    assert!(matches!(
        app.manager.leave().await,
        Err(ImpersonateError::Session(_))
    ));
}
