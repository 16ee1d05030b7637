use crate::error::{ImpersonateError, Result};
use crate::events::ImpersonationEvent;
use crate::identity::Identity;
use crate::traits::events::EventDispatcher;
use crate::traits::routes::RouteResolver;
use crate::traits::users::UserStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::{Mutex, RwLock};

/// In-memory user records keyed by (model, id)
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashSet<Identity>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, identity: Identity) {
        self.users.write().await.insert(identity);
    }

    pub async fn remove(&self, identity: &Identity) -> bool {
        self.users.write().await.remove(identity)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_or_fail(&self, model: &str, id: &str) -> Result<Identity> {
        let wanted = Identity::new(model, id);
        if self.users.read().await.contains(&wanted) {
            Ok(wanted)
        } else {
            Err(ImpersonateError::not_found(format!(
                "No query results for model [{}] {}",
                model, id
            )))
        }
    }
}

/// Dispatcher that keeps every event it receives
#[derive(Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<ImpersonationEvent>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, oldest first
    pub async fn events(&self) -> Vec<ImpersonationEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventDispatcher for RecordingDispatcher {
    async fn dispatch(&self, event: &ImpersonationEvent) {
        self.events.lock().await.push(event.clone());
    }
}

/// Fixed route table
#[derive(Debug, Clone, Default)]
pub struct StaticRoutes {
    routes: HashMap<String, String>,
}

impl StaticRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>, uri: impl Into<String>) -> Self {
        self.routes.insert(name.into(), uri.into());
        self
    }
}

impl RouteResolver for StaticRoutes {
    fn url_for(&self, name: &str) -> Result<String> {
        self.routes
            .get(name)
            .cloned()
            .ok_or_else(|| ImpersonateError::invalid_route(format!("Route [{}] not defined", name)))
    }
}
