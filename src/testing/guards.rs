use crate::config::AuthConfig;
use crate::error::{ImpersonateError, Result};
use crate::identity::Identity;
use crate::traits::guard::{Guard, GuardRegistry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// A guard holding the current identity in memory
#[derive(Default)]
pub struct InMemoryGuard {
    current: RwLock<Option<Identity>>,
    failing: AtomicBool,
}

impl InMemoryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every login and logout on this guard fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self, op: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ImpersonateError::guard(format!("{} rejected", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl Guard for InMemoryGuard {
    async fn quiet_login(&self, identity: &Identity) -> Result<()> {
        self.check("login")?;
        *self.current.write().await = Some(identity.clone());
        Ok(())
    }

    async fn quiet_logout(&self) -> Result<()> {
        self.check("logout")?;
        *self.current.write().await = None;
        Ok(())
    }

    async fn user(&self) -> Result<Option<Identity>> {
        Ok(self.current.read().await.clone())
    }
}

/// A fixed set of named in-memory guards
#[derive(Default)]
pub struct InMemoryGuards {
    guards: HashMap<String, Arc<InMemoryGuard>>,
}

impl InMemoryGuards {
    pub fn new() -> Self {
        Self::default()
    }

    /// One guard per guard declared in `auth`
    pub fn from_config(auth: &AuthConfig) -> Self {
        auth.guards
            .iter()
            .fold(Self::new(), |guards, g| guards.with_guard(&g.name))
    }

    #[must_use]
    pub fn with_guard(mut self, name: impl Into<String>) -> Self {
        self.guards
            .insert(name.into(), Arc::new(InMemoryGuard::new()));
        self
    }

    fn named(&self, name: &str) -> Result<&Arc<InMemoryGuard>> {
        self.guards
            .get(name)
            .ok_or_else(|| ImpersonateError::configuration(format!("Guard [{}] is not defined", name)))
    }

    /// Log `identity` in on guard `name`
    pub async fn login(&self, name: &str, identity: &Identity) -> Result<()> {
        self.named(name)?.quiet_login(identity).await
    }

    /// The identity currently logged in on guard `name`
    pub async fn current(&self, name: &str) -> Option<Identity> {
        match self.named(name) {
            Ok(guard) => guard.current.read().await.clone(),
            Err(_) => None,
        }
    }

    /// Make logins and logouts on guard `name` fail
    pub fn fail_on(&self, name: &str) -> Result<()> {
        self.named(name)?.set_failing(true);
        Ok(())
    }
}

impl GuardRegistry for InMemoryGuards {
    fn guard(&self, name: &str) -> Result<Arc<dyn Guard>> {
        let guard: Arc<dyn Guard> = self.named(name)?.clone();
        Ok(guard)
    }
}
