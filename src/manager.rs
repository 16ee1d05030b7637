//! Reversible session impersonation.
//!
//! Lets an authenticated user (the impersonator) switch the session over to
//! another user's identity and later switch back. The only state kept is one
//! session entry recording who the impersonator was and which guards were
//! involved.
//!
//! # Ordering and partial failure
//!
//! `take` resolves both guards, then writes the session record, logs the
//! impersonator out and logs the target in. `leave` resolves everything it
//! needs, then logs the target out, logs the impersonator back in and clears
//! the record. Steps that already ran are not undone when a later one fails:
//! a `take` whose login fails leaves the record in the session with nobody
//! logged in. Callers that need a clean slate can call [`ImpersonateManager::clear`].
//!
//! Concurrent requests on the same session are not coordinated; whichever
//! write reaches the session store last wins.
//!
//! # Example
//!
//! ```rust,ignore
//! let manager = ImpersonateManager::builder(config)
//!     .session(session)
//!     .guards(guards)
//!     .users(users)
//!     .events(events)
//!     .routes(routes)
//!     .build()?;
//!
//! manager.take(&admin, &customer).await?;
//! let redirect = manager.take_redirect_to()?;
//!
//! // later
//! let admin = manager.leave().await?;
//! ```

use crate::config::ImpersonateConfig;
use crate::error::{ImpersonateError, Result};
use crate::events::{ImpersonationEvent, LeaveImpersonation, TakeImpersonation};
use crate::guard;
use crate::identity::Identity;
use crate::session::{ImpersonationRecord, ImpersonationState};
use crate::traits::events::NoopDispatcher;
use crate::traits::{EventDispatcher, GuardRegistry, RouteResolver, Session, UserStore};
use std::sync::Arc;

/// Manager for impersonation operations on one session.
#[derive(Clone)]
pub struct ImpersonateManager {
    config: Arc<ImpersonateConfig>,
    session: Arc<dyn Session>,
    guards: Arc<dyn GuardRegistry>,
    users: Arc<dyn UserStore>,
    events: Arc<dyn EventDispatcher>,
    routes: Option<Arc<dyn RouteResolver>>,
}

impl ImpersonateManager {
    /// Start building a manager around `config`.
    pub fn builder(config: ImpersonateConfig) -> ImpersonateManagerBuilder {
        ImpersonateManagerBuilder::new(config)
    }

    /// The same manager bound to another session, typically the next request's.
    #[must_use]
    pub fn with_session(&self, session: Arc<dyn Session>) -> Self {
        Self {
            session,
            ..self.clone()
        }
    }

    /// Look up a user record.
    ///
    /// `model` defaults to the configured user model.
    pub async fn find_user_by_id(&self, id: &str, model: Option<&str>) -> Result<Identity> {
        let model = match model {
            Some(model) => model,
            None => self.config.default_model()?,
        };
        self.users.find_or_fail(model, id).await
    }

    /// Whether the session currently holds an impersonation record.
    pub async fn is_impersonating(&self) -> Result<bool> {
        self.session.has(self.session_key()).await
    }

    /// Current impersonation state of the session.
    pub async fn state(&self) -> Result<ImpersonationState> {
        let stored = self.session.get(self.session_key()).await?;
        ImpersonationState::decode(stored.as_deref())
    }

    /// The stored impersonation record, if any.
    ///
    /// Carries the impersonator's key along with both guard names.
    pub async fn impersonator_record(&self) -> Result<Option<ImpersonationRecord>> {
        Ok(self.state().await?.into_record())
    }

    /// Name of the session guard `identity` authenticates through.
    ///
    /// See [`guard::determine_guard`] for the selection rules.
    pub fn determine_guard(&self, identity: &Identity) -> Result<String> {
        guard::determine_guard(&self.config.auth, identity)
    }

    /// Switch the session from `impersonator` to `target`.
    ///
    /// Emits [`TakeImpersonation`] on success. On failure nothing is emitted
    /// and steps already performed stay in effect.
    pub async fn take(
        &self,
        impersonator: &Identity,
        target: &Identity,
    ) -> Result<ImpersonationRecord> {
        let record = match self.swap_in(impersonator, target).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(
                    target: "auth.impersonation.rejected",
                    impersonator = %impersonator,
                    target_user = %target,
                    kind = err.kind(),
                    error = %err,
                    "Impersonation could not be taken"
                );
                return Err(err);
            }
        };

        tracing::info!(
            target: "auth.impersonation.taken",
            impersonator = %impersonator,
            target_user = %target,
            from_guard = %record.from,
            to_guard = %record.to,
            "Impersonation taken"
        );

        let event = TakeImpersonation {
            impersonator: impersonator.clone(),
            impersonated: target.clone(),
        };
        self.events
            .dispatch(&ImpersonationEvent::from(event))
            .await;

        Ok(record)
    }

    async fn swap_in(
        &self,
        impersonator: &Identity,
        target: &Identity,
    ) -> Result<ImpersonationRecord> {
        let from_guard = self.determine_guard(impersonator)?;
        let to_guard = self.determine_guard(target)?;
        let from = self.guards.guard(&from_guard)?;
        let to = self.guards.guard(&to_guard)?;

        let record = ImpersonationRecord {
            key: impersonator.key().to_string(),
            from: from_guard,
            to: to_guard,
        };

        let stored = ImpersonationState::from(record.clone()).encode()?;
        self.session.put(self.session_key(), stored).await?;

        from.quiet_logout().await?;
        to.quiet_login(target).await?;

        Ok(record)
    }

    /// Switch the session back to the impersonator and clear the record.
    ///
    /// Returns the restored impersonator and emits [`LeaveImpersonation`].
    /// Fails with [`ImpersonateError::NotImpersonating`] when there is no record.
    pub async fn leave(&self) -> Result<Identity> {
        let (impersonator, impersonated) = match self.swap_back().await {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(
                    target: "auth.impersonation.rejected",
                    kind = err.kind(),
                    error = %err,
                    "Impersonation could not be left"
                );
                return Err(err);
            }
        };

        let impersonated_label = impersonated
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        tracing::info!(
            target: "auth.impersonation.left",
            impersonator = %impersonator,
            impersonated = %impersonated_label,
            "Impersonation left"
        );

        let event = LeaveImpersonation {
            impersonator: impersonator.clone(),
            impersonated,
        };
        self.events
            .dispatch(&ImpersonationEvent::from(event))
            .await;

        Ok(impersonator)
    }

    async fn swap_back(&self) -> Result<(Identity, Option<Identity>)> {
        let record = self
            .impersonator_record()
            .await?
            .ok_or(ImpersonateError::NotImpersonating)?;

        // Active guard is the one the target was logged in on
        let from_guard = record.to.as_str();
        let to_guard = record.from.as_str();

        let model = self.config.auth.model_for_guard(to_guard)?;
        let from = self.guards.guard(from_guard)?;
        let to = self.guards.guard(to_guard)?;

        let impersonated = from.user().await?;
        let impersonator = self.find_user_by_id(&record.key, Some(model)).await?;

        from.quiet_logout().await?;
        to.quiet_login(&impersonator).await?;

        self.session.forget(self.session_key()).await?;

        Ok((impersonator, impersonated))
    }

    /// Remove the impersonation record. Does nothing if there is none.
    pub async fn clear(&self) -> Result<()> {
        self.session.forget(self.session_key()).await?;
        tracing::debug!(target: "auth.impersonation.cleared", "Impersonation record cleared");
        Ok(())
    }

    /// Session key holding the impersonation record.
    pub fn session_key(&self) -> &str {
        &self.config.session_key
    }

    /// Where to send the user after taking an impersonation.
    pub fn take_redirect_to(&self) -> Result<String> {
        self.resolve_redirect(&self.config.take_redirect_to)
    }

    /// Where to send the user after leaving an impersonation.
    pub fn leave_redirect_to(&self) -> Result<String> {
        self.resolve_redirect(&self.config.leave_redirect_to)
    }

    /// Resolve `target` as a route name, or use it as a URI when no such
    /// route exists. Other resolver errors are returned.
    fn resolve_redirect(&self, target: &str) -> Result<String> {
        let Some(routes) = &self.routes else {
            return Ok(target.to_string());
        };

        match routes.url_for(target) {
            Ok(uri) => Ok(uri),
            Err(err) if err.is_invalid_route() => Ok(target.to_string()),
            Err(err) => Err(err),
        }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ImpersonateConfig {
        &self.config
    }
}

/// Builder for [`ImpersonateManager`]
#[must_use = "builder does nothing until you call build()"]
pub struct ImpersonateManagerBuilder {
    config: ImpersonateConfig,
    session: Option<Arc<dyn Session>>,
    guards: Option<Arc<dyn GuardRegistry>>,
    users: Option<Arc<dyn UserStore>>,
    events: Option<Arc<dyn EventDispatcher>>,
    routes: Option<Arc<dyn RouteResolver>>,
}

impl ImpersonateManagerBuilder {
    pub fn new(config: ImpersonateConfig) -> Self {
        Self {
            config,
            session: None,
            guards: None,
            users: None,
            events: None,
            routes: None,
        }
    }

    pub fn session(mut self, session: Arc<dyn Session>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn guards(mut self, guards: Arc<dyn GuardRegistry>) -> Self {
        self.guards = Some(guards);
        self
    }

    pub fn users(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    /// Event sink; events are dropped when unset
    pub fn events(mut self, events: Arc<dyn EventDispatcher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Route table; redirect targets are used verbatim when unset
    pub fn routes(mut self, routes: Arc<dyn RouteResolver>) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Build the manager
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration fails
    /// [`ImpersonateConfig::validate`], or if the session, guards or user store
    /// is missing.
    pub fn build(self) -> Result<ImpersonateManager> {
        self.config.validate()?;

        let session = self
            .session
            .ok_or_else(|| ImpersonateError::configuration("A session is required"))?;
        let guards = self
            .guards
            .ok_or_else(|| ImpersonateError::configuration("A guard registry is required"))?;
        let users = self
            .users
            .ok_or_else(|| ImpersonateError::configuration("A user store is required"))?;

        Ok(ImpersonateManager {
            config: Arc::new(self.config),
            session,
            guards,
            users,
            events: self.events.unwrap_or_else(|| Arc::new(NoopDispatcher)),
            routes: self.routes,
        })
    }
}
