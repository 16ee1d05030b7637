//! Authentication guard traits

use crate::error::Result;
use crate::identity::Identity;
use async_trait::async_trait;
use std::sync::Arc;

/// A named authentication mechanism holding the current user for a session.
///
/// The quiet variants switch identity without firing the application's
/// login/logout lifecycle events.
#[async_trait]
pub trait Guard: Send + Sync {
    /// Authenticate `identity` without lifecycle events
    async fn quiet_login(&self, identity: &Identity) -> Result<()>;

    /// Clear the current identity without lifecycle events
    async fn quiet_logout(&self) -> Result<()>;

    /// The currently authenticated identity, if any
    async fn user(&self) -> Result<Option<Identity>>;
}

/// Looks up guards by name
pub trait GuardRegistry: Send + Sync {
    /// Get the guard called `name`
    ///
    /// Returns a configuration error when no such guard exists.
    fn guard(&self, name: &str) -> Result<Arc<dyn Guard>>;
}
