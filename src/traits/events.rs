use crate::events::ImpersonationEvent;
use async_trait::async_trait;

/// Receives impersonation lifecycle events.
///
/// Fire-and-forget: the manager does not wait on or inspect any outcome, so
/// implementations handle their own failures.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, event: &ImpersonationEvent);
}

/// Dispatcher that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDispatcher;

#[async_trait]
impl EventDispatcher for NoopDispatcher {
    async fn dispatch(&self, _event: &ImpersonationEvent) {}
}
