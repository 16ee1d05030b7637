use crate::error::Result;
use crate::identity::Identity;
use async_trait::async_trait;

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load the record of type `model` with key `id`
    ///
    /// Returns `ImpersonateError::NotFound` when no such record exists.
    async fn find_or_fail(&self, model: &str, id: &str) -> Result<Identity>;
}
