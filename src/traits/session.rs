//! Session storage trait
//!
//! A key-value view of the current user's session. Values are strings; structured
//! values are stored as JSON.

use crate::error::Result;
use async_trait::async_trait;

/// The current request's session
#[async_trait]
pub trait Session: Send + Sync {
    /// Check whether a key is present
    async fn has(&self, key: &str) -> Result<bool>;

    /// Read a value, `Ok(None)` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one
    async fn put(&self, key: &str, value: String) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    async fn forget(&self, key: &str) -> Result<()>;
}
