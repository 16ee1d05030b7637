use crate::error::Result;
use crate::traits::session::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory session
///
/// Holds one session's key-value pairs in a HashMap. Clones share the same
/// data, so a clone can be handed to the manager while the caller keeps one
/// for inspection. Suitable for development and testing.
#[derive(Clone, Default)]
pub struct InMemorySession {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl Session for InMemorySession {
    async fn has(&self, key: &str) -> Result<bool> {
        Ok(self.data.read().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<()> {
        self.data.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let session = InMemorySession::new();
        session.put("user_id", "123".to_string()).await.unwrap();

        assert!(session.has("user_id").await.unwrap());
        assert_eq!(session.get("user_id").await.unwrap(), Some("123".to_string()));
        assert_eq!(session.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_forget() {
        let session = InMemorySession::new();
        session.put("user_id", "123".to_string()).await.unwrap();
        session.forget("user_id").await.unwrap();

        assert!(!session.has("user_id").await.unwrap());
        assert!(session.is_empty().await);
    }

    #[tokio::test]
    async fn test_forget_absent_key() {
        let session = InMemorySession::new();
        session.forget("nothing").await.unwrap();
        session.forget("nothing").await.unwrap();
        assert_eq!(session.len().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let session = InMemorySession::new();
        let handle = session.clone();
        handle.put("k", "v".to_string()).await.unwrap();
        assert!(session.has("k").await.unwrap());
    }
}
