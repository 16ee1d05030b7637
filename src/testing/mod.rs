//! In-memory collaborators for tests and local development
//!
//! Every trait the manager depends on has a working in-memory implementation
//! here, so an `ImpersonateManager` can be exercised end to end without a web
//! framework, a database or an event bus.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tideway_impersonate::config::{ConfigBuilder, GuardConfig, ProviderConfig};
//! use tideway_impersonate::session::InMemorySession;
//! use tideway_impersonate::testing::{InMemoryGuards, InMemoryUserStore};
//! use tideway_impersonate::{Identity, ImpersonateManager};
//!
//! # #[tokio::main]
//! # async fn main() -> tideway_impersonate::Result<()> {
//! let config = ConfigBuilder::new()
//!     .with_provider(ProviderConfig::model("users", "User"))
//!     .with_provider(ProviderConfig::model("admins", "Admin"))
//!     .with_guard(GuardConfig::session("web", "users"))
//!     .with_guard(GuardConfig::session("admin", "admins"))
//!     .build()?;
//!
//! let guards = Arc::new(InMemoryGuards::from_config(&config.auth));
//! let users = Arc::new(InMemoryUserStore::new());
//! let admin = Identity::new("Admin", "1");
//! users.add(admin.clone()).await;
//! guards.login("admin", &admin).await?;
//!
//! let manager = ImpersonateManager::builder(config)
//!     .session(Arc::new(InMemorySession::new()))
//!     .guards(guards.clone())
//!     .users(users)
//!     .build()?;
//!
//! manager.take(&admin, &Identity::new("User", "42")).await?;
//! assert!(manager.is_impersonating().await?);
//! # Ok(())
//! # }
//! ```

mod guards;
mod stores;

pub use guards::{InMemoryGuard, InMemoryGuards};
pub use stores::{InMemoryUserStore, RecordingDispatcher, StaticRoutes};
