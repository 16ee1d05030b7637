//! Tideway Impersonate - reversible session impersonation
//!
//! Lets a privileged user temporarily act as another user on the same session
//! and switch back afterwards. The crate owns a single piece of state, an
//! impersonation record kept in the session, and drives everything else
//! through traits the application implements:
//!
//! - **Session**: key-value access to the current session
//! - **Guards**: named authentication mechanisms with quiet login/logout
//! - **User store**: record lookup by model and key
//! - **Events**: `TakeImpersonation` / `LeaveImpersonation` notifications
//! - **Routes**: named-route resolution for redirect targets
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tideway_impersonate::{ConfigBuilder, ImpersonateManager};
//!
//! let config = ConfigBuilder::new().from_env().build()?;
//! let manager = ImpersonateManager::builder(config)
//!     .session(session)
//!     .guards(guards)
//!     .users(users)
//!     .build()?;
//!
//! manager.take(&admin, &customer).await?;
//! // ...
//! manager.leave().await?;
//! ```

pub mod config;
mod error;
pub mod events;
pub mod guard;
mod identity;
mod manager;
pub mod session;
pub mod testing;
pub mod traits;
pub mod utils;

pub use config::{
    AuthConfig, ConfigBuilder, GuardConfig, GuardDriver, ImpersonateConfig, LoggingConfig,
    ProviderConfig, ProviderDriver,
};
pub use error::{ImpersonateError, Result};
pub use events::{ImpersonationEvent, LeaveImpersonation, TakeImpersonation};
pub use identity::Identity;
pub use manager::{ImpersonateManager, ImpersonateManagerBuilder};
pub use session::{ImpersonationRecord, ImpersonationState, InMemorySession};
pub use traits::{EventDispatcher, Guard, GuardRegistry, RouteResolver, Session, UserStore};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global tracing subscriber with sensible defaults
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (e.g. "info", "auth.impersonation=debug"), default "info"
/// - `TIDEWAY_LOG_JSON` / `LOG_JSON`: "true" for JSON formatted logs
///
/// # Errors
///
/// Returns a configuration error if a global subscriber is already set.
pub fn try_init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = utils::get_env_with_prefix("LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    install_subscriber(env_filter, json)
}

/// Install a global tracing subscriber from a logging configuration
///
/// # Errors
///
/// Returns a configuration error if the level is invalid or a global
/// subscriber is already set.
pub fn try_init_tracing_with_config(config: &LoggingConfig) -> Result<()> {
    config.validate()?;
    install_subscriber(EnvFilter::new(&config.level), config.json)
}

fn install_subscriber(env_filter: EnvFilter, json: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    installed.map_err(|e| {
        ImpersonateError::configuration(format!("Could not install tracing subscriber: {}", e))
    })
}
