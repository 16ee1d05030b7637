use serde::{Deserialize, Serialize};

use crate::error::{ImpersonateError, Result};
use crate::utils::get_env_with_prefix;

/// Name of the provider whose model is used when no user model is configured.
const DEFAULT_USERS_PROVIDER: &str = "users";

/// Configuration for the impersonation manager
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImpersonateConfig {
    /// Session key holding the impersonation record
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Route name or URI to redirect to after taking an impersonation
    #[serde(default = "default_redirect")]
    pub take_redirect_to: String,

    /// Route name or URI to redirect to after leaving an impersonation
    #[serde(default = "default_redirect")]
    pub leave_redirect_to: String,

    /// Record type used by user lookups without an explicit model.
    ///
    /// Falls back to the model of the `users` provider when unset.
    #[serde(default)]
    pub user_model: Option<String>,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Guards and providers, in declaration order.
///
/// Order matters: guard selection keeps the last qualifying entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub guards: Vec<GuardConfig>,
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// A named authentication guard bound to a provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GuardConfig {
    pub name: String,
    #[serde(default)]
    pub driver: GuardDriver,
    pub provider: String,
}

/// A named user provider bound to a record type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default)]
    pub driver: ProviderDriver,
    pub model: String,
}

/// How a guard keeps track of the authenticated user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardDriver {
    /// Identity stored in the session (can be impersonated)
    #[default]
    Session,
    /// Stateless token authentication
    Token,
}

/// How a provider loads user records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderDriver {
    /// Records loaded as typed models (required for impersonation)
    #[default]
    Model,
    /// Raw database rows
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for ImpersonateConfig {
    fn default() -> Self {
        Self {
            session_key: default_session_key(),
            take_redirect_to: default_redirect(),
            leave_redirect_to: default_redirect(),
            user_model: None,
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl ImpersonateConfig {
    /// Parse configuration from a JSON document
    ///
    /// The parsed document goes through the same checks as [`ConfigBuilder::build`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ImpersonateError::configuration(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for consistency
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - the session key or a redirect target is empty
    /// - the log level is not recognised
    /// - a guard or provider name is declared twice
    /// - a guard references an undeclared provider
    pub fn validate(&self) -> Result<()> {
        if self.session_key.trim().is_empty() {
            return Err(ImpersonateError::configuration("Session key must not be empty"));
        }

        if self.take_redirect_to.trim().is_empty() || self.leave_redirect_to.trim().is_empty() {
            return Err(ImpersonateError::configuration(
                "Redirect targets must not be empty",
            ));
        }

        self.logging.validate()?;

        for (i, guard) in self.auth.guards.iter().enumerate() {
            if self.auth.guards[..i].iter().any(|g| g.name == guard.name) {
                return Err(ImpersonateError::configuration(format!(
                    "Guard '{}' is declared more than once",
                    guard.name
                )));
            }
            if self.auth.provider(&guard.provider).is_none() {
                return Err(ImpersonateError::configuration(format!(
                    "Guard '{}' references unknown provider '{}'",
                    guard.name, guard.provider
                )));
            }
        }

        for (i, provider) in self.auth.providers.iter().enumerate() {
            if self.auth.providers[..i].iter().any(|p| p.name == provider.name) {
                return Err(ImpersonateError::configuration(format!(
                    "Provider '{}' is declared more than once",
                    provider.name
                )));
            }
        }

        Ok(())
    }

    /// The record type used when a lookup does not name one
    pub fn default_model(&self) -> Result<&str> {
        if let Some(model) = self.user_model.as_deref() {
            return Ok(model);
        }
        self.auth
            .provider(DEFAULT_USERS_PROVIDER)
            .map(|p| p.model.as_str())
            .ok_or_else(|| {
                ImpersonateError::configuration(
                    "No user model configured and no 'users' provider declared",
                )
            })
    }
}

impl LoggingConfig {
    /// Reject log levels other than trace, debug, info, warn and error
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ImpersonateError::configuration(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.level,
                valid_log_levels.join(", ")
            )));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn guard(&self, name: &str) -> Option<&GuardConfig> {
        self.guards.iter().find(|g| g.name == name)
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Resolve the record type served by a guard's provider
    pub fn model_for_guard(&self, guard: &str) -> Result<&str> {
        let guard_config = self
            .guard(guard)
            .ok_or_else(|| ImpersonateError::configuration(format!("Unknown guard '{}'", guard)))?;
        let provider = self.provider(&guard_config.provider).ok_or_else(|| {
            ImpersonateError::configuration(format!(
                "Unknown provider '{}' for guard '{}'",
                guard_config.provider, guard
            ))
        })?;
        Ok(&provider.model)
    }
}

impl GuardConfig {
    pub fn new(name: impl Into<String>, driver: GuardDriver, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver,
            provider: provider.into(),
        }
    }

    /// A session guard
    pub fn session(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self::new(name, GuardDriver::Session, provider)
    }
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, driver: ProviderDriver, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            driver,
            model: model.into(),
        }
    }

    /// A model-backed provider
    pub fn model(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(name, ProviderDriver::Model, model)
    }
}

fn default_session_key() -> String {
    "impersonated_by".to_string()
}

fn default_redirect() -> String {
    "/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Builder for ImpersonateConfig with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: ImpersonateConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ImpersonateConfig::default(),
        }
    }

    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.config.session_key = key.into();
        self
    }

    pub fn with_take_redirect_to(mut self, target: impl Into<String>) -> Self {
        self.config.take_redirect_to = target.into();
        self
    }

    pub fn with_leave_redirect_to(mut self, target: impl Into<String>) -> Self {
        self.config.leave_redirect_to = target.into();
        self
    }

    pub fn with_user_model(mut self, model: impl Into<String>) -> Self {
        self.config.user_model = Some(model.into());
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.config.auth = auth;
        self
    }

    /// Append a guard; declaration order is kept
    pub fn with_guard(mut self, guard: GuardConfig) -> Self {
        self.config.auth.guards.push(guard);
        self
    }

    /// Append a provider; declaration order is kept
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.config.auth.providers.push(provider);
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load configuration from environment variables with TIDEWAY_ prefix
    pub fn from_env(mut self) -> Self {
        if let Some(key) = get_env_with_prefix("IMPERSONATE_SESSION_KEY") {
            self.config.session_key = key;
        }
        if let Some(target) = get_env_with_prefix("IMPERSONATE_TAKE_REDIRECT_TO") {
            self.config.take_redirect_to = target;
        }
        if let Some(target) = get_env_with_prefix("IMPERSONATE_LEAVE_REDIRECT_TO") {
            self.config.leave_redirect_to = target;
        }
        if let Some(model) = get_env_with_prefix("IMPERSONATE_USER_MODEL") {
            self.config.user_model = Some(model);
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON") {
            self.config.logging.json = json.parse().unwrap_or(false);
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error when [`ImpersonateConfig::validate`] fails.
    pub fn build(self) -> Result<ImpersonateConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
