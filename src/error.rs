/// The error type for impersonation operations
#[derive(Debug, thiserror::Error)]
pub enum ImpersonateError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Not impersonating")]
    NotImpersonating,

    #[error("Session error: {0}")]
    Session(String),

    #[error("Guard error: {0}")]
    Guard(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl ImpersonateError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_route(msg: impl Into<String>) -> Self {
        Self::InvalidRoute(msg.into())
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn guard(msg: impl Into<String>) -> Self {
        Self::Guard(msg.into())
    }

    /// Whether this error means a redirect target is not a named route.
    ///
    /// The redirect resolvers fall back to the literal value only in this case.
    pub fn is_invalid_route(&self) -> bool {
        matches!(self, Self::InvalidRoute(_))
    }

    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Configuration(_) => "configuration",
            Self::InvalidRoute(_) => "invalid_route",
            Self::NotImpersonating => "not_impersonating",
            Self::Session(_) => "session",
            Self::Guard(_) => "guard",
            Self::Anyhow(_) => "internal",
        }
    }
}

/// Result type alias for impersonation operations
pub type Result<T> = std::result::Result<T, ImpersonateError>;

impl From<serde_json::Error> for ImpersonateError {
    fn from(err: serde_json::Error) -> Self {
        ImpersonateError::Session(format!("Invalid session record: {}", err))
    }
}
