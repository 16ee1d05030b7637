use crate::error::Result;

/// Resolves named routes to URIs
pub trait RouteResolver: Send + Sync {
    /// Return the URI for the route called `name`
    ///
    /// Returns `ImpersonateError::InvalidRoute` when no route has that name.
    fn url_for(&self, name: &str) -> Result<String>;
}
