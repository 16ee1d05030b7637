//! Guard selection for an identity.

use crate::config::{AuthConfig, GuardDriver, ProviderDriver};
use crate::error::{ImpersonateError, Result};
use crate::identity::Identity;

/// Find the session guard an identity authenticates through.
///
/// First picks the model-backed provider serving `identity.model`, then the
/// session guard bound to that provider. Token guards are never selected since
/// they hold no session identity to swap.
///
/// Both stages keep the *last* qualifying entry in declaration order. Several
/// qualifying entries are not an error; the ambiguity is only logged.
pub fn determine_guard(auth: &AuthConfig, identity: &Identity) -> Result<String> {
    let providers: Vec<&str> = auth
        .providers
        .iter()
        .filter(|p| p.model == identity.model() && p.driver == ProviderDriver::Model)
        .map(|p| p.name.as_str())
        .collect();

    let provider = providers.last().copied().ok_or_else(|| {
        ImpersonateError::configuration(format!(
            "Error when selecting provider for {}",
            identity.model()
        ))
    })?;

    if providers.len() > 1 {
        tracing::debug!(
            target: "auth.impersonation.guard",
            model = %identity.model(),
            candidates = ?providers,
            selected = %provider,
            "Several providers serve this model, using the last one"
        );
    }

    let guards: Vec<&str> = auth
        .guards
        .iter()
        .filter(|g| g.provider == provider && g.driver == GuardDriver::Session)
        .map(|g| g.name.as_str())
        .collect();

    let guard = guards.last().copied().ok_or_else(|| {
        ImpersonateError::configuration(format!(
            "Error when selecting guard for {} provider",
            provider
        ))
    })?;

    if guards.len() > 1 {
        tracing::debug!(
            target: "auth.impersonation.guard",
            provider = %provider,
            candidates = ?guards,
            selected = %guard,
            "Several session guards use this provider, using the last one"
        );
    }

    Ok(guard.to_string())
}
