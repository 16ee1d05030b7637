//! Impersonation lifecycle events.

use crate::identity::Identity;
use serde::Serialize;

/// Emitted after an impersonation has been taken.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TakeImpersonation {
    pub impersonator: Identity,
    pub impersonated: Identity,
}

/// Emitted after an impersonation has been left.
///
/// `impersonated` is whoever was logged in on the impersonated guard when the
/// impersonation ended, which may be nobody.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LeaveImpersonation {
    pub impersonator: Identity,
    pub impersonated: Option<Identity>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ImpersonationEvent {
    TakeImpersonation(TakeImpersonation),
    LeaveImpersonation(LeaveImpersonation),
}

impl ImpersonationEvent {
    /// Event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::TakeImpersonation(_) => "take_impersonation",
            Self::LeaveImpersonation(_) => "leave_impersonation",
        }
    }
}

impl From<TakeImpersonation> for ImpersonationEvent {
    fn from(event: TakeImpersonation) -> Self {
        Self::TakeImpersonation(event)
    }
}

impl From<LeaveImpersonation> for ImpersonationEvent {
    fn from(event: LeaveImpersonation) -> Self {
        Self::LeaveImpersonation(event)
    }
}
