//! Session-held impersonation state and an in-memory session.

mod in_memory;
mod state;

pub use in_memory::InMemorySession;
pub use state::{ImpersonationRecord, ImpersonationState};
