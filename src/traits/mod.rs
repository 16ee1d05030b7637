//! Trait definitions for the collaborators the manager drives
//!
//! Applications implement these against their own session layer, auth guards,
//! user persistence, event bus and router. The `testing` module ships in-memory
//! versions of each.

pub mod events;
pub mod guard;
pub mod routes;
pub mod session;
pub mod users;

pub use events::EventDispatcher;
pub use guard::{Guard, GuardRegistry};
pub use routes::RouteResolver;
pub use session::Session;
pub use users::UserStore;
