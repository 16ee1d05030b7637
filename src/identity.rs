use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticatable user record.
///
/// `model` names the record type (e.g. `"User"`, `"Admin"`) and is what ties an
/// identity to a provider, and through it to a guard. `id` is the record key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub model: String,
    pub id: String,
}

impl Identity {
    pub fn new(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            id: id.into(),
        }
    }

    /// The record key.
    pub fn key(&self) -> &str {
        &self.id
    }

    /// The record type.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Identity::new("Admin", "1").to_string(), "Admin#1");
    }

    #[test]
    fn test_equality_includes_model() {
        assert_ne!(Identity::new("Admin", "1"), Identity::new("User", "1"));
        assert_eq!(Identity::new("User", "42"), Identity::new("User", "42"));
    }
}
