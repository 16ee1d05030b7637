use serde::{Deserialize, Serialize};

/// Linkage needed to reverse an impersonation.
///
/// `key` is the impersonator's record key, `from` the guard the impersonator was
/// logged in on, `to` the guard the impersonated user is now logged in on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpersonationRecord {
    pub key: String,
    pub from: String,
    pub to: String,
}

/// Impersonation state of a session.
///
/// Only `Impersonating` is ever written to the session. An absent entry reads
/// back as `Normal`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ImpersonationState {
    #[default]
    Normal,
    Impersonating(ImpersonationRecord),
}

impl ImpersonationState {
    pub fn into_record(self) -> Option<ImpersonationRecord> {
        match self {
            Self::Normal => None,
            Self::Impersonating(record) => Some(record),
        }
    }

    /// Decode a stored session value; `None` means no entry
    pub fn decode(stored: Option<&str>) -> crate::error::Result<Self> {
        match stored {
            None => Ok(Self::Normal),
            Some(raw) => Ok(serde_json::from_str(raw)?),
        }
    }

    pub fn encode(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<ImpersonationRecord> for ImpersonationState {
    fn from(record: ImpersonationRecord) -> Self {
        Self::Impersonating(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImpersonateError;

    fn record() -> ImpersonationRecord {
        ImpersonationRecord {
            key: "1".to_string(),
            from: "admin".to_string(),
            to: "web".to_string(),
        }
    }

    #[test]
    fn test_absent_is_normal() {
        let state = ImpersonationState::decode(None).unwrap();
        assert_eq!(state, ImpersonationState::Normal);
        assert!(state.into_record().is_none());
    }

    #[test]
    fn test_encoded_shape() {
        let encoded = ImpersonationState::from(record()).encode().unwrap();
        let json: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(json["state"], "impersonating");
        assert_eq!(json["key"], "1");
        assert_eq!(json["from"], "admin");
        assert_eq!(json["to"], "web");

        let decoded = ImpersonationState::decode(Some(&encoded)).unwrap();
        assert_eq!(decoded.into_record(), Some(record()));
    }

    #[test]
    fn test_garbage_is_session_error() {
        let result = ImpersonationState::decode(Some("not-json"));
        assert!(matches!(result, Err(ImpersonateError::Session(_))));
    }
}
