use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a synchronized record.
///
/// Confirmed records carry the server-assigned numeric id; records created
/// optimistically carry a locally-generated placeholder until the backend
/// acknowledges them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Assigned(i64),
    Local(String),
}

impl RecordId {
    /// New placeholder id, unique within the session.
    pub fn local() -> Self {
        RecordId::Local(Uuid::new_v4().to_string())
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RecordId::Local(_))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Assigned(value) => write!(f, "{}", value),
            RecordId::Local(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Assigned(value)
    }
}
