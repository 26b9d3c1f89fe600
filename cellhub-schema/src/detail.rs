use serde::{Deserialize, Serialize};

/// Error payload for failed requests: domain errors, missing records,
/// unknown routes and malformed forms or path ids.
///
/// Shape: `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DetailBody {
    pub detail: String,
}

impl DetailBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Confirmation payload for successful deletes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
