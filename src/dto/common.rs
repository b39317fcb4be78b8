use serde::{Deserialize, Serialize};

/// Envelope wrapping every store response: a success flag plus an
/// optional payload. A `success: false` body travels with a non-2xx
/// status and is one of the client's fallback triggers.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Whether the operation was accepted.
    pub success: bool,
    /// Operation result, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }

    /// Successful response without a payload.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}
