//! Client-side API error taxonomy.
//!
//! Everything the HTTP layer can fail with, folded into one enum so
//! callers match on meaning (unauthorized / business rule / transport)
//! instead of on status codes.

/// Errors from calls to the remote API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 401 from a protected endpoint. The session has already been
    /// invalidated by the time callers see this.
    #[error("Session expired, sign in again")]
    Unauthorized,
    /// The API rejected the request with a business-rule error.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Cannot reach the server at {0}")]
    Connection(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP transport error: {0}")]
    Transport(String),
    #[error("Malformed response from the server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-success, non-invalidating response.
    ///
    /// Pulls a human-readable message out of the common JSON error
    /// shapes (`detail`, `message`, `error.message`), falling back to
    /// the bare status code when the body is opaque.
    pub fn from_failure(status: u16, body: &str) -> Self {
        Self::Api {
            status,
            message: extract_message(status, body),
        }
    }
}

fn extract_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail") {
            if let Some(s) = detail.as_str() {
                return s.to_string();
            }
            // Validation errors arrive as a list of {msg, loc, ...}
            if let Some(first) = detail
                .as_array()
                .and_then(|items| items.first())
                .and_then(|item| item.get("msg"))
                .and_then(|msg| msg.as_str())
            {
                return first.to_string();
            }
        }
        if let Some(s) = value.get("message").and_then(|m| m.as_str()) {
            return s.to_string();
        }
        if let Some(s) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return s.to_string();
        }
    }
    format!("Request failed with status {status}")
}
